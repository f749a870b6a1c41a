use std::time::Instant;

use crate::events::{AppCommand, DataEvent};
use crate::state::{reducer, DashboardState};

/// Trait for handling command execution (production = real loader + tasks, test = mock)
///
/// This abstracts the side effects of command execution so tests can record
/// effects instead of spawning background tasks or calling the gateway.
pub trait DataEventHandler {
    /// Execute a command with access to mutable state at time `now`
    fn execute_with_context(&mut self, command: AppCommand, state: &mut DashboardState, now: Instant);
}

/// Dashboard core without I/O dependencies
///
/// Generic over H (handler). The handler decides how effects are performed:
/// spawned as tasks in production, recorded in tests.
pub struct AppCore<H: DataEventHandler> {
    state: DashboardState,
    handler: H,
}

impl<H: DataEventHandler> AppCore<H> {
    pub fn new(state: DashboardState, handler: H) -> Self {
        Self { state, handler }
    }

    pub fn handle_command(&mut self, command: AppCommand) {
        self.handle_command_at(command, Instant::now());
    }

    pub fn handle_command_at(&mut self, command: AppCommand, now: Instant) {
        self.handler
            .execute_with_context(command, &mut self.state, now);
    }

    /// Handle a data event (from a background task, or injected by a test).
    /// Follow-up commands produced by the reducer are executed right away.
    pub fn handle_data_event(&mut self, event: DataEvent) {
        let now = Instant::now();
        for command in reducer::reduce_data_event(&mut self.state, event) {
            self.handle_command_at(command, now);
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }
}
