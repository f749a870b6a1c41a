use anyhow::Result;
use chrono::{Local, NaiveDate};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::commands::executor;
use crate::config::Settings;
use crate::events::AppCommand;
use crate::gateway::GatewayRef;
use crate::state::{reducer, DashboardState};
use ledger_api::Client;

const TICK_INTERVAL: Duration = Duration::from_millis(50);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct App {
    settings: Settings,
    settle_timeout: Duration,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            settle_timeout: SETTLE_TIMEOUT,
        }
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Load the dashboard from the configured gateway and print a summary
    pub async fn run(&self) -> Result<()> {
        tracing::info!("finboard starting against {}", self.settings.api_base_url);

        let client = match &self.settings.access_token {
            Some(token) => Client::with_token(&self.settings.api_base_url, token.expose_secret()),
            None => {
                tracing::warn!("No access token configured, sending unauthenticated requests");
                Client::new(&self.settings.api_base_url)
            }
        };

        let state = self
            .run_with_gateway(Arc::new(client), Local::now().date_naive())
            .await?;

        print!("{}", crate::report::render(&state));
        Ok(())
    }

    /// Drive the event loop until every view has settled or the timeout hits
    pub async fn run_with_gateway(
        &self,
        gateway: GatewayRef,
        today: NaiveDate,
    ) -> Result<DashboardState> {
        let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel();

        let mut state = DashboardState::with_settings(today, &self.settings);
        let mut task_manager = BackgroundTaskManager::new();
        let data_loader = DataLoader::new(gateway, data_tx);

        self.init_data(&mut state, &mut task_manager, &data_loader);

        tracing::info!("Entering main event loop");

        let deadline = tokio::time::sleep(self.settle_timeout);
        tokio::pin!(deadline);
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = &mut deadline => {
                    tracing::warn!("Dashboard did not settle within {:?}", self.settle_timeout);
                    break;
                }
                _ = interval.tick() => {
                    executor::execute_command(
                        AppCommand::Tick,
                        &mut state,
                        &mut task_manager,
                        &data_loader,
                        Instant::now(),
                    );
                }
                Some(data_event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {:?}", data_event);
                    for command in reducer::reduce_data_event(&mut state, data_event) {
                        executor::execute_command(
                            command,
                            &mut state,
                            &mut task_manager,
                            &data_loader,
                            Instant::now(),
                        );
                    }
                }
            }

            task_manager.prune_finished();
            if state.should_quit || state.is_settled() {
                break;
            }
        }

        tracing::info!("Cleaning up ({} task(s) still running)", task_manager.running());
        task_manager.cancel_all();

        Ok(state)
    }

    fn init_data(
        &self,
        state: &mut DashboardState,
        task_manager: &mut BackgroundTaskManager,
        data_loader: &DataLoader,
    ) {
        tracing::info!("Loading accounts");
        // Views are planned once the account universe arrives
        executor::execute_command(
            AppCommand::LoadAccounts,
            state,
            task_manager,
            data_loader,
            Instant::now(),
        );
    }
}
