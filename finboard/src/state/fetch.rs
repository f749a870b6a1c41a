use crate::error::DashboardError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    /// First load: nothing to show yet
    Loading,
    Ready,
    /// Reload with previous data still on screen
    Refreshing,
}

/// Outcome of [`FetchState::plan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// Same inputs as the last request
    Skip,
    /// Nothing to fetch; data was cleared and the view marked ready
    Empty,
    Fetch { generation: u64 },
}

/// Request bookkeeping for one remote-backed view.
///
/// Every planned request bumps `generation`; completions carrying an older
/// generation are dropped, so the last request always wins.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    phase: FetchPhase,
    data: Option<T>,
    error: Option<DashboardError>,
    has_loaded: bool,
    last_signature: Option<String>,
    generation: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            phase: FetchPhase::Idle,
            data: None,
            error: None,
            has_loaded: false,
            last_signature: None,
            generation: 0,
        }
    }
}

impl<T> FetchState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&DashboardError> {
        self.error.as_ref()
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Blocking first load
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == FetchPhase::Refreshing
    }

    pub fn is_in_flight(&self) -> bool {
        self.is_loading() || self.is_refreshing()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Decide whether inputs described by `signature` need a request.
    ///
    /// `selection_empty` short-circuits to an empty, completed view without a
    /// request. `force` bypasses the unchanged-signature check.
    pub fn plan(&mut self, signature: String, selection_empty: bool, force: bool) -> FetchPlan {
        if !force && self.last_signature.as_deref() == Some(signature.as_str()) {
            return FetchPlan::Skip;
        }

        self.last_signature = Some(signature);
        self.generation += 1;
        self.error = None;

        if selection_empty {
            self.data = None;
            self.has_loaded = true;
            self.phase = FetchPhase::Ready;
            return FetchPlan::Empty;
        }

        self.phase = if self.has_loaded {
            FetchPhase::Refreshing
        } else {
            FetchPhase::Loading
        };
        FetchPlan::Fetch {
            generation: self.generation,
        }
    }

    /// Store a response. Returns false when `generation` has been superseded.
    pub fn complete(&mut self, generation: u64, result: Result<T, DashboardError>) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(
                "Dropping stale response (generation {} < {})",
                generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.has_loaded = true;
            }
            Err(error) => {
                // Same inputs must be retryable after a failure
                self.last_signature = None;
                self.error = Some(error);
            }
        }
        self.phase = FetchPhase::Ready;
        true
    }
}
