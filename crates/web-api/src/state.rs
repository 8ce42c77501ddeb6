use playwatch_collector::CycleRunner;
use playwatch_growth::StatsQueries;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub queries: Arc<StatsQueries>,
    pub ingestion: Arc<dyn CycleRunner>,
}

impl AppState {
    #[must_use]
    pub fn new(queries: Arc<StatsQueries>, ingestion: Arc<dyn CycleRunner>) -> Self {
        Self { queries, ingestion }
    }
}
