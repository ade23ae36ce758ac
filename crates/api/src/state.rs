use std::sync::Arc;

use dialplan_mi::MiExecutor;

use crate::config::ServerConfig;
use crate::sync::DialplanSync;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (read by the API key extractor and health check).
    pub config: Arc<ServerConfig>,
    /// Dial-plan synchronizer; owns the pool and the MI client.
    pub sync: Arc<DialplanSync>,
}

impl AppState {
    pub fn new(
        pool: dialplan_db::DbPool,
        config: Arc<ServerConfig>,
        mi: Arc<dyn MiExecutor>,
    ) -> Self {
        let sync = Arc::new(DialplanSync::new(pool, mi));
        Self { config, sync }
    }
}
