use std::sync::Arc;

use crate::config::ServerConfig;
use crate::invalidation::Invalidations;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sacristy_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Post-mutation view invalidation signal.
    pub invalidations: Arc<Invalidations>,
}
