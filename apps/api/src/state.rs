use std::sync::Arc;

use crate::career::CareerServices;
use crate::orchestrator::RequestTracker;
use crate::store::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub services: CareerServices,
    /// PostgreSQL when DATABASE_URL is set, in-memory otherwise.
    pub store: Arc<dyn ResultStore>,
    pub tracker: RequestTracker,
}
