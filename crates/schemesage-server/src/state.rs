//! Shared application state.

use chrono::{DateTime, Utc};
use schemesage_runtime::Engine;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub engine: Engine,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            started_at: Utc::now(),
        }
    }
}
