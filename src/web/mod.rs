pub mod handlers;
pub mod models;
pub mod routes;

use crate::relay::Relay;

// Shared, read-only state for every worker
pub struct AppState {
    pub relay: Relay,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self { relay }
    }
}
