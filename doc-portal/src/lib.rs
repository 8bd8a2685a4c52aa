pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use services::{BackendClient, InFlightActions};
use std::sync::Arc;

/// Shared application state: the backend client and the rows currently
/// being actioned.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub in_flight: InFlightActions,
}

impl AppState {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self {
            backend,
            in_flight: InFlightActions::new(),
        }
    }
}
