pub mod backend_client;
pub mod in_flight;
pub mod metrics;

pub use backend_client::{BackendClient, BackendError};
pub use in_flight::{InFlightActions, InFlightGuard};
