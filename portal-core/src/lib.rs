//! portal-core: Shared infrastructure for the document request portal.
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
pub use validator;
