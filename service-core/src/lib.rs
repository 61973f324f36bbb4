//! service-core: shared HTTP infrastructure (errors, tracing, middleware).
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
