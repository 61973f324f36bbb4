pub mod dashboard;
pub mod gateway;
pub mod metrics;
