pub mod config;
pub mod dashboard;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use services::dashboard::DashboardService;
use services::gateway::IdentityGateway;
use std::sync::Arc;

/// Shared application state: the identity gateway and the dashboard loader
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityGateway>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityGateway>, dashboard: Arc<DashboardService>) -> Self {
        Self {
            identity,
            dashboard,
        }
    }
}
