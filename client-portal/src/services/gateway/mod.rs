//! The identity and data gateway: the managed backend that authenticates
//! users and serves client, subscription and invoice rows.

mod fixture;
mod rest;

pub use fixture::{FixtureData, FixtureGateway, FixtureUser};
pub use rest::RestGateway;

use crate::models::{Client, Identity, Invoice, SessionTokens, Subscription};
use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session rejected by gateway")]
    Unauthorized,

    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to decode gateway response: {0}")]
    Decode(String),

    #[error("fixture error: {0}")]
    Fixture(String),

    #[error("gateway misconfigured: {0}")]
    Config(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidCredentials | GatewayError::Unauthorized => {
                AppError::Unauthorized(anyhow::Error::new(err))
            }
            GatewayError::Transport(_)
            | GatewayError::UnexpectedStatus { .. }
            | GatewayError::Decode(_) => AppError::BadGateway(err.to_string()),
            GatewayError::Fixture(_) => AppError::InternalError(anyhow::Error::new(err)),
            GatewayError::Config(_) => AppError::ConfigError(anyhow::Error::new(err)),
        }
    }
}

/// Authentication half of the gateway.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Exchange email and password for session tokens.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, GatewayError>;

    /// Resolve an access token to its identity; `None` when the session is
    /// no longer valid.
    async fn resolve_identity(&self, access_token: &str)
        -> Result<Option<Identity>, GatewayError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError>;
}

/// Row lookups, always on behalf of a signed-in user.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// The client record owned by `user_id`, if any.
    async fn find_client(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Option<Client>, GatewayError>;

    /// The client's current subscription joined with its plan.
    async fn current_subscription(
        &self,
        access_token: &str,
        client_id: &str,
    ) -> Result<Option<Subscription>, GatewayError>;

    /// The client's latest `limit` invoices by `period_end`, newest first.
    async fn recent_invoices(
        &self,
        access_token: &str,
        client_id: &str,
        limit: usize,
    ) -> Result<Vec<Invoice>, GatewayError>;
}
