//! In-process gateway over JSON fixture collections.
//!
//! Lookups are plain filtering and sorting over the loaded rows, mirroring
//! the predicates the REST gateway sends upstream.

use super::{DataGateway, GatewayError, IdentityGateway};
use crate::dashboard::{select_current_subscription, select_recent_invoices};
use crate::models::{Client, Identity, Invoice, Plan, SessionTokens, Subscription};
use async_trait::async_trait;
use dashmap::DashMap;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

#[derive(Deserialize, Clone)]
pub struct FixtureUser {
    pub id: String,
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Deserialize, Clone, Default)]
pub struct FixtureData {
    #[serde(default)]
    pub users: Vec<FixtureUser>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

/// Demo gateway over [`FixtureData`].
///
/// Issued tokens live in memory until `sign_out`; abandoned sessions are never
/// evicted, so this is not meant for long-running deployments.
pub struct FixtureGateway {
    data: FixtureData,
    sessions: DashMap<String, Identity>,
}

impl FixtureGateway {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data,
            sessions: DashMap::new(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            GatewayError::Fixture(format!("failed to read {}: {}", path.display(), e))
        })?;
        let data: FixtureData = serde_json::from_str(&raw).map_err(|e| {
            GatewayError::Fixture(format!("failed to parse {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            users = data.users.len(),
            clients = data.clients.len(),
            invoices = data.invoices.len(),
            "Loaded gateway fixture"
        );

        Ok(Self::new(data))
    }

    fn authorize(&self, access_token: &str) -> Result<Identity, GatewayError> {
        self.sessions
            .get(access_token)
            .map(|entry| entry.value().clone())
            .ok_or(GatewayError::Unauthorized)
    }

    fn plan(&self, plan_id: &str) -> Option<Plan> {
        self.data
            .plans
            .iter()
            .find(|plan| plan.plan_id == plan_id)
            .cloned()
    }
}

#[async_trait]
impl IdentityGateway for FixtureGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, GatewayError> {
        let user = self
            .data
            .users
            .iter()
            .find(|user| {
                user.email.eq_ignore_ascii_case(email.trim())
                    && user.password.expose_secret() == password
            })
            .ok_or(GatewayError::InvalidCredentials)?;

        let identity = Identity {
            id: user.id.clone(),
            email: user.email.clone(),
        };
        let access_token = Uuid::new_v4().to_string();
        self.sessions.insert(access_token.clone(), identity.clone());

        Ok(SessionTokens {
            access_token,
            refresh_token: Some(Uuid::new_v4().to_string()),
            user: identity,
        })
    }

    async fn resolve_identity(
        &self,
        access_token: &str,
    ) -> Result<Option<Identity>, GatewayError> {
        Ok(self.authorize(access_token).ok())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        self.sessions.remove(access_token);
        Ok(())
    }
}

#[async_trait]
impl DataGateway for FixtureGateway {
    async fn find_client(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Option<Client>, GatewayError> {
        self.authorize(access_token)?;

        Ok(self
            .data
            .clients
            .iter()
            .find(|client| client.user_id == user_id)
            .cloned())
    }

    async fn current_subscription(
        &self,
        access_token: &str,
        client_id: &str,
    ) -> Result<Option<Subscription>, GatewayError> {
        self.authorize(access_token)?;

        let owned: Vec<Subscription> = self
            .data
            .subscriptions
            .iter()
            .filter(|sub| sub.client_id == client_id)
            .cloned()
            .collect();

        Ok(select_current_subscription(&owned).cloned().map(|mut sub| {
            if sub.plan.is_none() {
                sub.plan = sub.plan_id.as_deref().and_then(|id| self.plan(id));
            }
            sub
        }))
    }

    async fn recent_invoices(
        &self,
        access_token: &str,
        client_id: &str,
        limit: usize,
    ) -> Result<Vec<Invoice>, GatewayError> {
        self.authorize(access_token)?;

        let owned: Vec<Invoice> = self
            .data
            .invoices
            .iter()
            .filter(|invoice| invoice.client_id == client_id)
            .cloned()
            .collect();

        Ok(select_recent_invoices(&owned, limit))
    }
}
