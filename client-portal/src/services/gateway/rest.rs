//! HTTP gateway for a hosted backend exposing a token auth API under
//! `/auth/v1` and a row-filtering REST API under `/rest/v1`.

use super::{DataGateway, GatewayError, IdentityGateway};
use crate::config::GatewaySettings;
use crate::models::{Client, Identity, Invoice, SessionTokens, Subscription, SubscriptionStatus};
use crate::services::metrics::GATEWAY_REQUEST_DURATION_SECONDS;
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use service_core::observability::{TracedClientExt, TracedRequest};
use std::time::Duration;
use tracing::instrument;

pub struct RestGateway {
    client: reqwest::Client,
    base_url: String,
    anon_key: Secret<String>,
}

impl RestGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let anon_key = settings.anon_key.clone().ok_or_else(|| {
            GatewayError::Config("gateway.anon_key is required for the rest gateway".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: TracedRequest,
    ) -> Result<reqwest::Response, GatewayError> {
        let timer = GATEWAY_REQUEST_DURATION_SECONDS
            .with_label_values(&[operation])
            .start_timer();
        let result = request
            .header("apikey", self.anon_key.expose_secret())
            .send()
            .await;
        timer.observe_duration();

        result.map_err(|e| {
            tracing::error!(operation, error = %e, "Gateway request failed");
            GatewayError::from(e)
        })
    }

    async fn select_rows<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        table: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, GatewayError> {
        let request = self
            .client
            .traced_get(&self.table_url(table))
            .bearer_auth(access_token)
            .query(query);

        let response = error_for_status(self.send(operation, request).await?).await?;
        decode(response).await
    }
}

/// Map non-success responses: 401/403 mean the session is gone.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(GatewayError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "Gateway returned an error");
    Err(GatewayError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl IdentityGateway for RestGateway {
    #[instrument(skip_all)]
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, GatewayError> {
        let request = self
            .client
            .traced_post(&self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }));

        let response = self.send("sign_in", request).await?;
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            return Err(GatewayError::InvalidCredentials);
        }

        decode(error_for_status(response).await?).await
    }

    #[instrument(skip(self, access_token))]
    async fn resolve_identity(
        &self,
        access_token: &str,
    ) -> Result<Option<Identity>, GatewayError> {
        let request = self
            .client
            .traced_get(&self.auth_url("user"))
            .bearer_auth(access_token);

        match error_for_status(self.send("resolve_identity", request).await?).await {
            Ok(response) => decode(response).await.map(Some),
            Err(GatewayError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, access_token))]
    async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .traced_post(&self.auth_url("logout"))
            .bearer_auth(access_token);

        error_for_status(self.send("sign_out", request).await?).await?;
        Ok(())
    }
}

#[async_trait]
impl DataGateway for RestGateway {
    #[instrument(skip(self, access_token))]
    async fn find_client(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Option<Client>, GatewayError> {
        let rows: Vec<Client> = self
            .select_rows(
                "find_client",
                "clients",
                access_token,
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, access_token))]
    async fn current_subscription(
        &self,
        access_token: &str,
        client_id: &str,
    ) -> Result<Option<Subscription>, GatewayError> {
        let statuses = SubscriptionStatus::CURRENT
            .iter()
            .map(SubscriptionStatus::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let rows: Vec<Subscription> = self
            .select_rows(
                "current_subscription",
                "subscriptions",
                access_token,
                &[
                    ("select", "*,plans(*)".to_string()),
                    ("client_id", format!("eq.{}", client_id)),
                    ("status", format!("in.({})", statuses)),
                    ("order", "renew_date.asc".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, access_token))]
    async fn recent_invoices(
        &self,
        access_token: &str,
        client_id: &str,
        limit: usize,
    ) -> Result<Vec<Invoice>, GatewayError> {
        self.select_rows(
            "recent_invoices",
            "invoices",
            access_token,
            &[
                ("select", "*".to_string()),
                ("client_id", format!("eq.{}", client_id)),
                ("order", "period_end.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}
