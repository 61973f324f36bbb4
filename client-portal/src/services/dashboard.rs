use crate::dashboard::{Aggregator, Clock, DashboardData, DashboardLinks, DashboardView};
use crate::models::AuthUser;
use crate::services::gateway::{DataGateway, GatewayError};
use crate::services::metrics::DASHBOARD_RENDERS_TOTAL;
use std::sync::Arc;
use tracing::instrument;

/// Loads a signed-in user's rows and turns them into a [`DashboardView`].
///
/// Only a rejected session is an error. Any other lookup failure is logged
/// and the affected section renders empty.
pub struct DashboardService {
    data: Arc<dyn DataGateway>,
    clock: Arc<dyn Clock>,
    aggregator: Aggregator,
    invoice_limit: usize,
    links: DashboardLinks,
}

impl DashboardService {
    pub fn new(
        data: Arc<dyn DataGateway>,
        clock: Arc<dyn Clock>,
        aggregator: Aggregator,
        invoice_limit: usize,
        links: DashboardLinks,
    ) -> Self {
        Self {
            data,
            clock,
            aggregator,
            invoice_limit,
            links,
        }
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn render(&self, user: &AuthUser) -> Result<DashboardView, GatewayError> {
        let (data, outcome) = match self.load(user).await {
            Ok(loaded) => loaded,
            Err(e) => {
                DASHBOARD_RENDERS_TOTAL
                    .with_label_values(&["unauthorized"])
                    .inc();
                return Err(e);
            }
        };
        DASHBOARD_RENDERS_TOTAL.with_label_values(&[outcome]).inc();

        let summary = self.aggregator.summarize(
            data.subscription.as_ref(),
            &data.invoices,
            self.clock.today(),
        );

        Ok(DashboardView::build(
            &data,
            summary,
            &self.links,
            self.aggregator.recent_paid_window_days(),
        ))
    }

    /// Fetch the dashboard rows, reporting how complete they are.
    pub async fn load(
        &self,
        user: &AuthUser,
    ) -> Result<(DashboardData, &'static str), GatewayError> {
        let token = user.access_token.as_str();

        let client = match self.data.find_client(token, &user.user_id).await {
            Ok(Some(client)) => client,
            Ok(None) => {
                tracing::info!(user_id = %user.user_id, "No client record for user");
                return Ok((DashboardData::default(), "no_client"));
            }
            Err(GatewayError::Unauthorized) => return Err(GatewayError::Unauthorized),
            Err(e) => {
                tracing::error!(user_id = %user.user_id, error = %e, "Failed to load client");
                return Ok((DashboardData::default(), "degraded"));
            }
        };

        let (subscription, invoices) = tokio::join!(
            self.data.current_subscription(token, &client.client_id),
            self.data
                .recent_invoices(token, &client.client_id, self.invoice_limit),
        );

        let mut outcome = "ok";

        let subscription = match subscription {
            Ok(subscription) => subscription,
            Err(GatewayError::Unauthorized) => return Err(GatewayError::Unauthorized),
            Err(e) => {
                tracing::warn!(client_id = %client.client_id, error = %e, "Failed to load subscription");
                outcome = "degraded";
                None
            }
        };

        let invoices = match invoices {
            Ok(invoices) => invoices,
            Err(GatewayError::Unauthorized) => return Err(GatewayError::Unauthorized),
            Err(e) => {
                tracing::warn!(client_id = %client.client_id, error = %e, "Failed to load invoices");
                outcome = "degraded";
                Vec::new()
            }
        };

        Ok((
            DashboardData {
                client: Some(client),
                subscription,
                invoices,
            },
            outcome,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{FixedClock, Summary};
    use crate::models::{Client, Invoice, InvoiceStatus, Subscription};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Client lookup succeeds; the other two calls fail as configured.
    struct FlakyGateway {
        subscription_error: Option<fn() -> GatewayError>,
        invoices_error: Option<fn() -> GatewayError>,
    }

    #[async_trait]
    impl DataGateway for FlakyGateway {
        async fn find_client(
            &self,
            _access_token: &str,
            user_id: &str,
        ) -> Result<Option<Client>, GatewayError> {
            Ok(Some(Client {
                client_id: "c-1".to_string(),
                user_id: user_id.to_string(),
                name: "Ada".to_string(),
                company_name: Some("Analytical Engines".to_string()),
                email: "ada@example.com".to_string(),
            }))
        }

        async fn current_subscription(
            &self,
            _access_token: &str,
            _client_id: &str,
        ) -> Result<Option<Subscription>, GatewayError> {
            match self.subscription_error {
                Some(err) => Err(err()),
                None => Ok(None),
            }
        }

        async fn recent_invoices(
            &self,
            _access_token: &str,
            client_id: &str,
            _limit: usize,
        ) -> Result<Vec<Invoice>, GatewayError> {
            match self.invoices_error {
                Some(err) => Err(err()),
                None => Ok(vec![Invoice {
                    invoice_id: "i-1".to_string(),
                    client_id: client_id.to_string(),
                    subscription_id: None,
                    number: "INV-001".to_string(),
                    period_start: "2026-10-01".to_string(),
                    period_end: "2026-10-31".to_string(),
                    amount_idr: 1_500_000,
                    status: InvoiceStatus::Open,
                    payment_due_date: "2026-11-07".to_string(),
                    pdf_url: None,
                }]),
            }
        }
    }

    fn service(gateway: FlakyGateway) -> DashboardService {
        DashboardService::new(
            Arc::new(gateway),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())),
            Aggregator::default(),
            10,
            DashboardLinks {
                support_email: "support@example.com".to_string(),
                billing_email: "billing@example.com".to_string(),
                avatar_base_url: "https://avatars.example/svg".to_string(),
            },
        )
    }

    fn user() -> AuthUser {
        AuthUser {
            user_id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            access_token: "token".to_string(),
        }
    }

    #[tokio::test]
    async fn subscription_failure_degrades_to_no_subscription() {
        let service = service(FlakyGateway {
            subscription_error: Some(|| GatewayError::Decode("bad row".to_string())),
            invoices_error: None,
        });

        let view = service.render(&user()).await.unwrap();

        assert_eq!(view.summary.open_invoice_count, 1);
        assert_eq!(view.summary.next_renewal_date, Summary::UNKNOWN);
        assert!(!view.subscription.has_subscription);
    }

    #[tokio::test]
    async fn invoice_failure_degrades_to_empty_list() {
        let service = service(FlakyGateway {
            subscription_error: None,
            invoices_error: Some(|| GatewayError::UnexpectedStatus {
                status: 503,
                body: String::new(),
            }),
        });

        let (data, outcome) = service.load(&user()).await.unwrap();

        assert_eq!(outcome, "degraded");
        assert!(data.client.is_some());
        assert!(data.invoices.is_empty());
    }

    #[tokio::test]
    async fn rejected_session_is_propagated() {
        let service = service(FlakyGateway {
            subscription_error: None,
            invoices_error: Some(|| GatewayError::Unauthorized),
        });

        assert!(matches!(
            service.render(&user()).await,
            Err(GatewayError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn greets_client_by_name() {
        let service = service(FlakyGateway {
            subscription_error: None,
            invoices_error: None,
        });

        let view = service.render(&user()).await.unwrap();

        assert!(view.greeting.starts_with("Welcome back, "));
        assert_eq!(view.invoices.len(), 1);
    }
}
