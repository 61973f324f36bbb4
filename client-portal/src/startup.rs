use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::middleware::{
    request_id_middleware, security_headers_middleware, RequestId, SecurityHeaders,
};
use std::sync::Arc;
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{DashboardSettings, GatewayKind, ServerSettings, Settings};
use crate::dashboard::{Aggregator, Clock, SystemClock};
use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page, logout_handler},
    dashboard::{api_dashboard, dashboard_handler},
    metrics::metrics,
};
use crate::middleware::{
    auth::{api_auth_middleware, auth_middleware},
    metrics::metrics_middleware,
};
use crate::services::dashboard::DashboardService;
use crate::services::gateway::{DataGateway, FixtureGateway, IdentityGateway, RestGateway};
use crate::AppState;

pub fn build_router(state: AppState, server: &ServerSettings, security: SecurityHeaders) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            server.session_idle_hours,
        )));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler).post(logout_handler))
        .route(
            "/dashboard",
            get(dashboard_handler)
                .layer(from_fn_with_state(state.clone(), auth_middleware)),
        )
        .route(
            "/api/dashboard",
            get(api_dashboard).layer(from_fn_with_state(state.clone(), api_auth_middleware)),
        )
        .nest_service("/static", ServeDir::new(&server.static_dir))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn_with_state(security, security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.as_str())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Content-Security-Policy for the portal pages; admits the avatar service.
pub fn security_headers(dashboard: &DashboardSettings) -> anyhow::Result<SecurityHeaders> {
    let avatar_origin = dashboard.avatar_origin();
    let img_origins: Vec<&str> = avatar_origin.as_deref().into_iter().collect();
    Ok(SecurityHeaders::pages(&img_origins)?)
}

/// Wire one backend serving both gateway halves into the application state.
pub fn assemble_state<G>(gateway: Arc<G>, clock: Arc<dyn Clock>, dashboard: &DashboardSettings) -> AppState
where
    G: IdentityGateway + DataGateway + 'static,
{
    let service = DashboardService::new(
        gateway.clone(),
        clock,
        Aggregator::new(dashboard.recent_paid_window_days),
        dashboard.invoice_limit,
        dashboard.links(),
    );

    AppState::new(gateway, Arc::new(service))
}

pub async fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let state = match settings.gateway.kind {
        GatewayKind::Rest => {
            let gateway = RestGateway::new(&settings.gateway)?;
            tracing::info!(url = %settings.gateway.url, "Using REST gateway");
            assemble_state(Arc::new(gateway), clock, &settings.dashboard)
        }
        GatewayKind::Fixture => {
            let path = settings.gateway.fixture_path.as_deref().ok_or_else(|| {
                anyhow::anyhow!("gateway.fixture_path is required for the fixture gateway")
            })?;
            let gateway = FixtureGateway::from_path(path).await?;
            assemble_state(Arc::new(gateway), clock, &settings.dashboard)
        }
    };

    Ok(state)
}
