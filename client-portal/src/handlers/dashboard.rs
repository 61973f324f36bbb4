use crate::dashboard::DashboardView;
use crate::models::AuthUser;
use crate::services::gateway::GatewayError;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use service_core::error::AppError;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub view: DashboardView,
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
) -> Response {
    match state.dashboard.render(&user).await {
        Ok(view) => DashboardTemplate {
            email: user.email,
            view,
        }
        .into_response(),
        Err(GatewayError::Unauthorized) => {
            end_session(&session).await;
            Redirect::to("/login").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn api_dashboard(
    State(state): State<AppState>,
    session: Session,
    user: AuthUser,
) -> Result<Json<DashboardView>, AppError> {
    match state.dashboard.render(&user).await {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            if matches!(e, GatewayError::Unauthorized) {
                end_session(&session).await;
            }
            Err(e.into())
        }
    }
}

async fn end_session(session: &Session) {
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to flush session");
    }
}
