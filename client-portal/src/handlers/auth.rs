use crate::models::AuthUser;
use crate::services::gateway::GatewayError;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;
use validator::Validate;

#[derive(Template, Default)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

impl LoginTemplate {
    fn failed(email: &str, error: &str) -> Self {
        Self {
            email: email.to_string(),
            error: Some(error.to_string()),
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate::default()
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Response {
    let email = payload.email.trim();

    if payload.validate().is_err() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate::failed(email, "Enter a valid email and password"),
        )
            .into_response();
    }

    let tokens = match state.identity.sign_in(email, &payload.password).await {
        Ok(tokens) => tokens,
        Err(GatewayError::InvalidCredentials) => {
            tracing::info!("Rejected sign-in attempt");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                LoginTemplate::failed(email, "Invalid email or password"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Sign-in failed");
            return (
                StatusCode::BAD_GATEWAY,
                LoginTemplate::failed(email, "Sign-in is unavailable, please try again later"),
            )
                .into_response();
        }
    };

    match AuthUser::store(&session, &tokens).await {
        Ok(user) => {
            tracing::info!(user_id = %user.user_id, "User logged in successfully");
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => AppError::SessionError(e.to_string()).into_response(),
    }
}

pub async fn logout_handler(State(state): State<AppState>, session: Session) -> Redirect {
    if let Some(user) = AuthUser::from_session(&session).await {
        // Revocation is best-effort; the local session is cleared regardless.
        match state.identity.sign_out(&user.access_token).await {
            Ok(()) => tracing::info!(user_id = %user.user_id, "Session revoked"),
            Err(e) => tracing::warn!(user_id = %user.user_id, error = %e, "Failed to revoke session"),
        }
    }

    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to flush session");
    }

    Redirect::to("/")
}
