use crate::handlers::auth::LoginTemplate;
use crate::models::AuthUser;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

pub async fn index(session: Session) -> Response {
    match AuthUser::from_session(&session).await {
        Some(_) => Redirect::to("/dashboard").into_response(),
        None => LoginTemplate::default().into_response(),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
