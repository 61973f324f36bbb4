use crate::models::AuthUser;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use service_core::error::AppError;
use tower_sessions::Session;

/// How a guarded route answers a missing or rejected session.
#[derive(Clone, Copy)]
enum Guard {
    Page,
    Api,
}

impl Guard {
    fn reject(self) -> Response {
        match self {
            Guard::Page => Redirect::to("/login").into_response(),
            Guard::Api => (StatusCode::UNAUTHORIZED, "Not signed in").into_response(),
        }
    }
}

/// Session guard for HTML pages: redirects to `/login`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Response {
    guard(Guard::Page, state, session, request, next).await
}

/// Session guard for JSON endpoints: answers 401.
pub async fn api_auth_middleware(
    State(state): State<AppState>,
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Response {
    guard(Guard::Api, state, session, request, next).await
}

async fn guard(
    mode: Guard,
    state: AppState,
    session: Session,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(user) = AuthUser::from_session(&session).await else {
        return mode.reject();
    };

    match state.identity.resolve_identity(&user.access_token).await {
        Ok(Some(identity)) if identity.id == user.user_id => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(_) => {
            tracing::info!(user_id = %user.user_id, "Session no longer valid");
            if let Err(e) = session.flush().await {
                tracing::error!(error = %e, "Failed to flush session");
            }
            mode.reject()
        }
        Err(e) => {
            tracing::error!(user_id = %user.user_id, error = %e, "Failed to resolve session");
            AppError::from(e).into_response()
        }
    }
}
