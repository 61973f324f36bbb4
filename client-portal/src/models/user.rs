use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_ID_KEY: &str = "user_id";
pub const EMAIL_KEY: &str = "email";

/// Authenticated identity as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// Result of a password sign-in. Only the access token is kept in the
/// session; there is no refresh flow.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: Identity,
}

/// Authenticated user context extracted from the session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

impl AuthUser {
    /// Read the signed-in user from the session, if there is one.
    pub async fn from_session(session: &Session) -> Option<Self> {
        let access_token = read_key(session, ACCESS_TOKEN_KEY).await;
        let user_id = read_key(session, USER_ID_KEY).await;
        let email = read_key(session, EMAIL_KEY).await;

        match (access_token, user_id) {
            (Some(access_token), Some(user_id)) => Some(AuthUser {
                user_id,
                email: email.unwrap_or_default(),
                access_token,
            }),
            _ => None,
        }
    }

    /// Persist a fresh sign-in into the session, rotating the session id.
    pub async fn store(
        session: &Session,
        tokens: &SessionTokens,
    ) -> Result<Self, tower_sessions::session::Error> {
        session.cycle_id().await?;
        session.insert(ACCESS_TOKEN_KEY, &tokens.access_token).await?;
        session.insert(USER_ID_KEY, &tokens.user.id).await?;
        session.insert(EMAIL_KEY, &tokens.user.email).await?;

        Ok(AuthUser {
            user_id: tokens.user.id.clone(),
            email: tokens.user.email.clone(),
            access_token: tokens.access_token.clone(),
        })
    }
}

/// A session-store failure reads as signed out, but is logged.
async fn read_key(session: &Session, key: &str) -> Option<String> {
    match session.get::<String>(key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to read session");
            None
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware once the gateway has confirmed the session.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        match AuthUser::from_session(&session).await {
            Some(user) => Ok(user),
            None => Err(Redirect::to("/login").into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::session::{Id, Record};
    use tower_sessions::session_store::{self, SessionStore};
    use tower_sessions::MemoryStore;

    #[derive(Debug, Clone)]
    struct UnavailableStore;

    #[async_trait]
    impl SessionStore for UnavailableStore {
        async fn save(&self, _record: &Record) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store offline".to_string()))
        }

        async fn load(&self, _session_id: &Id) -> session_store::Result<Option<Record>> {
            Err(session_store::Error::Backend("store offline".to_string()))
        }

        async fn delete(&self, _session_id: &Id) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store offline".to_string()))
        }
    }

    fn tokens() -> SessionTokens {
        SessionTokens {
            access_token: "jwt".to_string(),
            refresh_token: Some("refresh".to_string()),
            user: Identity {
                id: "u-1".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn stored_user_reads_back() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        AuthUser::store(&session, &tokens()).await.unwrap();
        let user = AuthUser::from_session(&session).await.unwrap();

        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.access_token, "jwt");
        assert_eq!(session.get::<String>("refresh_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unreadable_store_reads_as_signed_out() {
        let session = Session::new(Some(Id::default()), Arc::new(UnavailableStore), None);

        assert!(session.get::<String>(ACCESS_TOKEN_KEY).await.is_err());
        assert!(AuthUser::from_session(&session).await.is_none());
    }
}
