pub mod cookies;

use async_trait::async_trait;
use uuid::Uuid;

use crate::supabase::{auth::Session, Client, ClientError};

// ── Session state ─────────────────────────────────────────────

/// Tokens read from the request's session cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token:  Option<String>,
    pub refresh_token: Option<String>,
}

/// Signed-in user as seen by the auth service. Placed in request extensions
/// by the session middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id:           Uuid,
    pub email:        Option<String>,
    pub access_token: String,
}

/// What the lookup did to the session cookies.
#[derive(Debug, Clone)]
pub enum SessionChange {
    Unchanged,
    Refreshed(Session),
    /// Tokens were rejected and should be dropped.
    Expired,
}

#[derive(Debug, Clone)]
pub struct UserLookup {
    pub user:   Option<SessionUser>,
    pub change: SessionChange,
}

impl UserLookup {
    pub fn anonymous() -> Self {
        Self { user: None, change: SessionChange::Unchanged }
    }
}

// ── Provider ──────────────────────────────────────────────────

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the current user from session tokens, refreshing them when the
    /// access token has expired.
    async fn get_user(&self, tokens: &SessionTokens) -> Result<UserLookup, ClientError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl AuthProvider for Client {
    async fn get_user(&self, tokens: &SessionTokens) -> Result<UserLookup, ClientError> {
        if let Some(ref access_token) = tokens.access_token {
            if let Some(identity) = self.get_identity(access_token).await? {
                return Ok(UserLookup {
                    user: Some(SessionUser {
                        id:           identity.id,
                        email:        identity.email,
                        access_token: access_token.clone(),
                    }),
                    change: SessionChange::Unchanged,
                });
            }
        }

        let Some(ref refresh_token) = tokens.refresh_token else {
            return Ok(match tokens.access_token {
                Some(_) => UserLookup { user: None, change: SessionChange::Expired },
                None => UserLookup::anonymous(),
            });
        };

        match self.refresh_session(refresh_token).await? {
            Some(session) => {
                tracing::debug!(user_id = %session.user.id, "Session refreshed");
                Ok(UserLookup {
                    user: Some(SessionUser {
                        id:           session.user.id,
                        email:        session.user.email.clone(),
                        access_token: session.access_token.clone(),
                    }),
                    change: SessionChange::Refreshed(session),
                })
            }
            None => Ok(UserLookup { user: None, change: SessionChange::Expired }),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        self.sign_in_with_password(email, password).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ClientError> {
        self.logout(access_token).await
    }
}
