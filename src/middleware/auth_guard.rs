//! Authentication guard middleware.
//!
//! Takes the `SessionUser` the session middleware attached, loads the user's
//! profile row under their own token, and injects an `AuthUser` extension for
//! downstream handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    auth::SessionUser,
    errors::{AppError, AppResult},
    models::{UserRole, UserStatus},
    state::AppState,
    store::ClinicStore,
};

/// Authenticated user with a loaded profile. Injected into request
/// extensions by `require_auth`; downstream handlers use `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id:      Uuid,
    pub email:        Option<String>,
    pub full_name:    Option<String>,
    pub role:         UserRole,
    pub access_token: String,
}

impl AuthUser {
    /// Data store acting with this user's credentials.
    pub fn store(&self, state: &AppState) -> Box<dyn ClinicStore> {
        state.stores.for_user(&self.access_token)
    }
}

/// Middleware: require a signed-in user with an active profile.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let session = req
        .extensions()
        .get::<SessionUser>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let store = state.stores.for_user(&session.access_token);
    let profile = store
        .find_user(session.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if profile.status != UserStatus::Active {
        tracing::info!(
            user_id = %profile.id,
            status = ?profile.status,
            "Rejected inactive account"
        );
        return Err(AppError::Forbidden("Account is not active".into()));
    }

    req.extensions_mut().insert(AuthUser {
        user_id:      profile.id,
        email:        profile.email.or(session.email),
        full_name:    profile.full_name,
        role:         profile.role,
        access_token: session.access_token,
    });

    Ok(next.run(req).await)
}
