use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    auth::cookies::{clear_session_cookies, read_tokens, set_session_cookies},
    errors::{AppError, AppResult},
    state::AppState,
    supabase::ClientError,
};

// ── Request / response types ──────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    email:    String,
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    id:    Uuid,
    email: Option<String>,
}

// ── Router ────────────────────────────────────────────────────

/// Login page routes; the session middleware keeps signed-in users away.
pub fn router() -> Router<AppState> {
    Router::new().route("/auth/login", get(login_page).post(login))
}

/// Session routes under `/api/v1`, reachable with or without a session.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/session/logout", post(logout))
}

// ── Handlers ──────────────────────────────────────────────────

/// GET /auth/login — the login form lives in the frontend; this only says
/// where to post credentials.
async fn login_page(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message":  "Sign in with POST /auth/login",
        "site_url": state.config.site_url,
    }))
}

/// POST /auth/login — password sign-in against the auth service.
async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".into()));
    }

    let session = state
        .auth
        .sign_in(email, &body.password)
        .await
        .map_err(|e| match e {
            ClientError::Api { status, .. } if status.is_client_error() => AppError::Unauthorized,
            other => AppError::Upstream(other),
        })?;

    set_session_cookies(&cookies, &session, !state.config.is_development());
    tracing::info!(user_id = %session.user.id, "User signed in");

    Ok(Json(SessionResponse {
        id:    session.user.id,
        email: session.user.email,
    }))
}

/// POST /api/v1/session/logout — revoke the session and drop its cookies.
async fn logout(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    if let Some(token) = read_tokens(&cookies).access_token {
        if let Err(err) = state.auth.sign_out(&token).await {
            tracing::warn!(error = %err, "Sign-out call failed, clearing cookies anyway");
        }
    }
    clear_session_cookies(&cookies);
    StatusCode::NO_CONTENT
}
