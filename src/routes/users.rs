use axum::{extract::Extension, routing::get, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::{middleware::auth_guard::AuthUser, models::UserRole, state::AppState};

#[derive(Serialize)]
struct MeResponse {
    id:        Uuid,
    email:     Option<String>,
    full_name: Option<String>,
    role:      UserRole,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// GET /me — profile of the signed-in user.
async fn me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        id:        user.user_id,
        email:     user.email,
        full_name: user.full_name,
        role:      user.role,
    })
}
