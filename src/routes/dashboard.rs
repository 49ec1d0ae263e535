use axum::{
    extract::{Extension, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    middleware::auth_guard::AuthUser,
    models::UserRole,
    services::clinic_resolution::{resolve, ClinicResolution},
    state::AppState,
};

#[derive(Serialize)]
struct DashboardUser {
    id:        Uuid,
    email:     Option<String>,
    full_name: Option<String>,
    role:      UserRole,
}

#[derive(Serialize)]
struct DashboardResponse {
    user:    DashboardUser,
    clinic:  ClinicResolution,
    section: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard",            get(overview))
        .route("/dashboard/{*section}", get(section))
}

async fn overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Json<DashboardResponse> {
    Json(render(&state, user, None).await)
}

async fn section(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(section): Path<String>,
) -> Json<DashboardResponse> {
    Json(render(&state, user, Some(section)).await)
}

/// Page context for the dashboard shell: who is signed in and which clinic
/// they are working in.
async fn render(state: &AppState, user: AuthUser, section: Option<String>) -> DashboardResponse {
    let store = user.store(state);
    let clinic = resolve(store.as_ref(), user.user_id, user.role).await;

    DashboardResponse {
        user: DashboardUser {
            id:        user.user_id,
            email:     user.email,
            full_name: user.full_name,
            role:      user.role,
        },
        clinic,
        section,
    }
}
