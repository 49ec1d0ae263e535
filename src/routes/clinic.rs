//! Clinic-scoped data. Every handler resolves the caller's clinic first and
//! filters by it.

use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    middleware::auth_guard::AuthUser,
    models::{CommissionWithRelations, LeadWithRelations},
    services::clinic_resolution::{resolve, ClinicResolution},
    state::AppState,
    store::ClinicStore,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clinic",      get(current_clinic))
        .route("/leads",       get(list_leads))
        .route("/commissions", get(list_commissions))
}

/// Resolved clinic id, or 403 with the resolution's message.
async fn clinic_scope(store: &dyn ClinicStore, user: &AuthUser) -> AppResult<Uuid> {
    let resolution = resolve(store, user.user_id, user.role).await;
    match resolution.clinic_id {
        Some(id) if resolution.success => Ok(id),
        _ => Err(AppError::Forbidden(
            resolution
                .error
                .unwrap_or_else(|| "No clinic available".to_owned()),
        )),
    }
}

/// GET /clinic — the resolution result as-is, failures included.
async fn current_clinic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Json<ClinicResolution> {
    let store = user.store(&state);
    Json(resolve(store.as_ref(), user.user_id, user.role).await)
}

/// GET /leads — leads of the caller's clinic, newest first.
async fn list_leads(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<LeadWithRelations>>> {
    let store = user.store(&state);
    let clinic_id = clinic_scope(store.as_ref(), &user).await?;
    Ok(Json(store.list_leads(clinic_id).await?))
}

/// GET /commissions
async fn list_commissions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<CommissionWithRelations>>> {
    let store = user.store(&state);
    let clinic_id = clinic_scope(store.as_ref(), &user).await?;
    Ok(Json(store.list_commissions(clinic_id).await?))
}
