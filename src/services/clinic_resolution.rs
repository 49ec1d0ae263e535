//! Clinic resolution: decide which clinic a signed-in user operates against.
//!
//! The strategy is picked from the user's role. Admins get the full
//! lookup → fallback → provision chain and may create rows on the way; all
//! other roles only look up an existing association. Callers always receive a
//! [`ClinicResolution`]; failures are reported inside it, never raised.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{ClinicStatus, NewClinic, UserRole},
    store::ClinicStore,
    supabase::ClientError,
};

pub const DEFAULT_CLINIC_NAME: &str = "Default Clinic";
const FALLBACK_MESSAGE: &str = "Unknown error while resolving clinic";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicResolution {
    pub clinic_id: Option<Uuid>,
    pub error:     Option<String>,
    pub success:   bool,
    /// `false` when a clinic was chosen but the association write failed.
    pub linked:    bool,
}

impl ClinicResolution {
    fn resolved(found: Resolved) -> Self {
        Self {
            clinic_id: Some(found.clinic_id),
            error:     None,
            success:   true,
            linked:    found.linked,
        }
    }

    fn failed(err: &ResolveError) -> Self {
        let message = err.to_string();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_owned()
        } else {
            message
        };
        Self {
            clinic_id: None,
            error:     Some(message),
            success:   false,
            linked:    false,
        }
    }
}

#[derive(Debug, Error)]
enum ResolveError {
    #[error("{0}")]
    Lookup(ClientError),
    #[error("User is not associated with any active clinic")]
    NotAssociated,
    #[error("Failed to create clinic: {0}")]
    CreateClinic(ClientError),
}

#[derive(Debug, Clone, Copy)]
struct Resolved {
    clinic_id: Uuid,
    linked:    bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Existing active association or nothing.
    LookupOnly,
    /// Existing association, else attach to any active clinic, else create one.
    Provision,
}

impl ResolutionStrategy {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::ClinicAdmin => ResolutionStrategy::Provision,
            UserRole::ClinicViewer | UserRole::Manager | UserRole::Consultant => {
                ResolutionStrategy::LookupOnly
            }
        }
    }

    async fn run(self, store: &dyn ClinicStore, user_id: Uuid) -> Result<Resolved, ResolveError> {
        match (self, store.find_active_association(user_id).await) {
            (_, Ok(Some(clinic_id))) => Ok(Resolved { clinic_id, linked: true }),
            (ResolutionStrategy::LookupOnly, Ok(None)) => Err(ResolveError::NotAssociated),
            (ResolutionStrategy::LookupOnly, Err(err)) => Err(ResolveError::Lookup(err)),
            (ResolutionStrategy::Provision, Ok(None)) => provision(store, user_id).await,
            (ResolutionStrategy::Provision, Err(err)) => {
                tracing::warn!(error = %err, "Association lookup failed, trying fallback");
                provision(store, user_id).await
            }
        }
    }
}

/// Resolve the active clinic for `user_id`. May insert a clinic and/or an
/// association as a side effect.
#[tracing::instrument(skip_all, fields(%user_id, %role))]
pub async fn resolve(store: &dyn ClinicStore, user_id: Uuid, role: UserRole) -> ClinicResolution {
    let strategy = ResolutionStrategy::for_role(role);
    match strategy.run(store, user_id).await {
        Ok(found) => {
            tracing::debug!(clinic_id = %found.clinic_id, linked = found.linked, "Clinic resolved");
            ClinicResolution::resolved(found)
        }
        Err(err) => {
            tracing::warn!(error = %err, ?strategy, "Clinic resolution failed");
            ClinicResolution::failed(&err)
        }
    }
}

async fn provision(store: &dyn ClinicStore, user_id: Uuid) -> Result<Resolved, ResolveError> {
    let available = store
        .first_active_clinic()
        .await
        .map_err(ResolveError::Lookup)?;

    if let Some(clinic) = available {
        let linked = link(store, user_id, clinic.id).await;
        return Ok(Resolved { clinic_id: clinic.id, linked });
    }

    let clinic = store
        .create_clinic(&NewClinic {
            name:   DEFAULT_CLINIC_NAME.to_owned(),
            status: ClinicStatus::Active,
        })
        .await
        .map_err(ResolveError::CreateClinic)?;
    tracing::info!(clinic_id = %clinic.id, "Provisioned clinic for first admin");

    let linked = link(store, user_id, clinic.id).await;
    Ok(Resolved { clinic_id: clinic.id, linked })
}

/// The clinic choice stands even if the association cannot be written.
async fn link(store: &dyn ClinicStore, user_id: Uuid, clinic_id: Uuid) -> bool {
    match store.link_user_to_clinic(user_id, clinic_id).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, %clinic_id, "Could not associate user with clinic");
            false
        }
    }
}
