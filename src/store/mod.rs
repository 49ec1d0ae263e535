//! Data access seam. Handlers and clinic resolution talk to a `ClinicStore`;
//! the data-service client implements it, tests swap in an in-memory one.

mod supabase;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    models::{Clinic, CommissionWithRelations, LeadWithRelations, NewClinic, User},
    supabase::ClientError,
};

pub type StoreResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait ClinicStore: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<User>>;

    /// Clinic id of one association between the user and an active clinic.
    async fn find_active_association(&self, user_id: Uuid) -> StoreResult<Option<Uuid>>;

    /// Any single active clinic, in the service's default order.
    async fn first_active_clinic(&self) -> StoreResult<Option<Clinic>>;

    async fn create_clinic(&self, clinic: &NewClinic) -> StoreResult<Clinic>;

    /// Idempotent: an existing (user, clinic) association is left as is.
    async fn link_user_to_clinic(&self, user_id: Uuid, clinic_id: Uuid) -> StoreResult<()>;

    async fn list_leads(&self, clinic_id: Uuid) -> StoreResult<Vec<LeadWithRelations>>;

    async fn list_commissions(&self, clinic_id: Uuid) -> StoreResult<Vec<CommissionWithRelations>>;

    /// Cheapest query that proves the service is reachable and the key works.
    async fn ping(&self) -> StoreResult<()>;
}

/// Hands out stores bound to a caller's credentials.
pub trait StoreProvider: Send + Sync {
    fn for_user(&self, access_token: &str) -> Box<dyn ClinicStore>;

    fn anonymous(&self) -> Box<dyn ClinicStore>;
}
