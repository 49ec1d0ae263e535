use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use super::{ClinicStore, StoreProvider, StoreResult};
use crate::{
    models::{
        Clinic, ClinicStatus, CommissionWithRelations, LeadWithRelations, NewClinic,
        NewUserClinic, User,
    },
    supabase::Client,
};

const USER_COLUMNS: &str = "id, email, full_name, role, status, created_at, updated_at";
const LEAD_COLUMNS: &str =
    "*, consultant:users(id, full_name, email), clinic:clinics(id, name)";
const COMMISSION_COLUMNS: &str =
    "*, consultant:users(id, full_name, email), lead:leads(id, name, status)";

#[derive(Deserialize)]
struct AssociationRow {
    clinic_id: Uuid,
}

#[async_trait]
impl ClinicStore for Client {
    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        self.table("users")
            .select(USER_COLUMNS)
            .eq("id", user_id)
            .limit(1)
            .maybe_single::<User>()
            .await
    }

    async fn find_active_association(&self, user_id: Uuid) -> StoreResult<Option<Uuid>> {
        let row = self
            .table("user_clinics")
            .select("clinic_id, clinics!inner(status)")
            .eq("user_id", user_id)
            .eq("clinics.status", ClinicStatus::Active.as_str())
            .limit(1)
            .maybe_single::<AssociationRow>()
            .await?;
        Ok(row.map(|r| r.clinic_id))
    }

    async fn first_active_clinic(&self) -> StoreResult<Option<Clinic>> {
        self.table("clinics")
            .select("id, name, status, created_at")
            .eq("status", ClinicStatus::Active.as_str())
            .limit(1)
            .maybe_single::<Clinic>()
            .await
    }

    async fn create_clinic(&self, clinic: &NewClinic) -> StoreResult<Clinic> {
        self.table("clinics").insert(clinic)?.single::<Clinic>().await
    }

    async fn link_user_to_clinic(&self, user_id: Uuid, clinic_id: Uuid) -> StoreResult<()> {
        let result = self
            .table("user_clinics")
            .upsert(&NewUserClinic { user_id, clinic_id })?
            .on_conflict("user_id,clinic_id")
            .ignore_duplicates()
            .execute()
            .await;

        match result {
            Err(e) if e.is_unique_violation() => Ok(()),
            other => other,
        }
    }

    async fn list_leads(&self, clinic_id: Uuid) -> StoreResult<Vec<LeadWithRelations>> {
        self.table("leads")
            .select(LEAD_COLUMNS)
            .eq("clinic_id", clinic_id)
            .order("created_at", false)
            .execute()
            .await
    }

    async fn list_commissions(&self, clinic_id: Uuid) -> StoreResult<Vec<CommissionWithRelations>> {
        self.table("commissions")
            .select(COMMISSION_COLUMNS)
            .eq("clinic_id", clinic_id)
            .order("created_at", false)
            .execute()
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.table("clinics")
            .select("id")
            .limit(1)
            .execute::<serde_json::Value>()
            .await?;
        Ok(())
    }
}

impl StoreProvider for Client {
    fn for_user(&self, access_token: &str) -> Box<dyn ClinicStore> {
        Box::new(self.as_user(access_token))
    }

    fn anonymous(&self) -> Box<dyn ClinicStore> {
        Box::new(self.clone())
    }
}
