//! In-memory stand-ins for the data and auth services.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::{
    auth::{AuthProvider, SessionChange, SessionTokens, SessionUser, UserLookup},
    config::Config,
    models::{
        Clinic, ClinicStatus, CommissionWithRelations, LeadWithRelations, NewClinic, User,
        UserRole, UserStatus,
    },
    state::AppState,
    store::{ClinicStore, StoreProvider, StoreResult},
    supabase::{
        auth::{Identity, Session},
        ClientError,
    },
};

pub const ANON_KEY: &str = "anon-key-for-tests";

/// Development config pointing at nothing; nothing in tests dials out.
pub fn test_config() -> Config {
    Config {
        supabase_url:      "http://localhost:54321".into(),
        supabase_anon_key: ANON_KEY.into(),
        http_timeout_secs: 1,
        backend_host:      "127.0.0.1".into(),
        backend_port:      0,
        site_url:          "http://localhost:3000".into(),
        app_env:           "development".into(),
    }
}

pub fn test_state(auth: MockAuth, store: MockStore) -> AppState {
    AppState {
        config: test_config(),
        auth:   Arc::new(auth),
        stores: Arc::new(store),
    }
}

fn api_error(status: StatusCode, message: &str) -> ClientError {
    ClientError::Api {
        status,
        code: None,
        message: message.to_owned(),
    }
}

// ── MockStore ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StoreInner {
    users:           Vec<User>,
    clinics:         Vec<Clinic>,
    associations:    Vec<(Uuid, Uuid)>,
    leads:           Vec<LeadWithRelations>,
    link_attempts:   usize,
    created_clinics: usize,
    fail_links:      bool,
    fail_create:     bool,
    lookup_error:    Option<String>,
    assoc_error:     Option<String>,
    tokens_seen:     Vec<String>,
}

/// Clones share state, so a handle kept by the test sees every write.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn clinic(id: Uuid, status: ClinicStatus) -> Clinic {
        Clinic {
            id,
            name: format!("Clinic {}", &id.to_string()[..8]),
            status,
            created_at: Utc::now(),
        }
    }

    pub fn with_active_clinic(self, id: Uuid) -> Self {
        self.inner.lock().unwrap().clinics.push(Self::clinic(id, ClinicStatus::Active));
        self
    }

    pub fn with_inactive_clinic(self, id: Uuid) -> Self {
        self.inner.lock().unwrap().clinics.push(Self::clinic(id, ClinicStatus::Inactive));
        self
    }

    pub fn with_association(self, user_id: Uuid, clinic_id: Uuid) -> Self {
        self.inner.lock().unwrap().associations.push((user_id, clinic_id));
        self
    }

    pub fn with_user(self, id: Uuid, role: UserRole, status: UserStatus) -> Self {
        self.inner.lock().unwrap().users.push(User {
            id,
            email: Some(format!("{}@clinic.test", &id.to_string()[..8])),
            full_name: Some("Test User".into()),
            role,
            status,
            created_at: Utc::now(),
            updated_at: None,
        });
        self
    }

    pub fn with_lead(self, lead: LeadWithRelations) -> Self {
        self.inner.lock().unwrap().leads.push(lead);
        self
    }

    pub fn failing_links(self) -> Self {
        self.inner.lock().unwrap().fail_links = true;
        self
    }

    pub fn failing_clinic_creation(self) -> Self {
        self.inner.lock().unwrap().fail_create = true;
        self
    }

    pub fn failing_lookups(self, message: &str) -> Self {
        self.inner.lock().unwrap().lookup_error = Some(message.to_owned());
        self
    }

    /// Only the association lookup fails; other reads still answer.
    pub fn failing_association_lookups(self, message: &str) -> Self {
        self.inner.lock().unwrap().assoc_error = Some(message.to_owned());
        self
    }

    pub fn link_attempts(&self) -> usize {
        self.inner.lock().unwrap().link_attempts
    }

    pub fn created_clinics(&self) -> usize {
        self.inner.lock().unwrap().created_clinics
    }

    pub fn write_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.link_attempts + inner.created_clinics
    }

    pub fn is_linked(&self, user_id: Uuid, clinic_id: Uuid) -> bool {
        self.inner
            .lock()
            .unwrap()
            .associations
            .contains(&(user_id, clinic_id))
    }

    pub fn clinic_name(&self, clinic_id: Uuid) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .clinics
            .iter()
            .find(|c| c.id == clinic_id)
            .map(|c| c.name.clone())
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.inner.lock().unwrap().tokens_seen.clone()
    }

    fn check_lookup(&self) -> StoreResult<()> {
        match self.inner.lock().unwrap().lookup_error {
            Some(ref message) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClinicStore for MockStore {
    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        self.check_lookup()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_active_association(&self, user_id: Uuid) -> StoreResult<Option<Uuid>> {
        self.check_lookup()?;
        let inner = self.inner.lock().unwrap();
        if let Some(ref message) = inner.assoc_error {
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, message));
        }
        Ok(inner
            .associations
            .iter()
            .filter(|(u, _)| *u == user_id)
            .find_map(|(_, c)| {
                inner
                    .clinics
                    .iter()
                    .find(|clinic| clinic.id == *c && clinic.status == ClinicStatus::Active)
                    .map(|clinic| clinic.id)
            }))
    }

    async fn first_active_clinic(&self) -> StoreResult<Option<Clinic>> {
        self.check_lookup()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .clinics
            .iter()
            .find(|c| c.status == ClinicStatus::Active)
            .cloned())
    }

    async fn create_clinic(&self, clinic: &NewClinic) -> StoreResult<Clinic> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_create {
            return Err(api_error(StatusCode::FORBIDDEN, "permission denied for table clinics"));
        }
        let created = Clinic {
            id:         Uuid::new_v4(),
            name:       clinic.name.clone(),
            status:     clinic.status,
            created_at: Utc::now(),
        };
        inner.created_clinics += 1;
        inner.clinics.push(created.clone());
        Ok(created)
    }

    async fn link_user_to_clinic(&self, user_id: Uuid, clinic_id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.link_attempts += 1;
        if inner.fail_links {
            return Err(api_error(
                StatusCode::FORBIDDEN,
                "new row violates row-level security policy",
            ));
        }
        if !inner.associations.contains(&(user_id, clinic_id)) {
            inner.associations.push((user_id, clinic_id));
        }
        Ok(())
    }

    async fn list_leads(&self, clinic_id: Uuid) -> StoreResult<Vec<LeadWithRelations>> {
        self.check_lookup()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .leads
            .iter()
            .filter(|l| l.lead.clinic_id == clinic_id)
            .cloned()
            .collect())
    }

    async fn list_commissions(
        &self,
        _clinic_id: Uuid,
    ) -> StoreResult<Vec<CommissionWithRelations>> {
        self.check_lookup()?;
        Ok(Vec::new())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_lookup()
    }
}

impl StoreProvider for MockStore {
    fn for_user(&self, access_token: &str) -> Box<dyn ClinicStore> {
        self.inner
            .lock()
            .unwrap()
            .tokens_seen
            .push(access_token.to_owned());
        Box::new(self.clone())
    }

    fn anonymous(&self) -> Box<dyn ClinicStore> {
        Box::new(self.clone())
    }
}

// ── MockAuth ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum AuthOutcome {
    SignedIn(Uuid),
    Refreshed(Uuid),
    Expired,
    Anonymous,
    Failing,
}

pub struct MockAuth {
    outcome:   AuthOutcome,
    lookups:   Mutex<usize>,
    sign_outs: Mutex<Vec<String>>,
}

pub const ACCESS_TOKEN: &str = "access-token";
pub const REFRESHED_ACCESS_TOKEN: &str = "refreshed-access-token";
pub const PASSWORD: &str = "correct horse";

impl MockAuth {
    fn with(outcome: AuthOutcome) -> Self {
        Self {
            outcome,
            lookups:   Mutex::new(0),
            sign_outs: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_in(user_id: Uuid) -> Self {
        Self::with(AuthOutcome::SignedIn(user_id))
    }

    /// Access token rejected, refresh token accepted.
    pub fn refreshing(user_id: Uuid) -> Self {
        Self::with(AuthOutcome::Refreshed(user_id))
    }

    /// Both tokens rejected.
    pub fn expired() -> Self {
        Self::with(AuthOutcome::Expired)
    }

    pub fn anonymous() -> Self {
        Self::with(AuthOutcome::Anonymous)
    }

    pub fn failing() -> Self {
        Self::with(AuthOutcome::Failing)
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }

    pub fn sign_outs(&self) -> Vec<String> {
        self.sign_outs.lock().unwrap().clone()
    }

    fn session(user_id: Uuid, access_token: &str) -> Session {
        Session {
            access_token:  access_token.to_owned(),
            refresh_token: "refresh-token".to_owned(),
            expires_in:    3600,
            user: Identity {
                id:    user_id,
                email: Some("admin@clinic.test".to_owned()),
            },
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn get_user(&self, _tokens: &SessionTokens) -> Result<UserLookup, ClientError> {
        *self.lookups.lock().unwrap() += 1;
        match self.outcome {
            AuthOutcome::SignedIn(id) => Ok(UserLookup {
                user: Some(SessionUser {
                    id,
                    email: Some("admin@clinic.test".to_owned()),
                    access_token: ACCESS_TOKEN.to_owned(),
                }),
                change: SessionChange::Unchanged,
            }),
            AuthOutcome::Refreshed(id) => {
                let session = Self::session(id, REFRESHED_ACCESS_TOKEN);
                Ok(UserLookup {
                    user: Some(SessionUser {
                        id,
                        email: session.user.email.clone(),
                        access_token: session.access_token.clone(),
                    }),
                    change: SessionChange::Refreshed(session),
                })
            }
            AuthOutcome::Expired => Ok(UserLookup { user: None, change: SessionChange::Expired }),
            AuthOutcome::Anonymous => Ok(UserLookup::anonymous()),
            AuthOutcome::Failing => {
                Err(api_error(StatusCode::BAD_GATEWAY, "auth service unreachable"))
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        if password != PASSWORD {
            return Err(ClientError::Api {
                status:  StatusCode::BAD_REQUEST,
                code:    Some("invalid_credentials".into()),
                message: "Invalid login credentials".into(),
            });
        }
        let mut session = Self::session(Uuid::new_v4(), ACCESS_TOKEN);
        session.user.email = Some(email.to_owned());
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ClientError> {
        self.sign_outs.lock().unwrap().push(access_token.to_owned());
        Ok(())
    }
}
