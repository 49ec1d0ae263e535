//! Row types mirroring the data service's tables, plus the embedded
//! ("with relations") shapes returned by joined selects.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Users ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id:         Uuid,
    pub email:      Option<String>,
    pub full_name:  Option<String>,
    pub role:       UserRole,
    pub status:     UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    ClinicAdmin,
    ClinicViewer,
    Manager,
    Consultant,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::ClinicAdmin  => "clinic_admin",
            UserRole::ClinicViewer => "clinic_viewer",
            UserRole::Manager      => "manager",
            UserRole::Consultant   => "consultant",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
}

/// Embedded user reference (`consultant:users(id, full_name, email)`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id:        Uuid,
    pub full_name: Option<String>,
    pub email:     Option<String>,
}

// ── Clinics ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clinic {
    pub id:         Uuid,
    pub name:       String,
    pub status:     ClinicStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClinicStatus {
    Active,
    Inactive,
}

impl ClinicStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClinicStatus::Active   => "active",
            ClinicStatus::Inactive => "inactive",
        }
    }
}

/// Insert payload; id and timestamps are assigned by the database.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewClinic {
    pub name:   String,
    pub status: ClinicStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicSummary {
    pub id:   Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserClinic {
    pub id:         Uuid,
    pub user_id:    Uuid,
    pub clinic_id:  Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewUserClinic {
    pub user_id:   Uuid,
    pub clinic_id: Uuid,
}

// ── Establishments ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Establishment {
    pub id:         Uuid,
    pub clinic_id:  Uuid,
    pub name:       String,
    pub code:       Option<String>,
    pub status:     ClinicStatus,
    pub created_at: DateTime<Utc>,
}

// ── Leads ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id:            Uuid,
    pub clinic_id:     Uuid,
    pub consultant_id: Option<Uuid>,
    pub name:          String,
    pub email:         Option<String>,
    pub phone:         Option<String>,
    pub status:        LeadStatus,
    pub source:        Option<String>,
    pub notes:         Option<String>,
    pub created_at:    DateTime<Utc>,
    pub updated_at:    Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Scheduled,
    Converted,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadSummary {
    pub id:     Uuid,
    pub name:   String,
    pub status: LeadStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadWithRelations {
    #[serde(flatten)]
    pub lead:       Lead,
    #[serde(default)]
    pub consultant: Option<UserSummary>,
    #[serde(default)]
    pub clinic:     Option<ClinicSummary>,
}

// ── Commissions ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commission {
    pub id:            Uuid,
    pub clinic_id:     Uuid,
    pub consultant_id: Uuid,
    pub lead_id:       Option<Uuid>,
    pub amount:        f64,
    pub status:        CommissionStatus,
    pub created_at:    DateTime<Utc>,
    pub paid_at:       Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Pending,
    Approved,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommissionWithRelations {
    #[serde(flatten)]
    pub commission: Commission,
    #[serde(default)]
    pub consultant: Option<UserSummary>,
    #[serde(default)]
    pub lead:       Option<LeadSummary>,
}

// ── Hierarchy ────────────────────────────────────────────────

/// Manager → consultant reporting line inside one clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hierarchy {
    pub id:            Uuid,
    pub clinic_id:     Uuid,
    pub manager_id:    Uuid,
    pub consultant_id: Uuid,
    pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HierarchyWithUsers {
    #[serde(flatten)]
    pub hierarchy:  Hierarchy,
    #[serde(default)]
    pub manager:    Option<UserSummary>,
    #[serde(default)]
    pub consultant: Option<UserSummary>,
}
