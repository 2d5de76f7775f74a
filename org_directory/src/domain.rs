//! Directory: Core Domain Types
//!
//! Pure data. No validation, no mutation logic.
//! Wire names follow the data model (camelCase fields, kebab-case enums).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

// ── Classifications ────────────────────────────────────────────────

/// Kind of node in the organization forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgType {
    Company,
    Department,
    Team,
    Branch,
}

impl OrgType {
    pub const ALL: [OrgType; 4] = [
        OrgType::Company,
        OrgType::Department,
        OrgType::Team,
        OrgType::Branch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrgType::Company => "company",
            OrgType::Department => "department",
            OrgType::Team => "team",
            OrgType::Branch => "branch",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrgType::Company => "Company",
            OrgType::Department => "Department",
            OrgType::Team => "Team",
            OrgType::Branch => "Branch office",
        }
    }

    /// Teams are leaves: they may never be assigned as a parent.
    pub fn can_parent(&self) -> bool {
        !matches!(self, OrgType::Team)
    }
}

impl FromStr for OrgType {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(OrgType::Company),
            "department" => Ok(OrgType::Department),
            "team" => Ok(OrgType::Team),
            "branch" => Ok(OrgType::Branch),
            other => Err(DirectoryError::validation(
                "type",
                format!("unknown organization type {:?}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgStatus {
    Active,
    Inactive,
    Pending,
}

impl OrgStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgStatus::Active => "active",
            OrgStatus::Inactive => "inactive",
            OrgStatus::Pending => "pending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrgStatus::Active => "Active",
            OrgStatus::Inactive => "Inactive",
            OrgStatus::Pending => "Pending review",
        }
    }
}

impl FromStr for OrgStatus {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(OrgStatus::Active),
            "inactive" => Ok(OrgStatus::Inactive),
            "pending" => Ok(OrgStatus::Pending),
            other => Err(DirectoryError::validation(
                "status",
                format!("unknown organization status {:?}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonnelStatus {
    Active,
    Inactive,
    OnLeave,
}

impl PersonnelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonnelStatus::Active => "active",
            PersonnelStatus::Inactive => "inactive",
            PersonnelStatus::OnLeave => "on-leave",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonnelStatus::Active => "Employed",
            PersonnelStatus::Inactive => "Departed",
            PersonnelStatus::OnLeave => "On leave",
        }
    }
}

impl FromStr for PersonnelStatus {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PersonnelStatus::Active),
            "inactive" => Ok(PersonnelStatus::Inactive),
            "on-leave" => Ok(PersonnelStatus::OnLeave),
            other => Err(DirectoryError::validation(
                "status",
                format!("unknown personnel status {:?}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationType {
    Create,
    Update,
    Delete,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Create => "create",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationType::Create => "Created",
            OperationType::Update => "Updated",
            OperationType::Delete => "Deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Organization,
    Personnel,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Organization => "organization",
            EntityType::Personnel => "personnel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Organization => "Organization",
            EntityType::Personnel => "Personnel",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(OrgType, OrgStatus, PersonnelStatus, OperationType, EntityType);

// ── Actors ─────────────────────────────────────────────────────────

/// The user on whose behalf a command runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub name: String,
}

impl Operator {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Built-in administrator used when no operator is configured.
    pub fn system() -> Self {
        Self::new("system", "System administrator")
    }
}

// ── Records ────────────────────────────────────────────────────────

/// A node in the company hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub org_type: OrgType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub established_date: NaiveDate,
    pub status: OrgStatus,
    /// Informational head count; not derived from personnel membership.
    #[serde(default)]
    pub employee_count: u32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An employee record, linked to an organization by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Personnel {
    pub id: String,
    pub name: String,
    pub position: String,
    /// Free-text label, independent of `organization_id`.
    #[serde(default)]
    pub department: String,
    pub organization_id: String,
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
    pub status: PersonnelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ── Inbound commands ───────────────────────────────────────────────

/// Fields supplied when creating an organization.
///
/// `org_type` and `established_date` are required but optional here so an
/// incomplete form is reported as a validation error, not a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewOrganization {
    pub name: String,
    #[serde(rename = "type")]
    pub org_type: Option<OrgType>,
    pub parent_id: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub manager: Option<String>,
    pub established_date: Option<NaiveDate>,
    /// Defaults to `Active`.
    pub status: Option<OrgStatus>,
    pub employee_count: u32,
}

/// Partial update of an organization. `None` keeps the current value;
/// clearable fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub org_type: Option<OrgType>,
    pub parent_id: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub manager: Option<Option<String>>,
    pub established_date: Option<NaiveDate>,
    pub status: Option<OrgStatus>,
    pub employee_count: Option<u32>,
}

impl From<&Organization> for OrganizationChanges {
    /// Every editable field set to the record's current value, as an edit
    /// form submits it.
    fn from(org: &Organization) -> Self {
        Self {
            name: Some(org.name.clone()),
            org_type: Some(org.org_type),
            parent_id: Some(org.parent_id.clone()),
            description: Some(org.description.clone()),
            location: Some(org.location.clone()),
            manager: Some(org.manager.clone()),
            established_date: Some(org.established_date),
            status: Some(org.status),
            employee_count: Some(org.employee_count),
        }
    }
}

/// Fields supplied when creating a personnel record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewPersonnel {
    pub name: String,
    pub position: String,
    pub department: String,
    pub organization_id: String,
    pub email: String,
    pub phone: String,
    pub join_date: Option<NaiveDate>,
    /// Defaults to `Active`.
    pub status: Option<PersonnelStatus>,
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonnelChanges {
    pub name: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub organization_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub status: Option<PersonnelStatus>,
    pub manager: Option<Option<String>>,
}

impl From<&Personnel> for PersonnelChanges {
    fn from(p: &Personnel) -> Self {
        Self {
            name: Some(p.name.clone()),
            position: Some(p.position.clone()),
            department: Some(p.department.clone()),
            organization_id: Some(p.organization_id.clone()),
            email: Some(p.email.clone()),
            phone: Some(p.phone.clone()),
            join_date: Some(p.join_date),
            status: Some(p.status),
            manager: Some(p.manager.clone()),
        }
    }
}
