//! Directory: Centralized Transition Logic
//!
//! ALL store-mutation logic lives here.
//! Every handler validates first and mutates only once validation has
//! passed, so a rejected command leaves the state untouched.
//! Each successful handler returns the log draft for its mutation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    EntityType, NewOrganization, NewPersonnel, OperationType, Operator, Organization,
    OrganizationChanges, OrgStatus, Personnel, PersonnelChanges, PersonnelStatus,
};
use crate::error::{DirectoryError, DirectoryResult};
use crate::hierarchy;
use crate::invariants::{check_parent_assignment, require, require_some};
use crate::log::{ChangeSet, FieldChange, NewLogEntry};
use crate::state::DirectoryState;

/// Outcome of an applied command: the resulting record and the log draft.
#[derive(Debug, Clone)]
pub struct Transition<T> {
    pub record: T,
    pub log: NewLogEntry,
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

pub fn create_organization(
    state: &mut DirectoryState,
    operator: &Operator,
    input: NewOrganization,
    now: DateTime<Utc>,
) -> DirectoryResult<Transition<Organization>> {
    require("name", &input.name)?;
    let org_type = require_some("type", input.org_type)?;
    let established_date = require_some("establishedDate", input.established_date)?;
    let parent_id = normalize(input.parent_id);
    if let Some(pid) = parent_id.as_deref() {
        check_parent_assignment(&state.organizations, None, pid)?;
    }

    let org = Organization {
        id: generate_id(),
        name: input.name,
        org_type,
        parent_id,
        description: normalize(input.description),
        location: normalize(input.location),
        manager: normalize(input.manager),
        established_date,
        status: input.status.unwrap_or(OrgStatus::Active),
        employee_count: input.employee_count,
        created_by: operator.name.clone(),
        created_at: now,
        updated_by: None,
        updated_at: None,
    };
    state.organizations.push(org.clone());

    let log = draft(
        OperationType::Create,
        EntityType::Organization,
        &org.id,
        operator,
        format!("Created organization {}", org.name),
        None,
    );
    Ok(Transition { record: org, log })
}

pub fn update_organization(
    state: &mut DirectoryState,
    operator: &Operator,
    id: &str,
    changes: OrganizationChanges,
    now: DateTime<Utc>,
) -> DirectoryResult<Transition<Organization>> {
    let index = state
        .organization_index(id)
        .ok_or_else(|| DirectoryError::not_found("organization", id))?;
    let current = &state.organizations[index];
    let mut next = current.clone();
    let mut diff = ChangeSet::new();

    if let Some(name) = changes.name {
        require("name", &name)?;
        track(&mut diff, "name", &current.name, &name);
        next.name = name;
    }
    if let Some(org_type) = changes.org_type {
        let has_children = !hierarchy::children_of(&state.organizations, id).is_empty();
        if !org_type.can_parent() && has_children {
            return Err(DirectoryError::validation(
                "type",
                format!(
                    "organization {:?} has child organizations and cannot become a {}",
                    id, org_type
                ),
            ));
        }
        track(&mut diff, "type", &current.org_type, &org_type);
        next.org_type = org_type;
    }
    if let Some(parent_id) = changes.parent_id {
        let parent_id = normalize(parent_id);
        if parent_id != current.parent_id {
            if let Some(pid) = parent_id.as_deref() {
                check_parent_assignment(&state.organizations, Some(id), pid)?;
            }
            track(&mut diff, "parentId", &current.parent_id, &parent_id);
            next.parent_id = parent_id;
        }
    }
    if let Some(description) = changes.description {
        let description = normalize(description);
        track(&mut diff, "description", &current.description, &description);
        next.description = description;
    }
    if let Some(location) = changes.location {
        let location = normalize(location);
        track(&mut diff, "location", &current.location, &location);
        next.location = location;
    }
    if let Some(manager) = changes.manager {
        let manager = normalize(manager);
        track(&mut diff, "manager", &current.manager, &manager);
        next.manager = manager;
    }
    if let Some(date) = changes.established_date {
        track(&mut diff, "establishedDate", &current.established_date, &date);
        next.established_date = date;
    }
    if let Some(status) = changes.status {
        track(&mut diff, "status", &current.status, &status);
        next.status = status;
    }
    if let Some(count) = changes.employee_count {
        track(&mut diff, "employeeCount", &current.employee_count, &count);
        next.employee_count = count;
    }

    next.updated_by = Some(operator.name.clone());
    next.updated_at = Some(now);
    state.organizations[index] = next.clone();

    let log = draft(
        OperationType::Update,
        EntityType::Organization,
        id,
        operator,
        format!("Updated organization {}", next.name),
        non_empty(diff),
    );
    Ok(Transition { record: next, log })
}

/// Remove an organization. Children and personnel that reference it are
/// left in place as orphans.
pub fn delete_organization(
    state: &mut DirectoryState,
    operator: &Operator,
    id: &str,
) -> DirectoryResult<Transition<Organization>> {
    let index = state
        .organization_index(id)
        .ok_or_else(|| DirectoryError::not_found("organization", id))?;
    let removed = state.organizations.remove(index);

    let log = draft(
        OperationType::Delete,
        EntityType::Organization,
        id,
        operator,
        format!("Deleted organization {}", removed.name),
        None,
    );
    Ok(Transition {
        record: removed,
        log,
    })
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

/// `organization_id` is required but not resolved: orphans are tolerated.
pub fn create_personnel(
    state: &mut DirectoryState,
    operator: &Operator,
    input: NewPersonnel,
    now: DateTime<Utc>,
) -> DirectoryResult<Transition<Personnel>> {
    require("name", &input.name)?;
    require("position", &input.position)?;
    require("organizationId", &input.organization_id)?;
    require("email", &input.email)?;
    require("phone", &input.phone)?;
    let join_date = require_some("joinDate", input.join_date)?;

    let person = Personnel {
        id: generate_id(),
        name: input.name,
        position: input.position,
        department: input.department,
        organization_id: input.organization_id,
        email: input.email,
        phone: input.phone,
        join_date,
        status: input.status.unwrap_or(PersonnelStatus::Active),
        manager: normalize(input.manager),
        created_by: operator.name.clone(),
        created_at: now,
        updated_by: None,
        updated_at: None,
    };
    state.personnel.push(person.clone());

    let log = draft(
        OperationType::Create,
        EntityType::Personnel,
        &person.id,
        operator,
        format!("Added personnel {}", person.name),
        None,
    );
    Ok(Transition {
        record: person,
        log,
    })
}

pub fn update_personnel(
    state: &mut DirectoryState,
    operator: &Operator,
    id: &str,
    changes: PersonnelChanges,
    now: DateTime<Utc>,
) -> DirectoryResult<Transition<Personnel>> {
    let index = state
        .person_index(id)
        .ok_or_else(|| DirectoryError::not_found("personnel", id))?;
    let current = &state.personnel[index];
    let mut next = current.clone();
    let mut diff = ChangeSet::new();

    let required = [
        ("name", changes.name, &current.name, &mut next.name),
        ("position", changes.position, &current.position, &mut next.position),
        (
            "organizationId",
            changes.organization_id,
            &current.organization_id,
            &mut next.organization_id,
        ),
        ("email", changes.email, &current.email, &mut next.email),
        ("phone", changes.phone, &current.phone, &mut next.phone),
    ];
    for (field, value, old, slot) in required {
        if let Some(value) = value {
            require(field, &value)?;
            track(&mut diff, field, old, &value);
            *slot = value;
        }
    }
    if let Some(department) = changes.department {
        track(&mut diff, "department", &current.department, &department);
        next.department = department;
    }
    if let Some(date) = changes.join_date {
        track(&mut diff, "joinDate", &current.join_date, &date);
        next.join_date = date;
    }
    if let Some(status) = changes.status {
        track(&mut diff, "status", &current.status, &status);
        next.status = status;
    }
    if let Some(manager) = changes.manager {
        let manager = normalize(manager);
        track(&mut diff, "manager", &current.manager, &manager);
        next.manager = manager;
    }

    next.updated_by = Some(operator.name.clone());
    next.updated_at = Some(now);
    state.personnel[index] = next.clone();

    let log = draft(
        OperationType::Update,
        EntityType::Personnel,
        id,
        operator,
        format!("Updated personnel {}", next.name),
        non_empty(diff),
    );
    Ok(Transition { record: next, log })
}

pub fn delete_personnel(
    state: &mut DirectoryState,
    operator: &Operator,
    id: &str,
) -> DirectoryResult<Transition<Personnel>> {
    let index = state
        .person_index(id)
        .ok_or_else(|| DirectoryError::not_found("personnel", id))?;
    let removed = state.personnel.remove(index);

    let log = draft(
        OperationType::Delete,
        EntityType::Personnel,
        id,
        operator,
        format!("Removed personnel {}", removed.name),
        None,
    );
    Ok(Transition {
        record: removed,
        log,
    })
}

// ---------------------------------------------------------------------------
// Helpers (private)
// ---------------------------------------------------------------------------

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Forms submit cleared optional text as an empty string.
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn track<T: Serialize + PartialEq>(diff: &mut ChangeSet, field: &str, old: &T, new: &T) {
    if old == new {
        return;
    }
    diff.insert(
        field.to_string(),
        FieldChange {
            old: serde_json::to_value(old).unwrap_or(Value::Null),
            new: serde_json::to_value(new).unwrap_or(Value::Null),
        },
    );
}

fn non_empty(diff: ChangeSet) -> Option<ChangeSet> {
    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}

fn draft(
    op_type: OperationType,
    entity_type: EntityType,
    entity_id: &str,
    operator: &Operator,
    description: String,
    changes: Option<ChangeSet>,
) -> NewLogEntry {
    NewLogEntry {
        op_type,
        entity_type,
        entity_id: entity_id.to_string(),
        operator: operator.clone(),
        description,
        changes,
    }
}
