//! Directory: Invariant Checks
//!
//! Non-panicking validation. Every check returns the first violation
//! as `DirectoryError::Validation`. Commands call the single-record
//! checks before touching the store; seed data goes through
//! `validate_invariants` as a whole.

use std::collections::BTreeSet;

use crate::domain::Organization;
use crate::error::{DirectoryError, DirectoryResult};
use crate::hierarchy::{find_cycles, would_create_cycle};
use crate::state::DirectoryState;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run all whole-state checks on a handed-in collection.
///
/// Dangling `parent_id` and personnel `organization_id` references are
/// accepted: deletes do not cascade, so a directory's own state can hold
/// them.
pub fn validate_invariants(state: &DirectoryState) -> DirectoryResult<()> {
    check_unique_organization_ids(state)?;
    check_unique_personnel_ids(state)?;
    check_required_strings(state)?;
    check_no_team_parents(state)?;
    check_no_cycles(state)?;
    Ok(())
}

/// A required string is missing when it is empty or whitespace only.
pub fn require(field: &str, value: &str) -> DirectoryResult<()> {
    if value.trim().is_empty() {
        return Err(DirectoryError::missing(field));
    }
    Ok(())
}

/// Require an optional command field to be present.
pub fn require_some<T: Copy>(field: &str, value: Option<T>) -> DirectoryResult<T> {
    value.ok_or_else(|| DirectoryError::missing(field))
}

/// Validate assigning `parent_id` as the parent of `child_id`.
///
/// `child_id` is `None` for an organization that does not exist yet.
/// The parent must exist, must not be a team, and the link must not
/// close a cycle.
pub fn check_parent_assignment(
    orgs: &[Organization],
    child_id: Option<&str>,
    parent_id: &str,
) -> DirectoryResult<()> {
    let parent = orgs.iter().find(|o| o.id == parent_id).ok_or_else(|| {
        DirectoryError::validation(
            "parentId",
            format!("parent organization {:?} does not exist", parent_id),
        )
    })?;

    if !parent.org_type.can_parent() {
        return Err(DirectoryError::validation(
            "parentId",
            format!(
                "organization {:?} is a {} and cannot be a parent",
                parent_id, parent.org_type
            ),
        ));
    }

    if let Some(child) = child_id {
        if would_create_cycle(orgs, child, parent_id) {
            return Err(DirectoryError::validation(
                "parentId",
                format!(
                    "assigning {:?} as parent of {:?} would create a cycle",
                    parent_id, child
                ),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

fn check_unique_organization_ids(state: &DirectoryState) -> DirectoryResult<()> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for org in &state.organizations {
        require("id", &org.id)?;
        if !seen.insert(org.id.as_str()) {
            return Err(DirectoryError::validation(
                "id",
                format!("duplicate organization id {:?}", org.id),
            ));
        }
    }
    Ok(())
}

fn check_unique_personnel_ids(state: &DirectoryState) -> DirectoryResult<()> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for person in &state.personnel {
        require("id", &person.id)?;
        if !seen.insert(person.id.as_str()) {
            return Err(DirectoryError::validation(
                "id",
                format!("duplicate personnel id {:?}", person.id),
            ));
        }
    }
    Ok(())
}

fn check_required_strings(state: &DirectoryState) -> DirectoryResult<()> {
    for org in &state.organizations {
        require("name", &org.name)?;
    }
    for person in &state.personnel {
        require("name", &person.name)?;
        require("position", &person.position)?;
        require("organizationId", &person.organization_id)?;
        require("email", &person.email)?;
        require("phone", &person.phone)?;
    }
    Ok(())
}

fn check_no_team_parents(state: &DirectoryState) -> DirectoryResult<()> {
    for org in &state.organizations {
        let parent = org
            .parent_id
            .as_deref()
            .and_then(|pid| state.organization(pid));
        if let Some(parent) = parent {
            if !parent.org_type.can_parent() {
                return Err(DirectoryError::validation(
                    "parentId",
                    format!(
                        "organization {:?} has team {:?} as parent",
                        org.id, parent.id
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn check_no_cycles(state: &DirectoryState) -> DirectoryResult<()> {
    let cycles = find_cycles(&state.organizations);
    if let Some(cycle) = cycles.first() {
        return Err(DirectoryError::validation(
            "parentId",
            format!("parent cycle detected: {}", cycle.join(" -> ")),
        ));
    }
    Ok(())
}
