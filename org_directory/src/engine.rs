//! Directory: Engine
//!
//! Top-level orchestrator. Delegates mutation to transitions,
//! records every applied command in the operation log, and serves
//! the read views.
//!
//! Command sequence: validate → apply → append-log, one unit per call.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    NewOrganization, NewPersonnel, Operator, Organization, OrganizationChanges, Personnel,
    PersonnelChanges,
};
use crate::error::{DirectoryError, DirectoryResult};
use crate::hierarchy;
use crate::invariants::validate_invariants;
use crate::log::{LogEntry, OperationLog};
use crate::query::{self, OrganizationFilter, PersonnelFilter};
use crate::state::DirectoryState;
use crate::stats::{compute_statistics, Statistics};
use crate::transitions::{self, Transition};

/// Tunables for the derived views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOptions {
    /// Window for the `recent_operations` statistic.
    pub recent_window: Duration,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            recent_window: Duration::hours(24),
        }
    }
}

/// What deleting an organization would leave behind. Deletion does not
/// cascade; these records stay and become orphans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionImpact {
    pub organization: Organization,
    /// Ids of direct children.
    pub child_ids: Vec<String>,
    /// Ids of personnel that reference the organization.
    pub member_ids: Vec<String>,
}

impl DeletionImpact {
    pub fn leaves_orphans(&self) -> bool {
        !self.child_ids.is_empty() || !self.member_ids.is_empty()
    }
}

/// The directory service: entity store, operation log and views.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    state: DirectoryState,
    log: OperationLog,
    options: DirectoryOptions,
}

impl Directory {
    /// Create an empty directory.
    pub fn new(options: DirectoryOptions) -> Self {
        Self {
            state: DirectoryState::default(),
            log: OperationLog::new(),
            options,
        }
    }

    /// Adopt handed-in seed collections and historical log entries.
    /// The collections must satisfy every invariant.
    pub fn from_seed(
        state: DirectoryState,
        log: OperationLog,
        options: DirectoryOptions,
    ) -> DirectoryResult<Self> {
        validate_invariants(&state)?;
        tracing::debug!(
            organizations = state.organizations.len(),
            personnel = state.personnel.len(),
            log_entries = log.len(),
            "directory seeded"
        );
        Ok(Self {
            state,
            log,
            options,
        })
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn options(&self) -> &DirectoryOptions {
        &self.options
    }

    // -- Commands --------------------------------------------------------

    pub fn create_organization(
        &mut self,
        operator: &Operator,
        input: NewOrganization,
    ) -> DirectoryResult<Organization> {
        let now = Utc::now();
        let result = transitions::create_organization(&mut self.state, operator, input, now);
        self.commit(result, now)
    }

    pub fn update_organization(
        &mut self,
        operator: &Operator,
        id: &str,
        changes: OrganizationChanges,
    ) -> DirectoryResult<Organization> {
        let now = Utc::now();
        let result = transitions::update_organization(&mut self.state, operator, id, changes, now);
        self.commit(result, now)
    }

    /// Delete without cascading. Callers that need confirmation obtain it
    /// first, typically after showing `deletion_impact`.
    pub fn delete_organization(
        &mut self,
        operator: &Operator,
        id: &str,
    ) -> DirectoryResult<Organization> {
        let now = Utc::now();
        let result = transitions::delete_organization(&mut self.state, operator, id);
        self.commit(result, now)
    }

    pub fn create_personnel(
        &mut self,
        operator: &Operator,
        input: NewPersonnel,
    ) -> DirectoryResult<Personnel> {
        let now = Utc::now();
        let result = transitions::create_personnel(&mut self.state, operator, input, now);
        self.commit(result, now)
    }

    pub fn update_personnel(
        &mut self,
        operator: &Operator,
        id: &str,
        changes: PersonnelChanges,
    ) -> DirectoryResult<Personnel> {
        let now = Utc::now();
        let result = transitions::update_personnel(&mut self.state, operator, id, changes, now);
        self.commit(result, now)
    }

    pub fn delete_personnel(&mut self, operator: &Operator, id: &str) -> DirectoryResult<Personnel> {
        let now = Utc::now();
        let result = transitions::delete_personnel(&mut self.state, operator, id);
        self.commit(result, now)
    }

    fn commit<T>(
        &mut self,
        result: DirectoryResult<Transition<T>>,
        now: DateTime<Utc>,
    ) -> DirectoryResult<T> {
        match result {
            Ok(Transition { record, log }) => {
                let entry = self.log.append_at(log, now);
                tracing::info!(
                    operation = %entry.op_type,
                    entity_type = %entry.entity_type,
                    entity_id = %entry.entity_id,
                    operator_id = %entry.operator_id,
                    "directory command applied"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(error = %e, "directory command rejected");
                Err(e)
            }
        }
    }

    // -- Queries ---------------------------------------------------------

    pub fn organizations(&self) -> &[Organization] {
        &self.state.organizations
    }

    pub fn personnel(&self) -> &[Personnel] {
        &self.state.personnel
    }

    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.state.organization(id)
    }

    pub fn person(&self, id: &str) -> Option<&Personnel> {
        self.state.person(id)
    }

    pub fn filter_organizations(&self, filter: &OrganizationFilter) -> Vec<&Organization> {
        query::filter_organizations(&self.state.organizations, filter)
    }

    pub fn filter_personnel(&self, filter: &PersonnelFilter) -> Vec<&Personnel> {
        query::filter_personnel(&self.state.personnel, filter)
    }

    pub fn organization_name(&self, id: &str) -> &str {
        query::resolve_organization_name(&self.state.organizations, id)
    }

    pub fn eligible_parents(&self, exclude_id: Option<&str>) -> Vec<&Organization> {
        query::eligible_parents(&self.state.organizations, exclude_id)
    }

    pub fn members_of(&self, org_id: &str) -> Vec<&Personnel> {
        query::members_of(&self.state.personnel, org_id)
    }

    pub fn children_of(&self, id: &str) -> Vec<&Organization> {
        hierarchy::children_of(&self.state.organizations, id)
    }

    pub fn roots(&self) -> Vec<&Organization> {
        hierarchy::roots(&self.state.organizations)
    }

    pub fn ancestors(&self, id: &str) -> Vec<&Organization> {
        hierarchy::ancestors(&self.state.organizations, id)
    }

    /// First step of a two-step delete: report what would be orphaned.
    pub fn deletion_impact(&self, id: &str) -> DirectoryResult<DeletionImpact> {
        let organization = self
            .organization(id)
            .cloned()
            .ok_or_else(|| DirectoryError::not_found("organization", id))?;
        Ok(DeletionImpact {
            organization,
            child_ids: self.children_of(id).iter().map(|o| o.id.clone()).collect(),
            member_ids: self.members_of(id).iter().map(|p| p.id.clone()).collect(),
        })
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics_at(Utc::now())
    }

    /// Statistics as seen at `now`.
    pub fn statistics_at(&self, now: DateTime<Utc>) -> Statistics {
        compute_statistics(&self.state, &self.log, self.options.recent_window, now)
    }

    /// The `n` most recent log entries, newest first.
    pub fn recent_operations(&self, n: usize) -> impl Iterator<Item = &LogEntry> + '_ {
        self.log.recent(n)
    }
}
