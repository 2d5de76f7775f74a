//! Directory: Statistics Aggregator
//!
//! Pure functions of the current state and log. Nothing is cached;
//! every snapshot is recomputed from the collections.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::arithmetic::{format_percent, share_of};
use crate::domain::{OrgStatus, OrgType, PersonnelStatus};
use crate::log::OperationLog;
use crate::state::DirectoryState;

/// Dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_organizations: usize,
    pub total_personnel: usize,
    pub active_organizations: usize,
    pub active_personnel: usize,
    /// Log entries inside the recent-operations window.
    pub recent_operations: usize,
    /// Only types that occur; zero counts are omitted.
    pub organizations_by_type: BTreeMap<OrgType, usize>,
    /// Only statuses that occur; zero counts are omitted.
    pub personnel_by_status: BTreeMap<PersonnelStatus, usize>,
}

/// One row of the organization-type distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeShare {
    pub org_type: OrgType,
    pub count: usize,
    /// Fixed-point fraction of `total_organizations` (see `arithmetic::SCALE`).
    pub share: i64,
}

impl TypeShare {
    pub fn percent(&self) -> String {
        format_percent(self.share)
    }
}

/// Compute a snapshot. `recent_operations` counts entries stamped within
/// `recent_window` before `now`.
pub fn compute_statistics(
    state: &DirectoryState,
    log: &OperationLog,
    recent_window: Duration,
    now: DateTime<Utc>,
) -> Statistics {
    let mut organizations_by_type: BTreeMap<OrgType, usize> = BTreeMap::new();
    for org in &state.organizations {
        *organizations_by_type.entry(org.org_type).or_insert(0) += 1;
    }

    let mut personnel_by_status: BTreeMap<PersonnelStatus, usize> = BTreeMap::new();
    for person in &state.personnel {
        *personnel_by_status.entry(person.status).or_insert(0) += 1;
    }

    Statistics {
        total_organizations: state.organizations.len(),
        total_personnel: state.personnel.len(),
        active_organizations: state
            .organizations
            .iter()
            .filter(|o| o.status == OrgStatus::Active)
            .count(),
        active_personnel: personnel_by_status
            .get(&PersonnelStatus::Active)
            .copied()
            .unwrap_or(0),
        recent_operations: log.count_since(window_start(now, recent_window)),
        organizations_by_type,
        personnel_by_status,
    }
}

/// Start of the recent window. A window reaching past the earliest
/// representable instant counts every entry.
fn window_start(now: DateTime<Utc>, recent_window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(recent_window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Statistics {
    /// Per-type counts with their share of all organizations, in type
    /// order. An empty directory yields no rows.
    pub fn type_distribution(&self) -> Vec<TypeShare> {
        self.organizations_by_type
            .iter()
            .map(|(org_type, count)| TypeShare {
                org_type: *org_type,
                count: *count,
                share: share_of(*count, self.total_organizations),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::SCALE;
    use crate::domain::{EntityType, OperationType, Operator};
    use crate::log::NewLogEntry;

    #[test]
    fn test_empty_directory_statistics() {
        let stats = compute_statistics(
            &DirectoryState::default(),
            &OperationLog::new(),
            Duration::hours(24),
            Utc::now(),
        );
        assert_eq!(stats.total_organizations, 0);
        assert!(stats.organizations_by_type.is_empty());
        assert!(stats.type_distribution().is_empty());
        assert_eq!(stats.recent_operations, 0);
    }

    #[test]
    fn test_oversized_window_counts_whole_log() {
        let mut log = OperationLog::new();
        let now = Utc::now();
        log.append_at(
            NewLogEntry {
                op_type: OperationType::Create,
                entity_type: EntityType::Organization,
                entity_id: "1".to_string(),
                operator: Operator::system(),
                description: "Created organization Acme".to_string(),
                changes: None,
            },
            now - Duration::days(3650),
        );
        let stats = compute_statistics(
            &DirectoryState::default(),
            &log,
            Duration::hours(i64::from(u32::MAX)),
            now,
        );
        assert_eq!(stats.recent_operations, 1);
    }

    #[test]
    fn test_distribution_shares() {
        let mut by_type = BTreeMap::new();
        by_type.insert(OrgType::Company, 1);
        by_type.insert(OrgType::Department, 3);
        let stats = Statistics {
            total_organizations: 4,
            total_personnel: 0,
            active_organizations: 4,
            active_personnel: 0,
            recent_operations: 0,
            organizations_by_type: by_type,
            personnel_by_status: BTreeMap::new(),
        };
        let rows = stats.type_distribution();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].org_type, OrgType::Company);
        assert_eq!(rows[0].share, SCALE / 4);
        assert_eq!(rows[1].percent(), "75.0%");
    }

    #[test]
    fn test_statistics_serialize_type_keys_by_wire_name() {
        let mut by_type = BTreeMap::new();
        by_type.insert(OrgType::Branch, 2);
        let stats = Statistics {
            total_organizations: 2,
            total_personnel: 0,
            active_organizations: 0,
            active_personnel: 0,
            recent_operations: 0,
            organizations_by_type: by_type,
            personnel_by_status: BTreeMap::new(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["organizationsByType"]["branch"], 2);
    }
}
