//! Dashboard report: the statistics view rendered by the console.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use org_directory::{Directory, LogEntry, OrgStatus, OrgType, PersonnelStatus, Statistics};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRow {
    pub org_type: OrgType,
    pub label: &'static str,
    pub count: usize,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub statistics: Statistics,
    pub type_distribution: Vec<DistributionRow>,
    /// Newest first.
    pub recent_operations: Vec<LogEntry>,
}

pub fn build_dashboard(dir: &Directory, recent_limit: usize, now: DateTime<Utc>) -> DashboardReport {
    let statistics = dir.statistics_at(now);
    let type_distribution = statistics
        .type_distribution()
        .into_iter()
        .map(|row| DistributionRow {
            org_type: row.org_type,
            label: row.org_type.label(),
            count: row.count,
            percent: row.percent(),
        })
        .collect();

    DashboardReport {
        generated_at: now,
        statistics,
        type_distribution,
        recent_operations: dir.recent_operations(recent_limit).cloned().collect(),
    }
}

/// Plain-text rendering for a terminal.
pub fn render_text(report: &DashboardReport) -> String {
    let s = &report.statistics;
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "Organizations: {} ({}: {})",
        s.total_organizations,
        OrgStatus::Active.label(),
        s.active_organizations
    );
    let _ = writeln!(
        out,
        "Personnel:     {} ({}: {})",
        s.total_personnel,
        PersonnelStatus::Active.label(),
        s.active_personnel
    );
    let _ = writeln!(out, "Recent operations: {}", s.recent_operations);

    let _ = writeln!(out, "\nOrganization types:");
    for row in &report.type_distribution {
        let _ = writeln!(out, "  {:<14} {:>4}  {:>6}", row.label, row.count, row.percent);
    }

    let _ = writeln!(out, "\nPersonnel status:");
    for (status, count) in &s.personnel_by_status {
        let _ = writeln!(out, "  {:<14} {:>4}", status.label(), count);
    }

    let _ = writeln!(out, "\nRecent activity:");
    for entry in &report.recent_operations {
        let _ = writeln!(
            out,
            "  [{}] {} {}: {} ({})",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.op_type.label(),
            entry.entity_type.label(),
            entry.description,
            entry.operator_name
        );
    }
    out
}
