//! Integration tests for org_directory_runtime.
//!
//! File-backed tests use temporary directories for isolation.

use std::fs;
use std::thread;

use chrono::{Duration, NaiveDate, Utc};

use org_directory::{DirectoryOptions, NewOrganization, OrgType, Operator, OrganizationChanges};
use org_directory_runtime::config::DirectoryConfig;
use org_directory_runtime::report::{build_dashboard, render_text};
use org_directory_runtime::seed::{SeedData, SeedError};
use org_directory_runtime::session::SharedDirectory;

const INVALID_SEED: &str = r#"{
  "organizations": [
    {
      "id": "t1", "name": "Platform Team", "type": "team",
      "establishedDate": "2021-01-01", "status": "active",
      "employeeCount": 6, "createdBy": "System administrator",
      "createdAt": "2024-01-01T00:00:00Z"
    },
    {
      "id": "t2", "name": "Tools Squad", "type": "team", "parentId": "t1",
      "establishedDate": "2021-02-01", "status": "active",
      "employeeCount": 3, "createdBy": "System administrator",
      "createdAt": "2024-01-02T00:00:00Z"
    }
  ]
}"#;

fn builtin_directory() -> org_directory::Directory {
    SeedData::builtin()
        .unwrap()
        .into_directory(DirectoryOptions::default())
        .unwrap()
}

// ─────────────────────────────────────────────────────────────
// Config and seed files
// ─────────────────────────────────────────────────────────────

#[test]
fn test_config_file_points_at_seed_file() {
    let tmp = tempfile::tempdir().unwrap();
    let seed_path = tmp.path().join("seed.json");
    fs::write(&seed_path, org_directory_runtime::seed::BUILTIN_SEED).unwrap();

    let config_path = tmp.path().join("directory.toml");
    fs::write(
        &config_path,
        format!(
            "[operator]\nid = \"user_009\"\nname = \"Auditor\"\n\n[seed]\npath = {:?}\n\n[statistics]\nrecent_log_limit = 2\n",
            seed_path.display().to_string()
        ),
    )
    .unwrap();

    let config = DirectoryConfig::from_file(&config_path).unwrap();
    assert_eq!(config.operator(), Operator::new("user_009", "Auditor"));
    assert_eq!(config.seed.path.as_deref(), Some(seed_path.as_path()));

    let dir = SeedData::load(config.seed.path.as_deref())
        .unwrap()
        .into_directory(config.directory_options())
        .unwrap();
    assert_eq!(dir.organizations().len(), 5);
    assert_eq!(dir.personnel().len(), 3);
    assert_eq!(dir.log().len(), 3);
}

#[test]
fn test_largest_configured_window_keeps_statistics_total() {
    let config =
        DirectoryConfig::from_toml("[statistics]\nrecent_window_hours = 4294967295").unwrap();
    let dir = SeedData::builtin()
        .unwrap()
        .into_directory(config.directory_options())
        .unwrap();
    let stats = dir.statistics();
    assert_eq!(stats.recent_operations, 3);
    assert_eq!(stats.total_organizations, 5);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = DirectoryConfig::from_file(&tmp.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_missing_seed_file_is_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = SeedData::load(Some(&tmp.path().join("absent.json"))).unwrap_err();
    assert!(matches!(err, SeedError::Io { .. }));
}

#[test]
fn test_seed_with_team_parent_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, INVALID_SEED).unwrap();

    let err = SeedData::load(Some(&path))
        .unwrap()
        .into_directory(DirectoryOptions::default())
        .unwrap_err();
    match err {
        SeedError::Invalid(e) => assert!(e.is_validation()),
        other => panic!("expected invariant failure, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────
// Shared handle
// ─────────────────────────────────────────────────────────────

#[test]
fn test_concurrent_creates_are_all_logged() {
    let shared = SharedDirectory::new(builtin_directory());
    let operator = Operator::new("user_001", "Admin");

    thread::scope(|s| {
        for worker in 0..4 {
            let shared = &shared;
            let operator = &operator;
            s.spawn(move || {
                for i in 0..5 {
                    let input = NewOrganization {
                        name: format!("Unit {worker}-{i}"),
                        org_type: Some(OrgType::Team),
                        parent_id: Some("2".to_string()),
                        established_date: NaiveDate::from_ymd_opt(2024, 6, 1),
                        ..Default::default()
                    };
                    shared.create_organization(operator, input).unwrap();
                }
            });
        }
    });

    let stats = shared.statistics();
    assert_eq!(stats.total_organizations, 25);
    assert_eq!(stats.recent_operations, 20);

    let dir = shared.into_inner();
    assert_eq!(dir.log().len(), 23);
    assert_eq!(dir.children_of("2").len(), 21);
}

#[test]
fn test_rejected_command_through_handle_leaves_state() {
    let shared = SharedDirectory::new(builtin_directory());
    let operator = Operator::system();

    // "3" is a team.
    let err = shared
        .update_organization(
            &operator,
            "4",
            OrganizationChanges {
                parent_id: Some(Some("3".to_string())),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(err.is_validation());

    let (parent, log_len) = shared.read(|d| {
        (
            d.organization("4").and_then(|o| o.parent_id.clone()),
            d.log().len(),
        )
    });
    assert_eq!(parent.as_deref(), Some("1"));
    assert_eq!(log_len, 3);
}

// ─────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────

#[test]
fn test_dashboard_from_builtin_seed() {
    let dir = builtin_directory();
    let report = build_dashboard(&dir, 2, Utc::now());

    assert_eq!(report.statistics.total_organizations, 5);
    let total: usize = report.type_distribution.iter().map(|r| r.count).sum();
    assert_eq!(total, 5);
    assert!(report.type_distribution.iter().all(|r| r.count > 0));
    assert_eq!(report.recent_operations.len(), 2);

    let text = render_text(&report);
    assert!(text.contains("Organizations: 5"));
    assert!(text.contains("40.0%"));
    assert!(text.contains("(Active: 5)"));
    assert!(text.contains("Employed"));
}

#[test]
fn test_seed_history_lists_newest_first() {
    let report = build_dashboard(&builtin_directory(), 10, Utc::now());
    let stamps: Vec<_> = report.recent_operations.iter().map(|e| e.timestamp).collect();
    assert_eq!(stamps.len(), 3);
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_dashboard_window_counts_new_commands() {
    let mut dir = builtin_directory();
    dir.delete_personnel(&Operator::system(), "3").unwrap();

    let now = Utc::now();
    assert_eq!(build_dashboard(&dir, 10, now).statistics.recent_operations, 1);
    let later = build_dashboard(&dir, 10, now + Duration::hours(25));
    assert_eq!(later.statistics.recent_operations, 0);
    assert_eq!(later.recent_operations.len(), 4);
    assert_eq!(later.recent_operations[0].entity_id, "3");
}

#[test]
fn test_dashboard_serializes_camel_case() {
    let report = build_dashboard(&builtin_directory(), 1, Utc::now());
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("typeDistribution").is_some());
    assert_eq!(json["statistics"]["totalOrganizations"], 5);
}
