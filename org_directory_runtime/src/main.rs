//! Directory console. Seeds a directory and prints the dashboard.
//!
//! Config file path is read from `ORG_DIRECTORY_CONFIG`; every setting
//! can also be overridden through `ORG_DIRECTORY_*` variables.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;

use org_directory_runtime::config::{DirectoryConfig, CONFIG_PATH_VAR};
use org_directory_runtime::report::{build_dashboard, render_text};
use org_directory_runtime::seed::SeedData;
use org_directory_runtime::telemetry::init_tracing;

fn main() -> ExitCode {
    let config_path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
    let config = match DirectoryConfig::load(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging);

    let directory = match SeedData::load(config.seed.path.as_deref())
        .and_then(|seed| seed.into_directory(config.directory_options()))
    {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "failed to seed directory");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        organizations = directory.organizations().len(),
        personnel = directory.personnel().len(),
        operator = %config.operator.name,
        "directory ready"
    );

    let report = build_dashboard(&directory, config.statistics.recent_log_limit, Utc::now());
    print!("{}", render_text(&report));
    ExitCode::SUCCESS
}
