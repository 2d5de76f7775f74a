//! Seed data, the initial collections a directory starts from.
//!
//! Seed files are JSON with the data-model field names. Every seed
//! passes the kernel invariants before a directory is built from it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use org_directory::{
    Directory, DirectoryError, DirectoryOptions, DirectoryState, LogEntry, OperationLog,
    Organization, Personnel,
};

/// The fixture shipped with the console.
pub const BUILTIN_SEED: &str = include_str!("../fixtures/seed.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Seed data violates directory invariants: {0}")]
    Invalid(#[from] DirectoryError),
}

/// On-disk seed format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SeedData {
    pub organizations: Vec<Organization>,
    pub personnel: Vec<Personnel>,
    /// Historical entries, oldest-appended first.
    pub operation_logs: Vec<LogEntry>,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_json(BUILTIN_SEED)
    }

    /// Read `path`, or fall back to the built-in fixture.
    pub fn load(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(p) => {
                let json = fs::read_to_string(p).map_err(|e| SeedError::Io {
                    path: p.display().to_string(),
                    source: e,
                })?;
                tracing::debug!(path = %p.display(), "loading seed file");
                Self::from_json(&json)
            }
            None => Self::builtin(),
        }
    }

    /// Validate and hand the collections to a new directory.
    pub fn into_directory(self, options: DirectoryOptions) -> Result<Directory, SeedError> {
        let state = DirectoryState {
            organizations: self.organizations,
            personnel: self.personnel,
        };
        let log = OperationLog::from_entries(self.operation_logs);
        Ok(Directory::from_seed(state, log, options)?)
    }
}
