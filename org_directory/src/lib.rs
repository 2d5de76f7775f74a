#![forbid(unsafe_code)]

//! Organization directory kernel.
//!
//! In-memory store of organizations and personnel with validated
//! hierarchy, list filtering, dashboard statistics and an append-only
//! operation log. No I/O; host concerns live in the runtime crate.

pub mod arithmetic;
pub mod domain;
pub mod error;
pub mod state;
pub mod hierarchy;
pub mod invariants;
pub mod log;
pub mod transitions;
pub mod query;
pub mod stats;
pub mod engine;

pub use domain::{
    EntityType, NewOrganization, NewPersonnel, OperationType, Operator, OrgStatus, OrgType,
    Organization, OrganizationChanges, Personnel, PersonnelChanges, PersonnelStatus,
};
pub use engine::{DeletionImpact, Directory, DirectoryOptions};
pub use error::{DirectoryError, DirectoryResult};
pub use log::{ChangeSet, FieldChange, LogEntry, NewLogEntry, OperationLog};
pub use query::{OrganizationFilter, PersonnelFilter, UNKNOWN_ORGANIZATION};
pub use state::DirectoryState;
pub use stats::{Statistics, TypeShare};
