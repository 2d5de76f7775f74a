//! Directory: State Construction
//!
//! Collections keep insertion order; every list view relies on it.

use serde::{Deserialize, Serialize};

use crate::domain::{Organization, Personnel};

/// The two canonical collections owned by the entity store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryState {
    pub organizations: Vec<Organization>,
    pub personnel: Vec<Personnel>,
}

impl DirectoryState {
    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    pub fn person(&self, id: &str) -> Option<&Personnel> {
        self.personnel.iter().find(|p| p.id == id)
    }

    pub(crate) fn organization_index(&self, id: &str) -> Option<usize> {
        self.organizations.iter().position(|o| o.id == id)
    }

    pub(crate) fn person_index(&self, id: &str) -> Option<usize> {
        self.personnel.iter().position(|p| p.id == id)
    }
}
