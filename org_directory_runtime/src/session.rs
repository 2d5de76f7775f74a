//! Shared directory handle for multi-threaded hosts.
//!
//! One Mutex guards the whole directory, so every command's
//! validate → apply → append-log sequence runs as a single unit.
//! Reads go through `read` and see a consistent snapshot.

use std::sync::{Mutex, MutexGuard, PoisonError};

use org_directory::{
    Directory, DirectoryResult, NewOrganization, NewPersonnel, Operator, Organization,
    OrganizationChanges, Personnel, PersonnelChanges, Statistics,
};

/// Thread-safe directory handle using Mutex.
pub struct SharedDirectory {
    inner: Mutex<Directory>,
}

impl SharedDirectory {
    pub fn new(directory: Directory) -> Self {
        Self {
            inner: Mutex::new(directory),
        }
    }

    // A panic while holding the lock cannot leave a half-applied command:
    // transitions mutate only after validation passes.
    fn lock(&self) -> MutexGuard<'_, Directory> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a read-only view under lock.
    pub fn read<R>(&self, f: impl FnOnce(&Directory) -> R) -> R {
        f(&*self.lock())
    }

    pub fn create_organization(
        &self,
        operator: &Operator,
        input: NewOrganization,
    ) -> DirectoryResult<Organization> {
        self.lock().create_organization(operator, input)
    }

    pub fn update_organization(
        &self,
        operator: &Operator,
        id: &str,
        changes: OrganizationChanges,
    ) -> DirectoryResult<Organization> {
        self.lock().update_organization(operator, id, changes)
    }

    pub fn delete_organization(&self, operator: &Operator, id: &str) -> DirectoryResult<Organization> {
        self.lock().delete_organization(operator, id)
    }

    pub fn create_personnel(
        &self,
        operator: &Operator,
        input: NewPersonnel,
    ) -> DirectoryResult<Personnel> {
        self.lock().create_personnel(operator, input)
    }

    pub fn update_personnel(
        &self,
        operator: &Operator,
        id: &str,
        changes: PersonnelChanges,
    ) -> DirectoryResult<Personnel> {
        self.lock().update_personnel(operator, id, changes)
    }

    pub fn delete_personnel(&self, operator: &Operator, id: &str) -> DirectoryResult<Personnel> {
        self.lock().delete_personnel(operator, id)
    }

    pub fn statistics(&self) -> Statistics {
        self.lock().statistics()
    }

    /// Take the directory back out of the handle.
    pub fn into_inner(self) -> Directory {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
