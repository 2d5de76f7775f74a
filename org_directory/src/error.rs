//! Error types for the directory kernel.
//!
//! Commands fail with one of two kinds. Queries never fail.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("Validation error on `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DirectoryError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::validation(field, "required field is missing")
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
