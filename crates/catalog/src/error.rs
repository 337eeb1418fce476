//! Catalog error types.

use entities::{EntityError, MaterialId, MaterialKind};
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Material or user not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Duplicate entity.
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },

    /// Checkout attempted on a material that is not available.
    #[error("Material {material_id} is already on loan")]
    AlreadyOnLoan { material_id: MaterialId },

    /// Reservation requested on a kind without the capability.
    #[error("Material {material_id} ({kind}) does not accept reservations")]
    NotReservable {
        material_id: MaterialId,
        kind: MaterialKind,
    },

    /// Entity validation failed.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// A snapshot could not be restored.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(entity_type: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Returns true for the not found variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
