//! Snapshot and restore of a whole catalog.

use std::collections::HashSet;

use entities::{Loan, Material, User, validate_email};
use serde::{Deserialize, Serialize};

use crate::{Catalog, CatalogError, CatalogResult};

/// Serializable copy of a catalog's collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Catalog display name.
    pub name: String,
    /// Loan period for new loans.
    pub loan_limit_days: u32,
    /// Materials in catalog order.
    pub materials: Vec<Material>,
    /// Registered users.
    pub users: Vec<User>,
    /// Loans not yet returned.
    pub active_loans: Vec<Loan>,
    /// Loans already returned.
    #[serde(default)]
    pub closed_loans: Vec<Loan>,
}

impl CatalogSnapshot {
    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Catalog {
    /// Copies the catalog's collections into a snapshot.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            name: self.name.clone(),
            loan_limit_days: self.loan_limit_days,
            materials: self.materials.clone(),
            users: self.users.clone(),
            active_loans: self.active_loans.clone(),
            closed_loans: self.closed_loans.clone(),
        }
    }

    /// Rebuilds a catalog from a snapshot.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` for duplicate material IDs.
    /// - `Entity` for a material with a zero size attribute, or a user
    ///   whose email no longer validates.
    /// - `InvalidSnapshot` when a material's holder and checkout time
    ///   disagree, a material sits in more than one user's held set, or an
    ///   active loan references an unknown material or user, an available
    ///   material, a material held by someone else, or a user that does not
    ///   hold the material.
    pub fn restore(snapshot: CatalogSnapshot) -> CatalogResult<Self> {
        let mut ids = HashSet::new();
        for material in &snapshot.materials {
            if !ids.insert(material.id()) {
                return Err(CatalogError::already_exists("Material", material.id()));
            }
            material.validate()?;
            if !material.is_consistent() {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "material {} has inconsistent lending state",
                    material.id()
                )));
            }
        }
        let mut held = HashSet::new();
        for user in &snapshot.users {
            validate_email(user.email())?;
            for &material_id in user.held_materials() {
                if !held.insert(material_id) {
                    return Err(CatalogError::InvalidSnapshot(format!(
                        "material {material_id} is held by more than one user"
                    )));
                }
            }
        }

        let mut loaned = HashSet::new();
        for loan in &snapshot.active_loans {
            let material_id = loan.material_id();
            if !loaned.insert(material_id) {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "material {material_id} has more than one active loan"
                )));
            }
            let material = snapshot
                .materials
                .iter()
                .find(|m| m.id() == material_id)
                .ok_or_else(|| {
                    CatalogError::InvalidSnapshot(format!(
                        "loan {} references unknown material {material_id}",
                        loan.id()
                    ))
                })?;
            if material.is_available() || !loan.is_active() {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "loan {} disagrees with availability of material {material_id}",
                    loan.id()
                )));
            }
            if material.holder().map(|h| h.user_id) != Some(loan.user_id()) {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "loan {} belongs to a different user than holds material {material_id}",
                    loan.id()
                )));
            }
            let holds = snapshot
                .users
                .iter()
                .find(|u| u.id() == loan.user_id())
                .map(|u| u.holds(material_id))
                .ok_or_else(|| {
                    CatalogError::InvalidSnapshot(format!(
                        "loan {} references unknown user {}",
                        loan.id(),
                        loan.user_id()
                    ))
                })?;
            if !holds {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "user {} does not hold material {material_id}",
                    loan.user_name()
                )));
            }
        }

        tracing::info!(
            name = %snapshot.name,
            materials = snapshot.materials.len(),
            users = snapshot.users.len(),
            active_loans = snapshot.active_loans.len(),
            "Catalog restored"
        );

        Ok(Self {
            name: snapshot.name,
            loan_limit_days: snapshot.loan_limit_days,
            materials: snapshot.materials,
            users: snapshot.users,
            active_loans: snapshot.active_loans,
            closed_loans: snapshot.closed_loans,
        })
    }
}
