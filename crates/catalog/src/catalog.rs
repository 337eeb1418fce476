//! The catalog registry: materials, users and active loans.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use entities::{
    DEFAULT_LOAN_LIMIT_DAYS, Loan, Material, MaterialId, MaterialKind, Reservable, User,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{CatalogError, CatalogResult};

/// Point-in-time counts over the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    /// Number of materials.
    pub total: usize,
    /// Materials currently available.
    pub available: usize,
    /// Materials currently on loan.
    pub on_loan: usize,
    /// Materials per kind tag. Book, DVD and Magazine are always present.
    pub counts_by_kind: BTreeMap<String, usize>,
    /// Registered users.
    pub user_count: usize,
    /// Loans not yet returned.
    pub active_loan_count: usize,
}

/// Registry owning every material, user and loan.
///
/// The catalog is the only place loans are created or closed. Each
/// checkout flips the material, opens the loan and updates the user's held
/// set in one step; each return undoes all three.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) name: String,
    pub(crate) loan_limit_days: u32,
    pub(crate) materials: Vec<Material>,
    pub(crate) users: Vec<User>,
    pub(crate) active_loans: Vec<Loan>,
    pub(crate) closed_loans: Vec<Loan>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new("Central Library")
    }
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loan_limit_days: DEFAULT_LOAN_LIMIT_DAYS,
            materials: Vec::new(),
            users: Vec::new(),
            active_loans: Vec::new(),
            closed_loans: Vec::new(),
        }
    }

    /// Sets the loan period applied to new loans.
    pub fn with_loan_limit_days(mut self, days: u32) -> Self {
        self.loan_limit_days = days;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loan_limit_days(&self) -> u32 {
        self.loan_limit_days
    }

    // =========================================================================
    // Material operations
    // =========================================================================

    /// Adds a material. Fails if its ID is already taken.
    pub fn add_material(&mut self, material: Material) -> CatalogResult<()> {
        if self.material_index(material.id()).is_some() {
            return Err(CatalogError::already_exists("Material", material.id()));
        }
        debug!(material_id = material.id(), kind = %material.kind(), "Adding material");
        self.materials.push(material);
        Ok(())
    }

    /// Removes a material by ID. Returns false if the ID is unknown.
    ///
    /// An active loan on the material is discarded along with the user's
    /// held reference, so no loan outlives its material.
    pub fn remove_material(&mut self, id: MaterialId) -> bool {
        let Some(index) = self.material_index(id) else {
            return false;
        };
        self.materials.remove(index);

        if let Some(pos) = self.loan_index(id) {
            let loan = self.active_loans.remove(pos);
            if let Some(user) = self.users.iter_mut().find(|u| u.id() == loan.user_id()) {
                user.remove_loan(id);
            }
            warn!(material_id = id, user = loan.user_name(), "Removed material with an active loan");
        }
        info!(material_id = id, "Material removed");
        true
    }

    /// Finds a material by exact ID.
    pub fn find_by_id(&self, id: MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| m.id() == id)
    }

    /// Case-insensitive substring search on titles, in catalog order.
    pub fn search_by_title(&self, query: &str) -> Vec<&Material> {
        let query = query.to_lowercase();
        self.materials
            .iter()
            .filter(|m| m.title().to_lowercase().contains(&query))
            .collect()
    }

    /// Case-insensitive substring search on authors, in catalog order.
    pub fn search_by_author(&self, query: &str) -> Vec<&Material> {
        let query = query.to_lowercase();
        self.materials
            .iter()
            .filter(|m| m.author().to_lowercase().contains(&query))
            .collect()
    }

    /// All materials, in catalog order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn list_available(&self) -> Vec<&Material> {
        self.materials.iter().filter(|m| m.is_available()).collect()
    }

    pub fn list_on_loan(&self) -> Vec<&Material> {
        self.materials.iter().filter(|m| !m.is_available()).collect()
    }

    /// Materials of the given kind, in catalog order.
    pub fn list_by_kind(&self, kind: MaterialKind) -> Vec<&Material> {
        self.materials.iter().filter(|m| m.kind() == kind).collect()
    }

    pub fn books(&self) -> Vec<&Material> {
        self.list_by_kind(MaterialKind::Book)
    }

    pub fn dvds(&self) -> Vec<&Material> {
        self.list_by_kind(MaterialKind::Dvd)
    }

    pub fn magazines(&self) -> Vec<&Material> {
        self.list_by_kind(MaterialKind::Magazine)
    }

    // =========================================================================
    // User operations
    // =========================================================================

    /// Registers a user. Names are not required to be unique.
    pub fn add_user(&mut self, user: User) {
        debug!(user = user.name(), "Registering user");
        self.users.push(user);
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Case-insensitive exact name match; the first registered user wins.
    pub fn find_user(&self, name: &str) -> Option<&User> {
        self.user_index(name).map(|i| &self.users[i])
    }

    // =========================================================================
    // Lending operations
    // =========================================================================

    /// Lends a material to the named user.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the material ID or the user name is unknown.
    /// - `AlreadyOnLoan` if the material is not available.
    pub fn checkout(&mut self, material_id: MaterialId, user_name: &str) -> CatalogResult<bool> {
        self.checkout_at(material_id, user_name, Utc::now())
    }

    /// Lends a material with an explicit checkout time.
    pub fn checkout_at(
        &mut self,
        material_id: MaterialId,
        user_name: &str,
        at: DateTime<Utc>,
    ) -> CatalogResult<bool> {
        let material_index = self
            .material_index(material_id)
            .ok_or_else(|| CatalogError::not_found("Material", material_id))?;
        if !self.materials[material_index].is_available() {
            return Err(CatalogError::AlreadyOnLoan { material_id });
        }
        let user_index = self
            .user_index(user_name)
            .ok_or_else(|| CatalogError::not_found("User", user_name))?;

        let material = &mut self.materials[material_index];
        let user = &mut self.users[user_index];

        // Flip the material first so a failed transition never leaves a loan.
        if !material.checkout_at(user, at) {
            return Ok(false);
        }
        let loan = Loan::open_at(material, user, self.loan_limit_days, at);
        info!(
            material_id,
            user = user.name(),
            due_at = %loan.due_at(),
            "Material checked out"
        );
        self.active_loans.push(loan);
        Ok(true)
    }

    /// Takes a material back. Returns false only if the ID is unknown.
    ///
    /// The active loan, if any, is closed and moved to the closed loans.
    /// Without a tracked loan the material's own return transition runs,
    /// and its result is returned.
    pub fn return_material(&mut self, material_id: MaterialId) -> bool {
        self.return_material_at(material_id, Utc::now())
    }

    /// Takes a material back with an explicit return time.
    pub fn return_material_at(&mut self, material_id: MaterialId, at: DateTime<Utc>) -> bool {
        let Some(material_index) = self.material_index(material_id) else {
            debug!(material_id, "Return requested for unknown material");
            return false;
        };
        let Some((loan_index, user_index)) = self.tracked_loan(material_id) else {
            let material = &mut self.materials[material_index];
            if !material.is_available() {
                warn!(material_id, "No active loan tracked, returning material directly");
            }
            return material.return_item_at(at);
        };

        let mut loan = self.active_loans.remove(loan_index);
        loan.close_at(
            &mut self.materials[material_index],
            &mut self.users[user_index],
            at,
        );
        info!(
            material_id,
            user = loan.user_name(),
            days_late = loan.days_late(),
            fine = %loan.compute_fine(),
            "Material returned"
        );
        self.closed_loans.push(loan);
        true
    }

    /// Loans not yet returned, in checkout order.
    pub fn active_loans(&self) -> &[Loan] {
        &self.active_loans
    }

    /// Loans returned through the catalog, in return order.
    ///
    /// This is the lending history and is never pruned. It is carried in
    /// every snapshot.
    pub fn closed_loans(&self) -> &[Loan] {
        &self.closed_loans
    }

    /// The active loan for a material, if any.
    pub fn active_loan_for(&self, material_id: MaterialId) -> Option<&Loan> {
        self.active_loans
            .iter()
            .find(|l| l.material_id() == material_id)
    }

    pub fn overdue_loans(&self) -> Vec<&Loan> {
        self.overdue_loans_at(Utc::now())
    }

    /// Active loans past their limit at `now`.
    pub fn overdue_loans_at(&self, now: DateTime<Utc>) -> Vec<&Loan> {
        self.active_loans
            .iter()
            .filter(|l| l.is_overdue_at(now))
            .collect()
    }

    // =========================================================================
    // Reservation operations
    // =========================================================================

    /// Places a reservation for the named user.
    ///
    /// Returns the capability's result: false if the material is on loan.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the material ID or the user name is unknown.
    /// - `NotReservable` if the material kind has no reservation capability.
    pub fn reserve(&mut self, material_id: MaterialId, user_name: &str) -> CatalogResult<bool> {
        let user_name = self
            .find_user(user_name)
            .map(|u| u.name().to_string())
            .ok_or_else(|| CatalogError::not_found("User", user_name))?;
        let mut reservable = self.reservable_mut(material_id)?;
        let reserved = reservable.reserve(&user_name);
        info!(material_id, user = %user_name, reserved, "Reservation requested");
        Ok(reserved)
    }

    /// Withdraws the reservation on a material.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::reserve`], minus the user lookup.
    pub fn cancel_reservation(&mut self, material_id: MaterialId) -> CatalogResult<bool> {
        let cancelled = self.reservable_mut(material_id)?.cancel_reservation();
        info!(material_id, cancelled, "Reservation cancellation requested");
        Ok(cancelled)
    }

    fn reservable_mut(
        &mut self,
        material_id: MaterialId,
    ) -> CatalogResult<entities::ReservableMaterial<'_>> {
        let index = self
            .material_index(material_id)
            .ok_or_else(|| CatalogError::not_found("Material", material_id))?;
        let material = &mut self.materials[index];
        let kind = material.kind();
        material
            .as_reservable_mut()
            .ok_or(CatalogError::NotReservable { material_id, kind })
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Computes fresh counts over materials, users and loans.
    pub fn statistics(&self) -> CatalogStatistics {
        let mut counts_by_kind: BTreeMap<String, usize> = MaterialKind::ALL
            .iter()
            .map(|kind| (kind.as_str().to_string(), 0))
            .collect();
        let mut available = 0;
        for material in &self.materials {
            if material.is_available() {
                available += 1;
            }
            *counts_by_kind
                .entry(material.kind().as_str().to_string())
                .or_default() += 1;
        }

        CatalogStatistics {
            total: self.materials.len(),
            available,
            on_loan: self.materials.len() - available,
            counts_by_kind,
            user_count: self.users.len(),
            active_loan_count: self.active_loans.len(),
        }
    }

    fn material_index(&self, id: MaterialId) -> Option<usize> {
        self.materials.iter().position(|m| m.id() == id)
    }

    fn user_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.users
            .iter()
            .position(|u| u.name().to_lowercase() == name)
    }

    fn loan_index(&self, material_id: MaterialId) -> Option<usize> {
        self.active_loans
            .iter()
            .position(|l| l.material_id() == material_id)
    }

    /// Positions of a material's active loan and of the user holding it.
    fn tracked_loan(&self, material_id: MaterialId) -> Option<(usize, usize)> {
        let loan_index = self.loan_index(material_id)?;
        let user_id = self.active_loans[loan_index].user_id();
        let user_index = self.users.iter().position(|u| u.id() == user_id)?;
        Some((loan_index, user_index))
    }
}
