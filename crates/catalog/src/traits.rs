//! Catalog store trait definitions.

use async_trait::async_trait;
use entities::{Loan, Material, MaterialId, MaterialKind, User};

use crate::{CatalogResult, CatalogSnapshot, CatalogStatistics};

/// Filter options for listing materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    /// Filter by kind.
    pub kind: Option<MaterialKind>,
    /// Filter by availability.
    pub available: Option<bool>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the author.
    pub author: Option<String>,
}

impl MaterialFilter {
    /// Returns true if the material passes every set criterion.
    pub fn matches(&self, material: &Material) -> bool {
        let mut matches = true;
        if let Some(kind) = self.kind {
            matches = matches && material.kind() == kind;
        }
        if let Some(available) = self.available {
            matches = matches && material.is_available() == available;
        }
        if let Some(title) = &self.title {
            matches = matches && material.title().to_lowercase().contains(&title.to_lowercase());
        }
        if let Some(author) = &self.author {
            matches = matches && material.author().to_lowercase().contains(&author.to_lowercase());
        }
        matches
    }
}

/// Shared, concurrently usable access to a catalog.
///
/// Mutations are serialized: two callers racing to check out or reserve
/// the same material cannot both succeed. Reads return owned copies taken
/// under the same lock, so they never see a loan without its matching
/// availability change.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Material operations
    // =========================================================================

    /// Adds a material.
    async fn add_material(&self, material: Material) -> CatalogResult<()>;

    /// Removes a material by ID. Returns false if it was unknown.
    async fn remove_material(&self, id: MaterialId) -> CatalogResult<bool>;

    /// Gets a material by ID.
    async fn get_material(&self, id: MaterialId) -> CatalogResult<Option<Material>>;

    /// Lists materials matching the filter, in catalog order.
    async fn list_materials(&self, filter: MaterialFilter) -> CatalogResult<Vec<Material>>;

    // =========================================================================
    // User operations
    // =========================================================================

    /// Registers a user.
    async fn add_user(&self, user: User) -> CatalogResult<()>;

    /// Finds a user by case-insensitive name.
    async fn find_user(&self, name: &str) -> CatalogResult<Option<User>>;

    /// Lists registered users.
    async fn list_users(&self) -> CatalogResult<Vec<User>>;

    // =========================================================================
    // Lending operations
    // =========================================================================

    /// Lends a material to the named user.
    async fn checkout(&self, material_id: MaterialId, user_name: &str) -> CatalogResult<bool>;

    /// Takes a material back.
    async fn return_material(&self, material_id: MaterialId) -> CatalogResult<bool>;

    /// Lists active loans.
    async fn list_active_loans(&self) -> CatalogResult<Vec<Loan>>;

    /// Lists active loans that are past their limit.
    async fn list_overdue_loans(&self) -> CatalogResult<Vec<Loan>>;

    // =========================================================================
    // Reservation operations
    // =========================================================================

    /// Places a reservation on a reservable material.
    async fn reserve(&self, material_id: MaterialId, user_name: &str) -> CatalogResult<bool>;

    /// Withdraws a reservation.
    async fn cancel_reservation(&self, material_id: MaterialId) -> CatalogResult<bool>;

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Computes catalog statistics.
    async fn statistics(&self) -> CatalogResult<CatalogStatistics>;

    /// Takes a consistent snapshot of the whole catalog.
    async fn snapshot(&self) -> CatalogResult<CatalogSnapshot>;
}
