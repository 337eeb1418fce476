//! In-memory catalog store.

use std::sync::Arc;

use async_trait::async_trait;
use entities::{Loan, Material, MaterialId, User};
use tokio::sync::RwLock;

use crate::{
    Catalog, CatalogResult, CatalogSnapshot, CatalogStatistics, CatalogStore, MaterialFilter,
};

/// Catalog store holding one [`Catalog`] behind a read/write lock.
///
/// Cloning yields another handle to the same catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl MemoryCatalogStore {
    /// Creates a store around an existing catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Creates a store from a snapshot.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> CatalogResult<Self> {
        Ok(Self::new(Catalog::restore(snapshot)?))
    }

    /// Runs a read-only closure against the catalog.
    pub async fn read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        let catalog = self.catalog.read().await;
        f(&catalog)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    // =========================================================================
    // Material operations
    // =========================================================================

    async fn add_material(&self, material: Material) -> CatalogResult<()> {
        let mut catalog = self.catalog.write().await;
        catalog.add_material(material)
    }

    async fn remove_material(&self, id: MaterialId) -> CatalogResult<bool> {
        let mut catalog = self.catalog.write().await;
        Ok(catalog.remove_material(id))
    }

    async fn get_material(&self, id: MaterialId) -> CatalogResult<Option<Material>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.find_by_id(id).cloned())
    }

    async fn list_materials(&self, filter: MaterialFilter) -> CatalogResult<Vec<Material>> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .materials()
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn add_user(&self, user: User) -> CatalogResult<()> {
        let mut catalog = self.catalog.write().await;
        catalog.add_user(user);
        Ok(())
    }

    async fn find_user(&self, name: &str) -> CatalogResult<Option<User>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.find_user(name).cloned())
    }

    async fn list_users(&self) -> CatalogResult<Vec<User>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.users().to_vec())
    }

    // =========================================================================
    // Lending operations
    // =========================================================================

    async fn checkout(&self, material_id: MaterialId, user_name: &str) -> CatalogResult<bool> {
        let mut catalog = self.catalog.write().await;
        catalog.checkout(material_id, user_name)
    }

    async fn return_material(&self, material_id: MaterialId) -> CatalogResult<bool> {
        let mut catalog = self.catalog.write().await;
        Ok(catalog.return_material(material_id))
    }

    async fn list_active_loans(&self) -> CatalogResult<Vec<Loan>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.active_loans().to_vec())
    }

    async fn list_overdue_loans(&self) -> CatalogResult<Vec<Loan>> {
        let catalog = self.catalog.read().await;
        Ok(catalog.overdue_loans().into_iter().cloned().collect())
    }

    // =========================================================================
    // Reservation operations
    // =========================================================================

    async fn reserve(&self, material_id: MaterialId, user_name: &str) -> CatalogResult<bool> {
        let mut catalog = self.catalog.write().await;
        catalog.reserve(material_id, user_name)
    }

    async fn cancel_reservation(&self, material_id: MaterialId) -> CatalogResult<bool> {
        let mut catalog = self.catalog.write().await;
        catalog.cancel_reservation(material_id)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    async fn statistics(&self) -> CatalogResult<CatalogStatistics> {
        let catalog = self.catalog.read().await;
        Ok(catalog.statistics())
    }

    async fn snapshot(&self) -> CatalogResult<CatalogSnapshot> {
        let catalog = self.catalog.read().await;
        Ok(catalog.snapshot())
    }
}
