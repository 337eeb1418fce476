//! Circulation report logged at startup.

use catalog::{CatalogStore, MaterialFilter};
use entities::Fine;
use tracing::{info, warn};

/// Summary of the catalog's lending state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirculationReport {
    /// Materials in the catalog.
    pub total: usize,
    /// Materials currently on loan.
    pub on_loan: usize,
    /// Active loans past their limit.
    pub overdue: usize,
    /// Sum of fines currently owed on active loans.
    pub outstanding_fines: Fine,
}

/// Gathers the report from the store and logs it.
pub async fn log_report<S: CatalogStore + ?Sized>(store: &S) -> anyhow::Result<CirculationReport> {
    let stats = store.statistics().await?;
    info!(
        total = stats.total,
        available = stats.available,
        on_loan = stats.on_loan,
        users = stats.user_count,
        active_loans = stats.active_loan_count,
        "Catalog statistics"
    );
    for (kind, count) in &stats.counts_by_kind {
        info!(kind = %kind, count, "Materials by kind");
    }

    let on_loan = store
        .list_materials(MaterialFilter {
            available: Some(false),
            ..Default::default()
        })
        .await?;
    for material in &on_loan {
        info!(material = %material, "On loan");
    }

    let overdue = store.list_overdue_loans().await?;
    let mut outstanding = 0;
    for loan in &overdue {
        let fine = loan.compute_fine();
        outstanding += fine.cents();
        warn!(
            material_id = loan.material_id(),
            user = loan.user_name(),
            days_late = loan.days_late(),
            fine = %fine,
            "Overdue loan"
        );
    }

    Ok(CirculationReport {
        total: stats.total,
        on_loan: on_loan.len(),
        overdue: overdue.len(),
        outstanding_fines: Fine::from_cents(outstanding),
    })
}

#[cfg(test)]
mod tests {
    use catalog::MemoryCatalogStore;

    use super::*;
    use crate::seed::demo_catalog;

    #[tokio::test]
    async fn test_report_counts() {
        let store = MemoryCatalogStore::new(demo_catalog("Report", 14).unwrap());
        store.checkout(1, "Alice").await.unwrap();
        store.checkout(9, "Carlos").await.unwrap();

        let report = log_report(&store).await.unwrap();
        assert_eq!(report.total, 12);
        assert_eq!(report.on_loan, 2);
        assert_eq!(report.overdue, 0);
        assert_eq!(report.outstanding_fines, Fine::ZERO);
    }
}
