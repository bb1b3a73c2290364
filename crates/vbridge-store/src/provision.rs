//! Collection provisioning
//!
//! Walks the collection table in declaration order and creates whatever is
//! missing. Check-then-act, not atomic: serialization across callers is the
//! surrounding front-end's concern, and the store's creation call tolerates
//! an existing collection. Repeated calls converge; there is no rollback of
//! collections created before a failure.

use vbridge_core::{CollectionTable, Result};

use crate::VectorStore;

/// What a provisioning pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Specs whose existence was checked
    pub checked: usize,
    /// Collections actually created
    pub created: usize,
}

/// Ensure every collection in the table exists.
///
/// The first existence-check or creation failure aborts the remaining specs
/// and surfaces as the single error.
pub async fn ensure_collections(
    store: &dyn VectorStore,
    table: &CollectionTable,
) -> Result<ProvisionReport> {
    let mut report = ProvisionReport::default();

    for spec in table.iter() {
        report.checked += 1;
        if !store.has_collection(&spec.name).await? {
            store.create_collection(spec).await?;
            report.created += 1;
            tracing::info!(
                collection = %spec.name,
                dimension = spec.dimension,
                metric = %spec.metric,
                "created collection"
            );
        }
    }

    Ok(report)
}
