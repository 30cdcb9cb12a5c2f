use tracing::info;

use crate::{Filter, IndexStore, Page, StoreError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReport {
    pub total_ids: usize,
    pub deleted: usize,
    pub batches: usize,
}

/// Orchestrate deletion: list uuids by filters in batches, then delete them.
///
/// Strategy: repeatedly fetch the first N matching uuids (page 0) and delete;
/// rows shift as we remove. Stops early if a batch deletes nothing, so a
/// misbehaving store cannot spin forever.
pub fn delete_by_filter_orchestrated(
    store: &mut dyn IndexStore,
    kind: &str,
    filters: &[Filter],
    batch_size: usize,
) -> Result<DeleteReport, StoreError> {
    let mut report = DeleteReport::default();
    let batch = batch_size.max(1);

    loop {
        let uuids: Vec<String> = store
            .find_documents(kind, filters, Some(Page::new(0, batch)))?
            .into_iter()
            .map(|d| d.uuid)
            .collect();
        if uuids.is_empty() {
            break;
        }
        report.total_ids += uuids.len();
        report.batches += 1;

        let n = store.delete_documents(kind, &uuids)?;
        report.deleted += n;
        if n == 0 {
            break;
        }
    }
    info!(kind, deleted = report.deleted, batches = report.batches, "bulk delete finished");
    Ok(report)
}
