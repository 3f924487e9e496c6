use thiserror::Error;

use crate::error::AppError;
use crate::models::{prepare_record, HighlightPayload, IndexSummary};
use crate::services::ItemTable;

/// The first failed write stops the pass; `summary` counts what happened
/// before it.
#[derive(Debug, Error)]
#[error("indexing aborted after {stored} stored records: {source}", stored = .summary.stored)]
pub struct IndexAborted {
    pub summary: IndexSummary,
    pub source: AppError,
}

/// Upserts every keyable record of the payload's `data` list, stamped with
/// `fetch_date`. Records without an `id` or `url` are skipped.
pub async fn index_highlights(
    table: &dyn ItemTable,
    payload: &HighlightPayload,
    fetch_date: &str,
) -> std::result::Result<IndexSummary, IndexAborted> {
    let mut summary = IndexSummary::default();

    for entry in payload.records() {
        let prepared = entry
            .as_object()
            .cloned()
            .and_then(|record| prepare_record(record, fetch_date));

        let Some((key, record)) = prepared else {
            tracing::debug!("Skipping highlight without id or url");
            summary.skipped += 1;
            continue;
        };

        if let Err(source) = table.put_item(&key, &record).await {
            return Err(IndexAborted { summary, source });
        }
        tracing::debug!("Stored record with key {}", key);
        summary.stored += 1;
    }

    Ok(summary)
}
