//! The sync pipeline: fetch every record, map to rows, delete the sheet's
//! existing rows, insert the new ones. Strictly sequential and fail-fast.

pub mod mapper;

use anyhow::{Context, Result};
use log::info;

use crate::api::models::{NewRow, Record};
use crate::api::service::{RecordSource, SheetService};
use crate::config::SyncConfig;
use self::mapper::{ColumnMap, build_row};

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub records_fetched: usize,
    pub rows_deleted: usize,
    pub rows_inserted: usize,
}

/// Fetch every page of the collection, preserving page and in-page order.
///
/// Pages are 1-indexed. A page shorter than `page_size` (an empty one
/// included) is the last page; a source whose size is an exact multiple of
/// `page_size` therefore costs one extra request that returns no records.
pub async fn fetch_all_records<S>(source: &S, page_size: u32) -> Result<Vec<Record>>
where
    S: RecordSource + ?Sized,
{
    let mut records = Vec::new();
    let mut page = 1u32;

    loop {
        let page_records = source
            .fetch_page(page, page_size)
            .await
            .with_context(|| format!("Failed to fetch page {page}"))?;
        let fetched = page_records.len();
        info!("Fetched page {} ({} records)", page, fetched);
        records.extend(page_records);

        if fetched < page_size as usize {
            break;
        }
        page += 1;
    }

    info!("Fetched {} records in total", records.len());
    Ok(records)
}

/// Run the whole pipeline against the given source and destination.
///
/// The first error at any stage aborts the run; rows removed or inserted by
/// batches that already succeeded stay as they are.
pub async fn run<S, D>(source: &S, sheets: &D, config: &SyncConfig) -> Result<SyncReport>
where
    S: RecordSource + ?Sized,
    D: SheetService + ?Sized,
{
    let records = fetch_all_records(source, config.page_size).await?;

    // One sheet read supplies both the column map and the rows to delete.
    let sheet = sheets
        .get_sheet(config.sheet_id)
        .await
        .with_context(|| format!("Failed to read sheet {}", config.sheet_id))?;
    info!(
        "Loaded sheet '{}' ({} columns, {} existing rows)",
        sheet.name,
        sheet.columns.len(),
        sheet.rows.len()
    );
    let column_map = ColumnMap::new(sheet.columns);
    column_map.ensure_fixed_columns()?;

    let rows: Vec<NewRow> = records
        .iter()
        .map(|record| build_row(record, &column_map, config.placement))
        .collect();

    let row_ids: Vec<u64> = sheet.rows.iter().map(|row| row.id).collect();
    if !row_ids.is_empty() {
        info!("Deleting {} existing rows", row_ids.len());
    }
    for (index, batch) in row_ids.chunks(config.delete_batch_size).enumerate() {
        sheets
            .delete_rows(config.sheet_id, batch)
            .await
            .with_context(|| format!("Failed to delete row batch {}", index + 1))?;
        info!("Deleted row batch {} ({} rows)", index + 1, batch.len());
    }

    for (index, batch) in rows.chunks(config.insert_batch_size).enumerate() {
        sheets
            .add_rows(config.sheet_id, batch.to_vec())
            .await
            .with_context(|| format!("Failed to insert row batch {}", index + 1))?;
        info!("Inserted row batch {} ({} rows)", index + 1, batch.len());
    }

    Ok(SyncReport {
        records_fetched: records.len(),
        rows_deleted: row_ids.len(),
        rows_inserted: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct PagedSource {
        records: Vec<Record>,
        requests: Mutex<Vec<u32>>,
        fail_on_page: Option<u32>,
    }

    impl PagedSource {
        fn with_count(count: usize) -> Self {
            Self {
                records: (0..count).map(|i| json!({"id": i})).collect(),
                requests: Mutex::new(Vec::new()),
                fail_on_page: None,
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecordSource for PagedSource {
        async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<Record>> {
            self.requests.lock().unwrap().push(page);
            if self.fail_on_page == Some(page) {
                bail!("Request failed with HTTP 401 Unauthorized: {{\"errorCode\": 1002}}");
            }
            let start = ((page - 1) * page_size) as usize;
            let end = (start + page_size as usize).min(self.records.len());
            Ok(self.records.get(start..end).unwrap_or(&[]).to_vec())
        }
    }

    #[tokio::test]
    async fn test_short_final_page_ends_pagination() -> Result<()> {
        let source = PagedSource::with_count(650);
        let records = fetch_all_records(&source, 300).await?;

        assert_eq!(records.len(), 650);
        assert_eq!(source.request_count(), 3);
        assert_eq!(*source.requests.lock().unwrap(), vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn test_exact_multiple_costs_one_extra_empty_page() -> Result<()> {
        let source = PagedSource::with_count(600);
        let records = fetch_all_records(&source, 300).await?;

        assert_eq!(records.len(), 600);
        assert_eq!(source.request_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_source_issues_single_request() -> Result<()> {
        let source = PagedSource::with_count(0);
        let records = fetch_all_records(&source, 300).await?;

        assert!(records.is_empty());
        assert_eq!(source.request_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_order_is_preserved_across_pages() -> Result<()> {
        let source = PagedSource::with_count(7);
        let records = fetch_all_records(&source, 3).await?;

        let ids: Vec<u64> = records
            .iter()
            .map(|r| r.get("id").and_then(|v| v.as_u64()).unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_page_propagates_with_page_context() {
        let mut source = PagedSource::with_count(650);
        source.fail_on_page = Some(2);

        let err = fetch_all_records(&source, 300).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Failed to fetch page 2"), "{message}");
        assert!(message.contains("401"), "{message}");
    }
}
