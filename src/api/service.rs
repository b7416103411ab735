//! Service traits the pipeline is written against, so tests can drive it
//! with in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{NewRow, Record, Sheet};

/// Source of the paginated record collection.
#[async_trait]
pub trait RecordSource {
    /// Fetch one page (1-indexed) of at most `page_size` records.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<Record>>;
}

/// Destination sheet operations consumed by the sync pipeline.
#[async_trait]
pub trait SheetService {
    /// Read the sheet's current columns and row identifiers.
    async fn get_sheet(&self, sheet_id: u64) -> Result<Sheet>;

    /// Delete the given rows in one call.
    async fn delete_rows(&self, sheet_id: u64, row_ids: &[u64]) -> Result<()>;

    /// Insert the given rows in one call, at the placement each row carries.
    async fn add_rows(&self, sheet_id: u64, rows: Vec<NewRow>) -> Result<()>;
}
