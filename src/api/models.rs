//! Wire models for the collection endpoint and the sheet API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RowPlacement;

/// One source entity, dynamically shaped.
pub type Record = Value;

/// A single page of the paginated collection response.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub data: Vec<Record>,
}

impl RecordPage {
    /// Parse a collection response; a missing or non-array `data` key is a
    /// malformed response and fails the run.
    pub fn from_json(json: Value) -> anyhow::Result<Self> {
        let data = json
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| anyhow::anyhow!("Missing or invalid 'data' array in collection response"))?
            .clone();

        Ok(Self { data })
    }
}

/// Sheet metadata read: columns for the column map, rows for deletion.
#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    pub id: u64,
    pub title: String,
}

/// An existing row; only its identifier matters to this tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetRow {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub column_id: u64,
    pub value: Value,
}

/// A row to insert, carrying its placement on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_bottom: Option<bool>,
    pub cells: Vec<Cell>,
}

impl NewRow {
    pub fn at(placement: RowPlacement, cells: Vec<Cell>) -> Self {
        match placement {
            RowPlacement::Top => Self {
                to_top: Some(true),
                to_bottom: None,
                cells,
            },
            RowPlacement::Bottom => Self {
                to_top: None,
                to_bottom: Some(true),
                cells,
            },
        }
    }
}
