//! Pure record-to-row mapping against the destination sheet schema.
//!
//! No I/O happens here: given a record and the sheet's current columns, the
//! mapping is deterministic and total.

use anyhow::{Result, bail};
use serde_json::Value;

use crate::api::models::{Cell, Column, NewRow, Record};
use crate::config::RowPlacement;

/// The fixed set of columns this sync writes. Each variant names its sheet
/// column title, which doubles as the source record field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedColumn {
    Id,
    Name,
    AccessLevel,
    Permalink,
    CreatedAt,
    ModifiedAt,
}

impl FixedColumn {
    pub const ALL: [FixedColumn; 6] = [
        FixedColumn::Id,
        FixedColumn::Name,
        FixedColumn::AccessLevel,
        FixedColumn::Permalink,
        FixedColumn::CreatedAt,
        FixedColumn::ModifiedAt,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FixedColumn::Id => "id",
            FixedColumn::Name => "name",
            FixedColumn::AccessLevel => "accessLevel",
            FixedColumn::Permalink => "permalink",
            FixedColumn::CreatedAt => "createdAt",
            FixedColumn::ModifiedAt => "modifiedAt",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.title() == title)
    }

    /// Extract this column's value from a record; missing and null fields
    /// become the empty string.
    pub fn extract(self, record: &Record) -> Value {
        match record.get(self.title()) {
            Some(Value::Null) | None => Value::String(String::new()),
            Some(value) => value.clone(),
        }
    }
}

/// The destination sheet's columns in sheet order, with title -> column id
/// lookup. Fetched fresh from the sheet on every run.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    columns: Vec<Column>,
}

impl ColumnMap {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_id(&self, title: &str) -> Option<u64> {
        self.columns
            .iter()
            .find(|column| column.title == title)
            .map(|column| column.id)
    }

    /// Every fixed column must exist in the sheet before any write happens.
    pub fn ensure_fixed_columns(&self) -> Result<()> {
        for column in FixedColumn::ALL {
            if self.column_id(column.title()).is_none() {
                bail!(
                    "Destination sheet is missing required column '{}'",
                    column.title()
                );
            }
        }
        Ok(())
    }
}

/// Record field name a checkbox column title resolves to: lower-cased, with
/// spaces stripped.
fn checkbox_field(title: &str) -> String {
    title.replace(' ', "").to_lowercase()
}

/// Loose truthiness for checkbox cells: absent and null are false, strings
/// count by non-emptiness, numbers by being non-zero.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Map one record to a row covering every column in the destination sheet.
///
/// Fixed columns take the record field of the same name; every other column
/// in the schema becomes a checkbox driven by a best-effort field lookup.
pub fn build_row(record: &Record, column_map: &ColumnMap, placement: RowPlacement) -> NewRow {
    let cells = column_map
        .columns()
        .iter()
        .map(|column| {
            let value = match FixedColumn::from_title(&column.title) {
                Some(fixed) => fixed.extract(record),
                None => Value::Bool(truthy(record.get(&checkbox_field(&column.title)))),
            };
            Cell {
                column_id: column.id,
                value,
            }
        })
        .collect();

    NewRow::at(placement, cells)
}
