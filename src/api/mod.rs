//! Smartsheet REST API client, wire models, and the service traits the sync
//! pipeline is written against.

pub mod client;
pub mod constants;
pub mod models;
pub mod service;

pub use client::SmartsheetClient;
pub use models::{Cell, Column, NewRow, Record, RecordPage, Sheet, SheetRow};
pub use service::{RecordSource, SheetService};
