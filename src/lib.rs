//! One-way synchronization of a paginated Smartsheet collection into a sheet.
//!
//! The pipeline is strictly sequential: fetch every page of the source
//! collection, map each record to a sheet row, delete the destination sheet's
//! existing rows in batches, then insert the mapped rows in batches. The
//! first error at any stage aborts the run.

pub mod api;
pub mod config;
pub mod sync;
