//! Dataset model for timberdb
//!
//! A dataset is a named, immutable snapshot of JSON-object records together
//! with the field schema (the "kind") queries are validated against. The
//! store is read-only after load; query evaluation never mutates a record.

mod schema;
mod store;

pub use schema::{FieldKind, Schema};
pub use store::{Dataset, DatasetInfo, DatasetRegistry, RecordStore};
