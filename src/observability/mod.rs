//! Observability for timberdb
//!
//! Structured one-line JSON logs with typed lifecycle events, deterministic
//! key ordering, and synchronous writes. Logging is read-only with no side
//! effects on request handling; a logging failure never fails a query.

mod log;

pub use log::{log_event, log_event_with_fields, Event, Logger, Severity};
