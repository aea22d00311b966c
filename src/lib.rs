//! timberdb - A searchable directory of forestry contractors
//!
//! An in-memory contractor dataset queried through a JSON filter/sort/project
//! mini-language; see QUERY.md for the query document shape.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod geo;
pub mod http_server;
pub mod ingest;
pub mod observability;
pub mod query;
