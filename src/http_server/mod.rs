//! # HTTP Server Module
//!
//! The query boundary of timberdb: a small axum server exposing the query
//! endpoint and dataset listing over the in-memory record store.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /datasets` - Loaded dataset summaries
//! - `POST /query` - Run a query document

pub mod config;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use routes::{api_routes, AppState};
pub use server::HttpServer;
