//! # HTTP Server
//!
//! Binds the query API router to a socket. The record store is fully loaded
//! before the server is constructed; handlers share it read-only.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{log_event_with_fields, Event};

use super::config::HttpServerConfig;
use super::routes::{api_routes, AppState};

/// HTTP server for the contractor directory API.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Creates a server from configuration and loaded application state.
    pub fn new(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = api_routes(state).layer(build_cors(&config));
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until the process is stopped.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::ServerStart, &[("addr", &addr.to_string())]);
        axum::serve(listener, self.router).await?;
        log_event_with_fields(Event::ServerStop, &[]);
        Ok(())
    }
}

/// Permissive CORS when no origins are configured (development); otherwise
/// only the configured origins.
fn build_cors(config: &HttpServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RecordStore, Schema};
    use crate::query::QueryEngine;

    fn test_state() -> Arc<AppState> {
        let mut store = RecordStore::new();
        store.add("contractors", Schema::contractors(), vec![]);
        Arc::new(AppState::new(QueryEngine::new(Arc::new(store))))
    }

    #[test]
    fn test_server_socket_addr() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), test_state());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_cors() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let server = HttpServer::new(config, test_state());
        let _router = server.router();
    }
}
