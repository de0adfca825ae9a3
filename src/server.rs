use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::{self, AppState, Envelope};
use crate::database::Database;
use crate::error::CatalogError;
use crate::service::ProductService;

pub struct WebServer {
    host: String,
    port: u16,
    client_origin: Option<String>,
}

impl WebServer {
    pub fn new(host: String, port: u16, client_origin: Option<String>) -> Self {
        Self {
            host,
            port,
            client_origin,
        }
    }

    /// Serves until SIGINT/SIGTERM, then closes the database.
    pub async fn start(&self, db: Database) -> Result<(), CatalogError> {
        let app = self.create_router(ProductService::new(db.clone()))?;

        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CatalogError::Error(format!("Invalid address: {}", e)))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| CatalogError::Error(format!("Failed to bind to {}: {}", addr, e)))?;

        log::info!("Catalog server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_signal().await;
                log::info!("Shutdown signal received, stopping server gracefully");
            })
            .await
            .map_err(|e| CatalogError::Error(format!("Server error: {}", e)))?;

        db.close();
        log::info!("Server shutdown complete");

        Ok(())
    }

    pub fn create_router(&self, service: ProductService) -> Result<Router, CatalogError> {
        let cors = cors_layer(self.client_origin.as_deref())?;

        let app = Router::new()
            // Health check
            .route("/health", get(health_check))
            .merge(api::routes::router(AppState::new(service)))
            .layer(cors);

        Ok(app)
    }
}

/// Restricts cross-origin access to `client_origin` when one is configured.
fn cors_layer(client_origin: Option<&str>) -> Result<CorsLayer, CatalogError> {
    let allow_origin = match client_origin {
        None => AllowOrigin::from(Any),
        Some(origin) => {
            let value = HeaderValue::from_str(origin).map_err(|_| {
                CatalogError::Error(format!("Invalid client origin '{}'", origin))
            })?;
            AllowOrigin::list([value])
        }
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn health_check() -> Json<Envelope<()>> {
    Json(Envelope::ok())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received SIGINT (Ctrl+C)");
        },
        _ = terminate => {
            log::info!("Received SIGTERM");
        },
    }
}
