//! HTTP surface of the dashboard.
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET  | `/` | Collect Feeds tab |
//! | GET  | `/articles` | Search & Filter tab |
//! | GET  | `/instructions` | Instructions tab |
//! | POST | `/keywords` | add a keyword (form) |
//! | POST | `/keywords/delete` | remove a keyword (form) |
//! | POST | `/keywords/reset` | restore the default keywords |
//! | POST | `/collect` | fetch every keyword |
//! | GET  | `/export/csv`, `/export/json` | downloads; `scope=filtered` applies the filter query |
//! | GET/POST | `/api/keywords` | keyword list as JSON / add a keyword |
//! | GET  | `/api/articles` | filtered articles as JSON |
//! | GET  | `/healthz` | liveness |

pub mod error;
pub mod handlers;
pub mod params;

use axum::{
    Router,
    routing::{get, post},
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::feeds::FeedSource;
use crate::session::Session;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub source: Arc<dyn FeedSource>,
    /// Pause between keyword requests during a collection.
    pub request_delay: Duration,
}

impl AppState {
    pub fn new(session: Session, source: Arc<dyn FeedSource>, request_delay: Duration) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            source,
            request_delay,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/articles", get(handlers::articles_page))
        .route("/instructions", get(handlers::instructions))
        // Keyword management
        .route("/keywords", post(handlers::add_keyword))
        .route("/keywords/delete", post(handlers::delete_keyword))
        .route("/keywords/reset", post(handlers::reset_keywords))
        .route("/collect", post(handlers::collect_articles))
        // Downloads
        .route("/export/csv", get(handlers::export_csv))
        .route("/export/json", get(handlers::export_json))
        // JSON API
        .route(
            "/api/keywords",
            get(handlers::api_keywords).post(handlers::api_add_keyword),
        )
        .route("/api/articles", get(handlers::api_articles))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, router: Router) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Dashboard listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
