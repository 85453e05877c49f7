//! HTTP surface.
//!
//! `GET /`, `GET /restaurants`, `GET /restaurants/:restaurant_id` and
//! `GET /categories`, behind a single-origin CORS layer and access logging.

mod access;
mod error;
mod handlers;
mod state;

use axum::Router;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use axum::middleware;
use axum::routing::get;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::errors::DirectoryError;
use crate::store::RestaurantStore;

pub use access::{REQUEST_ID_HEADER, access_log};
pub use error::ApiError;
pub use handlers::LIVENESS_MESSAGE;
pub use state::{AppState, SharedState};

/// CORS policy allowing read-only requests from `origin`.
///
/// # Errors
/// Returns `Config` if `origin` is not a valid header value.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, DirectoryError> {
    let origin: HeaderValue = origin
        .parse()
        .map_err(|_| DirectoryError::Config(format!("invalid CORS origin `{origin}`")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60)))
}

pub fn router<S: RestaurantStore>(state: SharedState<S>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/restaurants", get(handlers::list_restaurants::<S>))
        .route("/restaurants/:restaurant_id", get(handlers::get_restaurant::<S>))
        .route("/categories", get(handlers::list_categories::<S>))
        .layer(cors)
        .layer(middleware::from_fn(access_log))
        .with_state(state)
}

/// Loads state from `config`, binds, and serves until Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if startup data cannot be loaded or the address cannot be bound.
pub async fn start_server(config: &AppConfig) -> Result<(), DirectoryError> {
    log::info!("Initializing state...");
    let state = AppState::from_config(config)?.shared();
    let app = router(state, cors_layer(&config.cors_origin)?);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    log::info!("Server running on {address}");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                log::error!("failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
