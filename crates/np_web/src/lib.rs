use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod middleware;
pub mod state;
pub mod view;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);

    // Layers run bottom-up: cross-origin posts are turned away before a
    // session is looked up or created for them.
    Router::new()
        .route("/", get(handlers::index))
        .route("/search", post(handlers::search))
        .route("/generate", post(handlers::generate))
        .route("/publish", post(handlers::publish))
        .route("/dismiss", post(handlers::dismiss))
        .layer(from_fn_with_state(state.clone(), middleware::session_middleware))
        .layer(from_fn(middleware::same_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the app on `addr` until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> np_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use np_core::{Article, Error, Result};
    pub use crate::{create_app, serve, AppState};
}
