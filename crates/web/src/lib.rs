use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::mock::MockDataset;

pub mod api;
pub mod common;
pub mod mock;

/// Shared state of the mock backend: one fixed dataset for the process
/// lifetime.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<MockDataset>,
}

impl AppState {
    pub fn new(dataset: MockDataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::routes(state))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(state: AppState, bind_addr: &str) -> std::io::Result<()> {
    let routes = router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("mock race api listening on {}", bind_addr);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
