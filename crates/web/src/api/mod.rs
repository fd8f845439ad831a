use axum::Router;

use crate::AppState;

pub mod auth;
pub mod v1;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/v1", v1::routes(state))
}
