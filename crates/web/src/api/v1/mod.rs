use axum::{middleware, Router};

use crate::{common::require_bearer, AppState};

pub mod broadcasts;
pub mod home;
pub mod races;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .nest("/home", home::routes(state.clone()))
        .nest("/races", races::routes(state.clone()))
        .nest("/broadcasts", broadcasts::routes(state))
        .layer(middleware::from_fn(require_bearer))
}
