use axum::{extract::State, routing::get, Json, Router};
use model::home::HomeData;

use crate::{common::schema, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_home))
        .route("/schema", get(schema::<HomeData>))
        .with_state(state)
}

async fn get_home(State(state): State<AppState>) -> Json<HomeData> {
    Json(state.dataset.home.clone())
}
