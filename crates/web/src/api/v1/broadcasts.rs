use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use model::{
    broadcast::{BroadcastInfo, LiveSnapshot},
    course::Course,
    route::MapData,
};
use serde::Deserialize;

use crate::{
    common::{not_found, schema},
    AppState,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/schema", get(schema::<BroadcastInfo>))
        .route("/:key", get(get_broadcast))
        .route("/:key/map", get(get_map))
        .route("/:key/live", get(get_live))
        .with_state(state)
}

async fn get_broadcast(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.dataset.broadcast(&key) {
        Some(broadcast) => Json::<BroadcastInfo>(broadcast.info.clone()).into_response(),
        None => not_found("broadcast"),
    }
}

async fn get_map(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.dataset.broadcast(&key) {
        Some(broadcast) => Json::<MapData>(broadcast.map.clone()).into_response(),
        None => not_found("broadcast"),
    }
}

#[derive(Debug, Deserialize)]
struct LiveParams {
    course: Option<Course>,
}

async fn get_live(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<LiveParams>,
) -> Response {
    match state.dataset.broadcast(&key) {
        Some(broadcast) => {
            Json::<LiveSnapshot>(broadcast.live_snapshot(params.course)).into_response()
        }
        None => not_found("broadcast"),
    }
}
