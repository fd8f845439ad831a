use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use model::race::{BibRegistration, RaceDetail, RaceSummary};
use serde::Deserialize;

use crate::{
    common::{error_response, not_found, schema},
    AppState,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_races))
        .route("/schema", get(schema::<RaceSummary>))
        .route("/:id", get(get_race))
        .route("/:id/members", get(search_members).post(register_member))
        .with_state(state)
}

async fn get_races(State(state): State<AppState>) -> Json<Vec<RaceSummary>> {
    Json(state.dataset.races.clone())
}

async fn get_race(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.dataset.race_detail(id) {
        Some(detail) => Json::<RaceDetail>(detail.clone()).into_response(),
        None => not_found("race"),
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    name: Option<String>,
    bib: Option<String>,
    code: Option<String>,
}

async fn search_members(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<SearchParams>,
) -> Response {
    if state.dataset.race_detail(id).is_none() {
        return not_found("race");
    }

    let results = match (&params.name, &params.bib, &params.code) {
        (Some(name), _, _) => {
            let name = name.clone();
            state
                .dataset
                .search_runners(id, move |member| member.member_name.contains(&name))
        }
        (_, Some(bib), _) => {
            let bib = bib.clone();
            state.dataset.search_runners(id, move |member| member.bib == *bib)
        }
        (_, _, Some(code)) => {
            // codes are derived from ids, so match against the derived value
            let code = code.to_uppercase();
            let matches = state.dataset.search_runners(id, |_| true);
            return Json(
                matches
                    .into_iter()
                    .filter(|result| result.unique_code.as_deref() == Some(code.as_str()))
                    .collect::<Vec<_>>(),
            )
            .into_response();
        }
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "one of name, bib or code is required",
            )
        }
    };
    Json(results).into_response()
}

async fn register_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(registration): Json<BibRegistration>,
) -> Response {
    if registration.bib.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "bib must not be empty");
    }
    match state.dataset.registered_member(id, &registration) {
        Some(member) => (StatusCode::CREATED, Json(member)).into_response(),
        None => not_found("race"),
    }
}
