use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn not_found(what: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("{} not found", what))
}

/// JSON schema of a resource, served next to the resource itself.
pub async fn schema<T: JsonSchema>() -> Json<RootSchema> {
    Json(schema_for!(T))
}

/// Protected routes require a bearer token. The mock accepts any non-empty
/// token; only its presence is checked.
pub async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("Bearer ") && value.len() > "Bearer ".len())
        .unwrap_or(false);

    if !authorized {
        return error_response(StatusCode::UNAUTHORIZED, "missing bearer token");
    }
    next.run(request).await
}
