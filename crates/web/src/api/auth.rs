use axum::{routing::post, Json, Router};
use chrono::Utc;
use model::{home::Member, ExampleData};
use race_api::auth::{LoginResponse, ProviderLogin};

/// Token exchange endpoints. The mock does not talk to any provider: every
/// exchange succeeds and issues a throwaway token for the example member.
pub fn routes() -> Router {
    Router::new().route("/provider/mobile", post(provider_login))
}

async fn provider_login(Json(request): Json<ProviderLogin>) -> Json<LoginResponse> {
    tracing::debug!(
        "issuing mock tokens for provider token of length {}",
        request.provider_access_token.len()
    );
    Json(LoginResponse {
        access_token: format!("mock_access_token_{}", Utc::now().timestamp_millis()),
        refresh_token: None,
        user: Member::example_data(),
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn exchange_issues_tokens() {
        let response = routes()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/provider/mobile")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"providerAccessToken":"kakao-token"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let login: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(login.access_token.starts_with("mock_access_token_"));
        assert_eq!(login.user.member_name, "테스트 유저");
    }
}
