use std::env;

use model::{
    broadcast::{BroadcastInfo, GroupInfo, LiveSnapshot},
    course::Course,
    home::HomeData,
    race::{BibRegistration, RaceDetail, RaceSummary},
    route::MapData,
    runner::{RaceMember, RunnerSearchResult, SearchKind},
};
use serde::{de::DeserializeOwned, Serialize};
use utility::id::Id;

use crate::{
    auth::{LoginResponse, ProviderLogin, TokenStore},
    ApiError,
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Clone, Debug)]
pub struct RaceApiConfig {
    pub base_url: String,
}

impl RaceApiConfig {
    pub fn env() -> Self {
        let base_url =
            env::var("RACECAST_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        Self { base_url }
    }

    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

pub struct RaceApiClient<S>
where
    S: TokenStore,
{
    config: RaceApiConfig,
    http: reqwest::Client,
    tokens: S,
}

impl<S> RaceApiClient<S>
where
    S: TokenStore,
{
    pub fn new(config: RaceApiConfig, tokens: S) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    /// Resolve an endpoint path against the configured base. Absolute URLs
    /// (e.g. the `mapUrl` of a broadcast) pass through unchanged.
    pub fn absolute_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_owned()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                path_or_url.trim_start_matches('/')
            )
        }
    }

    async fn bearer_header(&self) -> Result<Option<String>, ApiError> {
        Ok(self
            .tokens
            .access_token()
            .await?
            .map(|token| format!("Bearer {}", token)))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: String,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        match response.status() {
            reqwest::StatusCode::OK | reqwest::StatusCode::CREATED => {
                Ok(response.json().await?)
            }
            reqwest::StatusCode::UNAUTHORIZED => {
                // expired or invalid token: drop it, the caller re-logins
                self.tokens.clear_tokens().await?;
                Err(ApiError::Unauthorized)
            }
            other => match response.text().await {
                Ok(text) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(text),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }

    /// Fetch data from an endpoint using this client, attaching the bearer
    /// token when one is stored.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path_or_url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.absolute_url(path_or_url);
        log::debug!("GET {}", url);

        let mut request = self.http.get(&url).query(query);
        if let Some(bearer) = self.bearer_header().await? {
            request = request.header("Authorization", bearer);
        }
        let response = request.send().await?;
        self.handle_response(url, response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.absolute_url(path);
        log::debug!("POST {}", url);

        let mut request = self.http.post(&url).json(body);
        if let Some(bearer) = self.bearer_header().await? {
            request = request.header("Authorization", bearer);
        }
        let response = request.send().await?;
        self.handle_response(url, response).await
    }

    /// Exchange a provider access token for this service's tokens and store
    /// them.
    pub async fn login_with_provider(
        &self,
        provider_access_token: String,
    ) -> Result<LoginResponse, ApiError> {
        let login: LoginResponse = self
            .post(
                "/api/auth/provider/mobile",
                &ProviderLogin {
                    provider_access_token,
                },
            )
            .await?;
        self.tokens
            .store_tokens(login.access_token.clone(), login.refresh_token.clone())
            .await?;
        Ok(login)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.tokens.clear_tokens().await
    }

    pub async fn home(&self) -> Result<HomeData, ApiError> {
        self.get("/api/v1/home", &[]).await
    }

    pub async fn races(&self) -> Result<Vec<RaceSummary>, ApiError> {
        self.get("/api/v1/races", &[]).await
    }

    pub async fn race_detail(
        &self,
        race_id: &Id<RaceSummary>,
    ) -> Result<RaceDetail, ApiError> {
        self.get(&format!("/api/v1/races/{}", race_id), &[]).await
    }

    pub async fn register_bib(
        &self,
        race_id: &Id<RaceSummary>,
        registration: &BibRegistration,
    ) -> Result<RaceMember, ApiError> {
        self.post(&format!("/api/v1/races/{}/members", race_id), registration)
            .await
    }

    pub async fn search_runners(
        &self,
        race_id: &Id<RaceSummary>,
        kind: SearchKind,
        query: &str,
    ) -> Result<Vec<RunnerSearchResult>, ApiError> {
        let param = match kind {
            SearchKind::Name => "name",
            SearchKind::Bib => "bib",
            SearchKind::Code => "code",
        };
        self.get(
            &format!("/api/v1/races/{}/members", race_id),
            &[(param, query.to_owned())],
        )
        .await
    }

    pub async fn broadcast_info(
        &self,
        key: &Id<GroupInfo>,
    ) -> Result<BroadcastInfo, ApiError> {
        self.get(&format!("/api/v1/broadcasts/{}", key), &[]).await
    }

    /// Fetch the route payload from the URL the broadcast info points at.
    pub async fn map_data(&self, map_url: &str) -> Result<MapData, ApiError> {
        self.get(map_url, &[]).await
    }

    pub async fn live_snapshot(
        &self,
        key: &Id<GroupInfo>,
        course: Option<Course>,
    ) -> Result<LiveSnapshot, ApiError> {
        let mut query = Vec::new();
        if let Some(course) = course {
            query.push(("course", course.label().to_owned()));
        }
        self.get(&format!("/api/v1/broadcasts/{}/live", key), &query)
            .await
    }
}
