//! Thin token storage behind the API client.
//!
//! The OAuth dance itself is the provider's concern; this module only keeps
//! the exchanged tokens. The store is a seam so platforms can plug in their
//! secure key-value storage; the in-memory implementation backs tests and the
//! terminal client.

use std::collections::HashMap;

use async_trait::async_trait;
use model::home::Member;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::ApiError;

pub const TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    async fn set(&self, key: &str, value: String) -> Result<(), ApiError>;
    async fn delete(&self, key: &str) -> Result<(), ApiError>;

    async fn access_token(&self) -> Result<Option<String>, ApiError> {
        self.get(TOKEN_KEY).await
    }

    async fn store_tokens(
        &self,
        access_token: String,
        refresh_token: Option<String>,
    ) -> Result<(), ApiError> {
        self.set(TOKEN_KEY, access_token).await?;
        if let Some(refresh_token) = refresh_token {
            self.set(REFRESH_TOKEN_KEY, refresh_token).await?;
        }
        Ok(())
    }

    async fn clear_tokens(&self) -> Result<(), ApiError> {
        self.delete(TOKEN_KEY).await?;
        self.delete(REFRESH_TOKEN_KEY).await?;
        Ok(())
    }

    async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.access_token().await?.is_some())
    }
}

/// In-memory token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ApiError> {
        self.values.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ApiError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Request body of the provider token exchange.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLogin {
    pub provider_access_token: String,
}

/// Response of the provider token exchange.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Member,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_clears_tokens() {
        let store = MemoryTokenStore::new();
        assert!(!store.is_authenticated().await.unwrap());

        store
            .store_tokens("access-1".to_owned(), Some("refresh-1".to_owned()))
            .await
            .unwrap();
        assert_eq!(
            store.access_token().await.unwrap(),
            Some("access-1".to_owned())
        );
        assert!(store.is_authenticated().await.unwrap());

        store.clear_tokens().await.unwrap();
        assert_eq!(store.access_token().await.unwrap(), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn storing_without_refresh_keeps_the_old_one_absent() {
        let store = MemoryTokenStore::new();
        store
            .store_tokens("access-1".to_owned(), None)
            .await
            .unwrap();
        assert_eq!(store.get(REFRESH_TOKEN_KEY).await.unwrap(), None);
    }

    #[test]
    fn login_response_parses_without_refresh_token() {
        let json = r#"{"accessToken":"a1","user":{"memberId":1,"memberName":"테스트 유저"}}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "a1");
        assert!(response.refresh_token.is_none());
        assert_eq!(response.user.member_id.raw(), 1);
    }
}
