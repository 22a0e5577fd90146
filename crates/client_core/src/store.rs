//! HTTP access to the remote character collection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Character, CharacterId, NewCharacter},
    protocol::{character_route, collection_route, VotesPatch},
};
use thiserror::Error;
use tracing::{error, info};

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
    },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read/write operations against the character collection.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Character>, StoreError>;
    async fn fetch(&self, id: &CharacterId) -> Result<Character, StoreError>;
    async fn patch_votes(&self, id: &CharacterId, votes: u64) -> Result<(), StoreError>;
    async fn create(&self, character: &NewCharacter) -> Result<Character, StoreError>;
}

pub struct HttpCharacterStore {
    http: Client,
    base_url: String,
}

impl HttpCharacterStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|source| StoreError::Transport {
                url: settings.base_url.clone(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, StoreError> {
        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| StoreError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                method,
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| StoreError::Transport {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpCharacterStore {
    async fn list(&self) -> Result<Vec<Character>, StoreError> {
        let url = collection_route(&self.base_url);
        let result = async {
            let response = self.send::<()>(Method::GET, &url, None).await?;
            Self::decode::<Vec<Character>>(&url, response).await
        }
        .await;

        match &result {
            Ok(characters) => info!(count = characters.len(), "store: listed characters"),
            Err(err) => error!("store: error fetching characters: {err}"),
        }
        result
    }

    async fn fetch(&self, id: &CharacterId) -> Result<Character, StoreError> {
        let url = character_route(&self.base_url, id);
        let result = async {
            let response = self.send::<()>(Method::GET, &url, None).await?;
            Self::decode::<Character>(&url, response).await
        }
        .await;

        if let Err(err) = &result {
            error!(character_id = %id, "store: error fetching character: {err}");
        }
        result
    }

    async fn patch_votes(&self, id: &CharacterId, votes: u64) -> Result<(), StoreError> {
        let url = character_route(&self.base_url, id);
        let body = VotesPatch { votes };
        match self.send(Method::PATCH, &url, Some(&body)).await {
            Ok(_) => {
                info!(character_id = %id, votes, "store: votes updated");
                Ok(())
            }
            Err(err) => {
                error!(character_id = %id, votes, "store: error updating votes: {err}");
                Err(err)
            }
        }
    }

    async fn create(&self, character: &NewCharacter) -> Result<Character, StoreError> {
        let url = collection_route(&self.base_url);
        let result = async {
            let response = self.send(Method::POST, &url, Some(character)).await?;
            Self::decode::<Character>(&url, response).await
        }
        .await;

        match &result {
            Ok(created) => info!(character_id = %created.id, name = %created.name, "store: character created"),
            Err(err) => error!(name = %character.name, "store: error adding character: {err}"),
        }
        result
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
