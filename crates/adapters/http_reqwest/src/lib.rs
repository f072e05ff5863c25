//! # roomcfg-adapter-http
//!
//! HTTP adapter using reqwest — implements the [`RoomStore`] port against
//! the persistence service.
//!
//! ## Endpoints
//! - `GET  {base_url}/rooms/{id}` → `{"_id": "...", "config": {...}}` (`id` or `_id`, both optional)
//! - `PUT  {base_url}/rooms/{id}` with body `{"config": {...}}`
//!
//! Every request carries `Authorization: Bearer <token>` from the
//! [`CredentialProvider`]. Without a token no request is sent.
//!
//! ## Dependency rule
//! Depends on `roomcfg-app` (for port traits) and `roomcfg-domain` (for types).

pub mod config;
pub mod credentials;
pub mod error;

use std::future::Future;
use std::time::Duration;

use reqwest::{StatusCode, Url};

use roomcfg_app::ports::{CredentialProvider, RoomStore};
use roomcfg_domain::error::RoomCfgError;
use roomcfg_domain::id::RoomId;
use roomcfg_domain::wire::{RoomDocument, SaveRequest};

pub use config::HttpConfig;
pub use credentials::StaticToken;
pub use error::HttpError;

/// Room store backed by the persistence service's REST API.
pub struct HttpRoomStore<C> {
    client: reqwest::Client,
    base_url: Url,
    credentials: C,
}

impl<C: CredentialProvider> HttpRoomStore<C> {
    /// Build a store for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidBaseUrl`] when the base URL does not parse
    /// or cannot carry a path, and [`HttpError::Request`] when the client
    /// cannot be built.
    pub fn new(config: &HttpConfig, credentials: C) -> Result<Self, HttpError> {
        let invalid = |reason: String| HttpError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        };
        let base_url = Url::parse(&config.base_url).map_err(|err| invalid(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("cannot be a base".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn room_url(&self, room_id: &RoomId) -> Result<Url, HttpError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push("rooms")
            .push(room_id.as_str());
        Ok(url)
    }

    fn token(&self) -> Result<String, HttpError> {
        self.credentials.bearer_token().ok_or_else(|| {
            tracing::warn!("no bearer token, refusing to contact the room service");
            HttpError::MissingCredentials
        })
    }

    async fn check(room_id: &RoomId, response: reqwest::Response) -> Result<Vec<u8>, HttpError> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(%status, bytes = body.len(), "room service replied");
        if status == StatusCode::NOT_FOUND {
            return Err(HttpError::NotFound(room_id.to_string()));
        }
        if !status.is_success() {
            let err = HttpError::from_reply(status.as_u16(), &body);
            tracing::warn!(%status, error = %err, "room service rejected request");
            return Err(err);
        }
        Ok(body)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, room_id: &RoomId) -> Result<RoomDocument, HttpError> {
        let token = self.token()?;
        let url = self.room_url(room_id)?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let body = Self::check(room_id, response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    #[tracing::instrument(skip(self, config))]
    async fn put(&self, room_id: &RoomId, config: serde_json::Value) -> Result<(), HttpError> {
        let token = self.token()?;
        let url = self.room_url(room_id)?;
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&SaveRequest { config })
            .send()
            .await?;
        Self::check(room_id, response).await?;
        Ok(())
    }
}

impl<C: CredentialProvider> RoomStore for HttpRoomStore<C> {
    fn fetch(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<RoomDocument, RoomCfgError>> + Send {
        async move { self.get(room_id).await.map_err(RoomCfgError::from) }
    }

    fn save(
        &self,
        room_id: &RoomId,
        config: serde_json::Value,
    ) -> impl Future<Output = Result<(), RoomCfgError>> + Send {
        async move { self.put(room_id, config).await.map_err(RoomCfgError::from) }
    }
}
