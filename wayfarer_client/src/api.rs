//! Transport seam between the session core and the game server.
//!
//! The controllers never talk HTTP themselves. Everything they need from the server
//! goes through [`GameApi`], implemented for real by [`HttpGameApi`] and by scripted
//! fakes in tests.

use std::time::Duration;

use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wayfarer_data::{ActionResponse, CollectionEntry, LocationResponse, MoveResponse};

use crate::location::Direction;

pub const BACKSTORY_PATH: &str = "/";
pub const LOCATION_PATH: &str = "/location";
pub const EXITS_PATH: &str = "/location/exits";
pub const MOVE_PATH: &str = "/move";

/// Why a request produced no usable result.
///
/// Every variant is handled the same way by the controllers: the operation is
/// abandoned, prior state is kept, and the error is surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("could not reach the server ({0})")]
    Transport(String),
    #[error("server answered {status} for {path}")]
    HttpStatus { status: u16, path: String },
    #[error("unexpected response from {path}: {message}")]
    Decode { path: String, message: String },
}

/// Operations offered by the game server.
///
/// Implementors are cheap to clone; each in-flight request owns its own handle.
pub trait GameApi: Clone + Send + Sync + 'static {
    /// `GET /`: the world's backstory.
    fn backstory(&self) -> impl Future<Output = Result<String, ApiError>> + Send;
    /// `GET /location`
    fn location(&self) -> impl Future<Output = Result<LocationResponse, ApiError>> + Send;
    /// `GET /location/exits`: a prose summary of neighbouring places.
    fn exits(&self) -> impl Future<Output = Result<String, ApiError>> + Send;
    /// `POST /move` with the raw direction token as body.
    fn move_player(&self, direction: Direction) -> impl Future<Output = Result<MoveResponse, ApiError>> + Send;
    /// `GET` one of the collection endpoints.
    fn list(&self, endpoint: &'static str) -> impl Future<Output = Result<Vec<CollectionEntry>, ApiError>> + Send;
    /// `POST` an entry name to one of the action endpoints.
    fn act(
        &self,
        endpoint: &'static str,
        entry_name: String,
    ) -> impl Future<Output = Result<ActionResponse, ApiError>> + Send;
}

/// [`GameApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGameApi {
    /// Build a client rooted at `base_url` (for example `http://localhost/api`).
    ///
    /// # Errors
    /// - if the underlying HTTP client cannot be constructed (TLS backend failure).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;
        info!("game server base url: {base_url} (timeout: {timeout:?})");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {path}");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(path, response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: String) -> Result<T, ApiError> {
        debug!("POST {path} <- {body:?}");
        let response = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(path, response).await
    }

    /// Text endpoints answer with a JSON string, but a bare body is accepted too.
    async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        debug!("GET {path}");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = checked_body(path, response).await?;
        Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
    }
}

impl GameApi for HttpGameApi {
    async fn backstory(&self) -> Result<String, ApiError> {
        self.get_text(BACKSTORY_PATH).await
    }

    async fn location(&self) -> Result<LocationResponse, ApiError> {
        self.get(LOCATION_PATH).await
    }

    async fn exits(&self) -> Result<String, ApiError> {
        self.get_text(EXITS_PATH).await
    }

    async fn move_player(&self, direction: Direction) -> Result<MoveResponse, ApiError> {
        self.post(MOVE_PATH, direction.token().to_string()).await
    }

    async fn list(&self, endpoint: &'static str) -> Result<Vec<CollectionEntry>, ApiError> {
        self.get(endpoint).await
    }

    async fn act(&self, endpoint: &'static str, entry_name: String) -> Result<ActionResponse, ApiError> {
        self.post(endpoint, entry_name).await
    }
}

/// Join a server base url and an endpoint path without doubling or dropping the slash.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{path}")
    }
}

async fn checked_body(path: &str, response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::HttpStatus {
            status: status.as_u16(),
            path: path.to_string(),
        });
    }
    response.text().await.map_err(|e| ApiError::Transport(e.to_string()))
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, ApiError> {
    let body = checked_body(path, response).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
