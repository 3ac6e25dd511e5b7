//! Thin reqwest wrapper around the ticketing API.
//!
//! Every request targeting the API origin carries the bearer token when a
//! live session exists, except the `/api/auth/*` endpoints which always go
//! out unauthenticated.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use transita_core::SessionStore;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Client against an explicit base URL with default settings.
    pub fn from_base_url(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn attach_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) if self.session.is_logged_in() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.attach_auth(self.http.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.attach_auth(self.http.post(self.url(path)))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.attach_auth(self.http.put(self.url(path)))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.attach_auth(self.http.delete(self.url(path)))
    }

    /// For the `/api/auth/*` endpoints, which must never carry a token.
    pub(crate) fn post_unauthenticated(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Sends a request and returns the raw JSON payload, mapping transport
    /// and status failures into [`ApiError`].
    pub(crate) async fn send_json(&self, builder: RequestBuilder) -> ApiResult<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<Value>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Sends a request where only success matters, discarding any body.
    pub(crate) async fn send_unit(&self, builder: RequestBuilder) -> ApiResult<()> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
