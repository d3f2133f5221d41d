//! The shared HTTP gateway every backend call goes through.
//!
//! Each call runs `before_request` (attach the stored bearer token) and
//! `after_response` (classify failures; a 401 drops the stored token before
//! the error reaches the caller). Nothing is retried.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::ApiError;
use crate::session::{SessionEvent, SessionEvents, SessionStore};

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Gateway to the catalog backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    store: SessionStore,
    events: SessionEvents,
}

impl Gateway {
    /// Create a gateway with the default timeout
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS), store)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        store: SessionStore,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestConfig {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            store,
            events: SessionEvents::new(),
        })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Pre-request hook: attach the stored token, if any.
    pub async fn before_request(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.store.get_token().await? {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Ok(request),
        }
    }

    /// Post-response hook: pass successes through, normalize failures.
    ///
    /// A 401 clears the stored token before the error is returned, and
    /// publishes `SessionEvent::Expired` if a token was actually stored.
    /// The cached user is left in place.
    pub async fn after_response(
        &self,
        path: &str,
        result: Result<Response, reqwest::Error>,
    ) -> Result<Response, ApiError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, "Request failed without a response");
                return Err(ApiError::from_transport(&e));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(path, status = status.as_u16(), error = %e, "Failed to read error body");
                String::new()
            }
        };
        debug!(
            path,
            status = status.as_u16(),
            body = %ApiError::truncate_body(&body),
            "Error response"
        );

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session(path).await;
        }

        Err(ApiError::from_status(status, &body))
    }

    /// Always clears the token; only announces expiry if there was one.
    async fn expire_session(&self, path: &str) {
        let had_token = match self.store.get_token().await {
            Ok(token) => token.is_some(),
            Err(e) => {
                debug!(path, error = %e, "Could not read token before clearing");
                false
            }
        };

        if let Err(e) = self.store.clear_token().await {
            warn!(path, error = %e, "Failed to clear token after 401");
        }

        if had_token {
            info!(path, "Server rejected token, session expired");
            self.events.publish(SessionEvent::Expired);
        } else {
            debug!(path, "401 without a stored token");
        }
    }

    /// Send one request through both hooks and decode the JSON body.
    pub async fn request<T, F>(&self, method: Method, path: &str, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request = build(self.client.request(method.clone(), self.url(path)));
        let request = self.before_request(request).await?;

        debug!(%method, path, "Sending request");
        let result = request.send().await;
        let response = self.after_response(path, result).await?;

        Self::decode(response).await
    }

    /// Empty bodies decode as JSON `null`, so `()` accepts a bare 204.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };

        serde_json::from_str(body).map_err(|e| ApiError::Server {
            status,
            message: format!("Invalid response body: {}", e),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, |r| r).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(Method::GET, path, |r| r.query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, |r| r.json(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, |r| r.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, |r| r).await
    }
}
