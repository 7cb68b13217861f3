//! Request dispatch with bounded re-authentication
//!
//! [`RequestDispatcher::send`] attaches the shared credential to one outbound
//! call and classifies the answer. An authorization failure is retried exactly
//! once with a replacement credential; every other failure is returned as
//! is.

use log::{debug, warn};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::auth::{Credential, CredentialManager};
use super::constants::REQUEST_ID_HEADER;
use crate::config::Config;
use crate::error::{HClientError, Result};

/// Description of one outbound call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Position in the retry protocol
///
/// `Fresh` may move to `Retried` once; `Retried` has no successor, so a
/// request is sent at most twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Fresh,
    Retried,
}

impl Attempt {
    fn next(self) -> Option<Attempt> {
        match self {
            Attempt::Fresh => Some(Attempt::Retried),
            Attempt::Retried => None,
        }
    }
}

/// Classified answer to one attempt
enum Outcome {
    Success(Value),
    Unauthorized(String),
}

/// Sends requests with the shared credential attached
pub struct RequestDispatcher {
    http: reqwest::Client,
    config: Arc<Config>,
    credentials: Arc<CredentialManager>,
}

impl RequestDispatcher {
    pub fn new(
        http: reqwest::Client,
        config: Arc<Config>,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        Self {
            http,
            config,
            credentials,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Send a request, returning the JSON body (null for an empty body)
    pub async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let request_id = Uuid::new_v4();
        let mut attempt = Attempt::Fresh;
        let mut credential = self.credentials.acquire(false).await?;

        loop {
            match self.send_once(request, &credential, request_id).await? {
                Outcome::Success(body) => return Ok(body),
                Outcome::Unauthorized(message) => match attempt.next() {
                    Some(next) => {
                        warn!(
                            "[{}] {} {} rejected the credential ({}), refreshing and retrying",
                            request_id, request.method, request.path, message
                        );
                        credential = self.credentials.acquire_replacing(&credential).await?;
                        attempt = next;
                    }
                    None => {
                        warn!(
                            "[{}] {} {} rejected a freshly refreshed credential",
                            request_id, request.method, request.path
                        );
                        return Err(HClientError::Auth(message));
                    }
                },
            }
        }
    }

    /// Send a request and decode the body into `T`
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let body = self.send(request).await?;
        serde_json::from_value(body).map_err(|e| {
            HClientError::Decode(format!("{} {}: {}", request.method, request.path, e))
        })
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        credential: &Credential,
        request_id: Uuid,
    ) -> Result<Outcome> {
        let url = self.config.url(&request.path);
        debug!("[{}] {} {}", request_id, request.method, url);
        let start = Instant::now();

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .bearer_auth(credential.token())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(
            "[{}] {} {} -> {} in {:?}",
            request_id,
            request.method,
            request.path,
            status.as_u16(),
            start.elapsed()
        );

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Outcome::Success(Value::Null));
            }
            let body = serde_json::from_str(&text).map_err(|e| {
                HClientError::Decode(format!("{} {}: {}", request.method, request.path, e))
            })?;
            return Ok(Outcome::Success(body));
        }

        let message = extract_error_message(&text, status);
        match status {
            StatusCode::UNAUTHORIZED => Ok(Outcome::Unauthorized(message)),
            StatusCode::NOT_FOUND => Err(HClientError::NotFound(message)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(HClientError::Validation(message))
            }
            _ => Err(HClientError::Upstream {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

/// Pull a human-readable message out of an error body
pub(crate) fn extract_error_message(body: &str, status: StatusCode) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "msg", "desc", "error_description", "error"] {
            if let Some(message) = json.get(key).and_then(Value::as_str) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
