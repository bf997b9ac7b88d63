//! Authenticated request pipeline for the RedisGreen API.
//!
//! # Design
//! `RedisGreenClient` holds a token, a `ClientConfig` and a transport, and
//! never mutates any of them after construction. Every resource operation
//! funnels through `execute`, which builds the request with the four fixed
//! headers, sends it, and maps the response status:
//!
//! - 2xx: the raw body is returned, whatever it contains.
//! - anything else: the body is parsed as `{"errors": [..]}`. If that
//!   works the call fails with `ApiError::Service`; if it does not, the
//!   parse failure is returned as `ApiError::Deserialization` and the
//!   status is lost.
//!
//! `get`, `post` and `delete` layer JSON encoding and decoding on top.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{ClientConfig, MEDIA_TYPE, TOKEN_ENV, TOKEN_HEADER};
use crate::error::{ApiError, Result, ServiceError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

/// Synchronous client acting as a single RedisGreen account.
///
/// Cheap to clone and safe to share between threads; concurrent calls do
/// not interact beyond the transport's connection pool.
#[derive(Clone)]
pub struct RedisGreenClient<T = UreqTransport> {
    token: String,
    config: ClientConfig,
    transport: T,
}

impl RedisGreenClient<UreqTransport> {
    /// Client for the hosted service with default settings.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_config(token, ClientConfig::default())
    }

    pub fn with_config(token: impl Into<String>, config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(token, config, transport)
    }

    /// Client configured from `REDISGREEN_TOKEN`, `REDISGREEN_API_URL` and
    /// `REDISGREEN_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Config(format!("{TOKEN_ENV} is not set")))?;
        Ok(Self::with_config(token, ClientConfig::from_env()?))
    }
}

impl<T: Transport> RedisGreenClient<T> {
    pub fn with_transport(token: impl Into<String>, config: ClientConfig, transport: T) -> Self {
        Self {
            token: token.into(),
            config,
            transport,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request for `path` (which must start with `/`) without
    /// sending it.
    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url),
            headers: vec![
                ("Accept".to_string(), MEDIA_TYPE.to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), self.config.user_agent.clone()),
                (TOKEN_HEADER.to_string(), self.token.clone()),
            ],
            body,
        }
    }

    /// Send one request and return the raw body of a 2xx response.
    pub fn execute(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<Vec<u8>> {
        let request = self.build_request(method, path, body);
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(&request)?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            bytes = response.body.len(),
            "received response"
        );

        check_response(response)
    }

    pub(crate) fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let body = self.execute(HttpMethod::Get, path, None)?;
        decode(&body)
    }

    pub(crate) fn post<P: Serialize, R: DeserializeOwned>(&self, path: &str, payload: &P) -> Result<R> {
        let payload =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let body = self.execute(HttpMethod::Post, path, Some(payload))?;
        decode(&body)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<()> {
        self.execute(HttpMethod::Delete, path, None).map(|_| ())
    }
}

impl<T> fmt::Debug for RedisGreenClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisGreenClient")
            .field("token", &"<redacted>")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map a response to its body (2xx) or to the error it carries.
pub fn check_response(response: HttpResponse) -> Result<Vec<u8>> {
    if response.is_success() {
        return Ok(response.body);
    }
    let error = ServiceError::from_slice(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    debug!(status = response.status, error = %error, "service reported an error");
    Err(ApiError::Service {
        status: response.status,
        error,
    })
}

fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    serde_json::from_slice(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// `/{collection}/{id}` with `id` percent-encoded.
///
/// An empty id would address the collection route instead of a member, so
/// it fails up front with the not-found error the service uses for unknown ids.
pub(crate) fn member_path(collection: &str, id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(ApiError::Service {
            status: 404,
            error: ServiceError {
                errors: vec![format!("/{collection}/ couldn't be found.")],
            },
        });
    }
    Ok(format!("/{collection}/{}", urlencoding::encode(id)))
}
