//! Error types for the RedisGreen API client.
//!
//! # Design
//! The service reports failures as `{"errors": [..]}` with human-readable
//! strings and no error codes, so `ServiceError` keeps the strings in order
//! and displays them space-joined. Callers match on substrings of that text;
//! `is_not_found` and `is_unauthorized` wrap the two checks everyone needs.
//!
//! A non-2xx response whose body is not a valid error document surfaces as
//! `Deserialization`, not `Service`. The HTTP status is lost in that case.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors reported by the remote service in a non-2xx response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}", .errors.join(" "))]
pub struct ServiceError {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<String>,
}

impl ServiceError {
    /// Parse an error document. The body must be a JSON object; a missing
    /// or null `errors` member yields no messages.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let document: Map<String, Value> = serde_json::from_slice(body)?;
        serde_json::from_value(Value::Object(document))
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Errors returned by `RedisGreenClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status and a parseable error body.
    #[error("{error}")]
    Service { status: u16, error: ServiceError },

    /// A response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client could not be configured from the environment.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Messages reported by the service, empty for every other variant.
    pub fn messages(&self) -> &[String] {
        match self {
            ApiError::Service { error, .. } => &error.errors,
            _ => &[],
        }
    }

    /// HTTP status of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the service reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Service { status, error } => {
                *status == 404 || error.to_string().contains("couldn't be found")
            }
            _ => false,
        }
    }

    /// Returns true if the service rejected the API token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ApiError::Service { status, error } => {
                matches!(*status, 401 | 403)
                    || error.to_string().contains("X-API-Token header was missing or incorrect")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(status: u16, errors: &[&str]) -> ApiError {
        ApiError::Service {
            status,
            error: ServiceError {
                errors: errors.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[test]
    fn service_error_joins_messages_with_spaces() {
        let err = service(422, &["Name can't be blank.", "\"oh no!\" is not a valid plan."]);
        assert_eq!(
            err.to_string(),
            "Name can't be blank. \"oh no!\" is not a valid plan."
        );
    }

    #[test]
    fn empty_service_error_displays_empty_string() {
        assert_eq!(service(500, &[]).to_string(), "");
    }

    #[test]
    fn service_error_deserializes_without_errors_field() {
        assert!(ServiceError::from_slice(b"{}").unwrap().errors.is_empty());
        assert!(ServiceError::from_slice(br#"{"errors":null}"#).unwrap().errors.is_empty());
    }

    #[test]
    fn service_error_requires_an_object() {
        for body in ["[]", r#"[["a","b"]]"#, r#""text""#, "42"] {
            assert!(ServiceError::from_slice(body.as_bytes()).is_err(), "{body}");
        }
    }

    #[test]
    fn not_found_matches_status_or_message() {
        assert!(service(404, &[]).is_not_found());
        assert!(service(400, &["/servers/oops couldn't be found."]).is_not_found());
        assert!(!service(422, &["bad plan"]).is_not_found());
        assert!(!ApiError::Transport("refused".into()).is_not_found());
    }

    #[test]
    fn unauthorized_matches_status_or_message() {
        assert!(service(401, &[]).is_unauthorized());
        assert!(service(400, &["X-API-Token header was missing or incorrect."]).is_unauthorized());
        assert!(!service(404, &["nope"]).is_unauthorized());
    }

    #[test]
    fn messages_and_status_only_for_service_errors() {
        let err = service(404, &["gone"]);
        assert_eq!(err.messages(), ["gone".to_string()]);
        assert_eq!(err.status(), Some(404));

        let err = ApiError::Deserialization("eof".into());
        assert!(err.messages().is_empty());
        assert_eq!(err.status(), None);
    }
}
