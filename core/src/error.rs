//! Error types for the HTTP helper.
//!
//! # Design
//! Every failure of an exchange resolves through the same `Result` the success
//! value travels on, so a caller always sees exactly one of value or error.
//! Kinds are distinguished by variant (`ErrorKind`), not by a numeric code;
//! `domain()` and `code()` exist only for hosts that still display the flat
//! descriptor.
//!
//! Transport failures are opaque: `TransportError` carries whatever the
//! underlying HTTP library reported and is passed through unchanged.

use thiserror::Error;

/// Domain string attached to every helper error.
pub const ERROR_DOMAIN: &str = "CommonAPI Error";

/// The single numeric code every helper error reports.
pub const ERROR_CODE: i32 = 1;

pub const NO_CONNECTIVITY_MESSAGE: &str =
    "You appear to be offline, please connect to the Internet.";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL";
pub const EMPTY_URL_MESSAGE: &str = "Empty URL";

/// Failure reported by a `Transport` while sending a request or reading the
/// response body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors delivered by `ApiClient` and `CommonApi` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The connectivity probe reported the network as unreachable.
    #[error("{}", NO_CONNECTIVITY_MESSAGE)]
    NoConnectivity,

    /// The URL string was empty.
    #[error("{}", EMPTY_URL_MESSAGE)]
    EmptyUrl,

    /// The URL string did not parse as an absolute URL.
    #[error("{}", INVALID_URL_MESSAGE)]
    InvalidUrl,

    /// The transport failed; its error is passed through untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A request body could not be serialized or a response body was not JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

/// Discriminant of `ApiError` without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoConnectivity,
    EmptyUrl,
    InvalidUrl,
    Transport,
    JsonParse,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NoConnectivity => ErrorKind::NoConnectivity,
            ApiError::EmptyUrl => ErrorKind::EmptyUrl,
            ApiError::InvalidUrl => ErrorKind::InvalidUrl,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::JsonParse(_) => ErrorKind::JsonParse,
        }
    }

    pub fn domain(&self) -> &'static str {
        ERROR_DOMAIN
    }

    pub fn code(&self) -> i32 {
        ERROR_CODE
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_fixed_texts() {
        assert_eq!(ApiError::NoConnectivity.to_string(), NO_CONNECTIVITY_MESSAGE);
        assert_eq!(ApiError::EmptyUrl.to_string(), "Empty URL");
        assert_eq!(ApiError::InvalidUrl.to_string(), "Invalid URL");
    }

    #[test]
    fn transport_error_is_passed_through() {
        let err = ApiError::from(TransportError::new("connection refused"));
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn every_kind_shares_domain_and_code() {
        for err in [
            ApiError::NoConnectivity,
            ApiError::EmptyUrl,
            ApiError::InvalidUrl,
            ApiError::JsonParse("eof".to_string()),
        ] {
            assert_eq!(err.domain(), ERROR_DOMAIN);
            assert_eq!(err.code(), 1);
        }
    }

    #[test]
    fn serde_json_errors_become_json_parse() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ApiError::JsonParse(_)));
    }
}
