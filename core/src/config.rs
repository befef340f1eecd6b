//! Per-API configuration for the helper.
//!
//! # Design
//! A concrete backend differs from the generic helper in two ways only: it may
//! wrap its JSON in a fixed-length guard prefix, and it may require extra
//! headers (API keys, application ids) on every request. Both live here and
//! are fixed at construction; the helper never mutates them.
//!
//! The struct is serde-friendly so a mobile host can hand it over as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    /// Number of leading response bytes to drop before JSON parsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_response_data_length: Option<usize>,

    /// Headers added to every request, keyed by header name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_headers: Option<BTreeMap<String, String>>,
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn skip_response_data_length(mut self, len: usize) -> Self {
        self.skip_response_data_length = Some(len);
        self
    }

    /// Add one header to the set sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_skip_and_no_headers() {
        let config = ApiConfig::default();
        assert!(config.skip_response_data_length.is_none());
        assert!(config.additional_headers.is_none());
    }

    #[test]
    fn from_json_reads_camel_case_fields() {
        let config = ApiConfig::from_json(
            r#"{"skipResponseDataLength":5,"additionalHeaders":{"X-Parse-Application-Id":"app"}}"#,
        )
        .unwrap();
        assert_eq!(config.skip_response_data_length, Some(5));
        let headers = config.additional_headers.unwrap();
        assert_eq!(headers["X-Parse-Application-Id"], "app");
    }

    #[test]
    fn from_json_empty_object_is_default() {
        assert_eq!(ApiConfig::from_json("{}").unwrap(), ApiConfig::default());
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            ApiConfig::from_json("nope"),
            Err(ApiError::JsonParse(_))
        ));
    }

    #[test]
    fn header_setter_replaces_duplicate_keys() {
        let config = ApiConfig::new().header("A", "1").header("A", "2");
        let headers = config.additional_headers.unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["A"], "2");
    }
}
