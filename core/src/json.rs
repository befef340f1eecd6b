//! JSON decoding of response bodies.

use serde_json::Value;
use tracing::trace;

use crate::error::ApiError;

/// Decode `data` as JSON after dropping `skip` leading bytes.
///
/// Top-level fragments (`"text"`, `42`, `null`) are accepted as well as
/// objects and arrays. A skip longer than the body is a parse error.
pub fn parse_json_data(data: &[u8], skip: Option<usize>) -> Result<Value, ApiError> {
    let payload = match skip {
        Some(len) => {
            trace!(len, total = data.len(), "skipping response prefix");
            data.get(len..).ok_or_else(|| {
                ApiError::JsonParse(format!(
                    "response is {} bytes, shorter than the {len}-byte prefix",
                    data.len()
                ))
            })?
        }
        None => data,
    };
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_object() {
        let value = parse_json_data(br#"{"a":1,"b":[true,null]}"#, None).unwrap();
        assert_eq!(value, json!({"a": 1, "b": [true, null]}));
    }

    #[test]
    fn accepts_top_level_fragments() {
        assert_eq!(parse_json_data(br#""hello""#, None).unwrap(), json!("hello"));
        assert_eq!(parse_json_data(b"42", None).unwrap(), json!(42));
        assert_eq!(parse_json_data(b"null", None).unwrap(), Value::Null);
    }

    #[test]
    fn skips_prefix_before_parsing() {
        let value = parse_json_data(b")]}'\n{\"session\":{\"id\":\"x\"}}", Some(5)).unwrap();
        assert_eq!(value, json!({"session": {"id": "x"}}));
    }

    #[test]
    fn skipped_bytes_need_not_be_utf8() {
        let mut data = vec![0xff, 0xfe, 0x00];
        data.extend_from_slice(b"[1,2]");
        assert_eq!(parse_json_data(&data, Some(3)).unwrap(), json!([1, 2]));
    }

    #[test]
    fn unskipped_prefix_is_a_parse_error() {
        let err = parse_json_data(b")]}'\n{}", None).unwrap_err();
        assert!(matches!(err, ApiError::JsonParse(_)));
    }

    #[test]
    fn skip_past_end_is_a_parse_error() {
        let err = parse_json_data(b"{}", Some(10)).unwrap_err();
        assert!(matches!(err, ApiError::JsonParse(_)));
    }

    #[test]
    fn empty_body_is_a_parse_error() {
        assert!(matches!(
            parse_json_data(b"", None),
            Err(ApiError::JsonParse(_))
        ));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            parse_json_data(b"not json", None),
            Err(ApiError::JsonParse(_))
        ));
    }
}
