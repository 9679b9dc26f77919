//! Request handlers for the gateway endpoints.

pub mod discord;
pub mod oauth;
pub mod payments;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Parse a JSON request body, treating anything unreadable as a bad request.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
}

/// Drop missing and whitespace-only values.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        name: Option<String>,
    }

    #[test]
    fn test_parse_json_rejects_garbage() {
        let err = parse_json::<Probe>(&Bytes::from_static(b"not json")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let probe: Probe = parse_json(&Bytes::from_static(br#"{"name":"x"}"#)).unwrap();
        assert_eq!(probe.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("a".into())), Some("a".to_string()));
    }
}
