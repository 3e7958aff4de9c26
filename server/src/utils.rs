use axum::{
    body::Bytes,
    http::{HeaderMap, header::CONTENT_TYPE},
};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Parses the `/update-profile` body into a flat field map.
///
/// The browser page submits either a JSON object or a urlencoded form,
/// so dispatch on the content type and treat everything non-JSON as a
/// form (form values stay strings, as they arrive on the wire).
pub fn parse_profile_fields(headers: &HeaderMap, body: &Bytes) -> Result<Map<String, Value>, AppError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        return match serde_json::from_slice(body) {
            Ok(Value::Object(fields)) => Ok(fields),
            _ => Err(AppError::MalformedPayload),
        };
    }

    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .map(|pairs| {
            pairs
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect()
        })
        .map_err(|_| AppError::MalformedPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_content_type(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_type.parse().unwrap());

        headers
    }

    #[test]
    fn json_body_parses_to_fields() {
        let headers = headers_with_content_type("application/json");
        let body = Bytes::from_static(br#"{"name":"Jane","interests":"hiking"}"#);

        let fields = parse_profile_fields(&headers, &body).unwrap();

        assert_eq!(fields.get("name"), Some(&Value::from("Jane")));
        assert_eq!(fields.get("interests"), Some(&Value::from("hiking")));
    }

    #[test]
    fn form_body_parses_to_fields() {
        let headers = headers_with_content_type("application/x-www-form-urlencoded");
        let body = Bytes::from_static(b"name=Jane+Doe&email=jane%40example.com");

        let fields = parse_profile_fields(&headers, &body).unwrap();

        assert_eq!(fields.get("name"), Some(&Value::from("Jane Doe")));
        assert_eq!(fields.get("email"), Some(&Value::from("jane@example.com")));
    }

    #[test]
    fn json_array_is_rejected() {
        let headers = headers_with_content_type("application/json");
        let body = Bytes::from_static(b"[1,2,3]");

        assert!(matches!(
            parse_profile_fields(&headers, &body),
            Err(AppError::MalformedPayload)
        ));
    }

    #[test]
    fn broken_json_is_rejected() {
        let headers = headers_with_content_type("application/json");
        let body = Bytes::from_static(b"{\"name\":");

        assert!(matches!(
            parse_profile_fields(&headers, &body),
            Err(AppError::MalformedPayload)
        ));
    }

    #[test]
    fn empty_form_body_is_an_empty_map() {
        let fields = parse_profile_fields(&HeaderMap::new(), &Bytes::new()).unwrap();

        assert!(fields.is_empty());
    }
}
