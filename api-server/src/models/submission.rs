//! Flow submission body
//!
//! Accepts a JSON object, an urlencoded form or a multipart form (every part
//! read as text). A JSON `null` or an empty body reads as an empty mapping
//! (every feature 0.0).

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use flowguard_core::RawFeatures;
use serde_json::Value;

use crate::AppError;

#[derive(Debug, Clone)]
pub struct FlowSubmission(pub RawFeatures);

/// Mime type without parameters, lowercased
fn media_type(req: &Request) -> String {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Decode a JSON body into a raw mapping
pub fn parse_json_body(bytes: &[u8]) -> Result<RawFeatures, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawFeatures::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(RawFeatures::from_json_map(&map)),
        Ok(Value::Null) => Ok(RawFeatures::new()),
        Ok(_) => Err(AppError::BadRequest("expected a JSON object".to_string())),
        Err(e) => Err(AppError::BadRequest(format!("malformed JSON: {}", e))),
    }
}

/// Collect named multipart parts as text fields
async fn read_multipart(mut multipart: Multipart) -> Result<RawFeatures, AppError> {
    let mut pairs = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        pairs.push((name, value));
    }

    Ok(RawFeatures::from_pairs(pairs))
}

#[async_trait]
impl<S> FromRequest<S> for FlowSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media_type = media_type(&req);

        match media_type.as_str() {
            "application/json" => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                parse_json_body(&bytes).map(FlowSubmission)
            }
            "application/x-www-form-urlencoded" => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(FlowSubmission(RawFeatures::from_pairs(pairs)))
            }
            "multipart/form-data" => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                read_multipart(multipart).await.map(FlowSubmission)
            }
            _ => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    Ok(FlowSubmission(RawFeatures::new()))
                } else if media_type.is_empty() {
                    Err(AppError::UnsupportedMediaType("missing content type".to_string()))
                } else {
                    Err(AppError::UnsupportedMediaType(media_type))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowguard_core::RawValue;

    #[test]
    fn test_parse_json_body() {
        let raw = parse_json_body(br#"{"duration": 1.5, "note": "x"}"#).unwrap();
        assert_eq!(raw.get("duration"), &RawValue::Real(1.5));
        assert_eq!(raw.text("note").as_deref(), Some("x"));

        assert!(parse_json_body(b"").unwrap().is_empty());
        assert!(parse_json_body(b"null").unwrap().is_empty());
        assert!(matches!(parse_json_body(b"[1,2]"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_json_body(b"{oops"), Err(AppError::BadRequest(_))));
    }
}
