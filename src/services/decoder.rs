use crate::api::error::AppError;
use crate::models::UploadRequest;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;

pub const INVALID_JSON: &str = "Invalid JSON payload";
pub const MISSING_FIELDS: &str = "fileName and content are required";

/// Standard alphabet, padding optional, stray trailing bits ignored
const PERMISSIVE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A validated request together with its decoded document bytes
#[derive(Debug)]
pub struct DecodedUpload {
    pub request: UploadRequest,
    pub bytes: Vec<u8>,
}

/// Parses, validates and decodes a raw `/upload` body.
pub fn decode_upload(body: &[u8]) -> Result<DecodedUpload, AppError> {
    let request = parse_request(body)?;
    let bytes = decode_content(&request.content);
    tracing::debug!(
        "Decoded upload '{}': {} base64 chars -> {} bytes",
        request.file_name,
        request.content.len(),
        bytes.len()
    );
    Ok(DecodedUpload { request, bytes })
}

pub fn parse_request(body: &[u8]) -> Result<UploadRequest, AppError> {
    let payload: Value =
        serde_json::from_slice(body).map_err(|_| AppError::BadRequest(INVALID_JSON.to_string()))?;

    let file_name = required_string(&payload, "fileName");
    let content = required_string(&payload, "content");
    let (Some(file_name), Some(content)) = (file_name, content) else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };

    let level = match payload.get("level") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(UploadRequest {
        file_name,
        content,
        level,
    })
}

fn required_string(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Best-effort base64 decode that never fails.
///
/// Characters outside the standard and URL-safe alphabets are skipped and
/// decoding stops at the first `=`. A lone trailing sextet cannot form a
/// byte and is dropped.
pub fn decode_content(content: &str) -> Vec<u8> {
    let mut cleaned: String = content
        .chars()
        .take_while(|&c| c != '=')
        .filter_map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => Some(c),
            '-' => Some('+'),
            '_' => Some('/'),
            _ => None,
        })
        .collect();

    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }

    match PERMISSIVE.decode(cleaned.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Permissive base64 decode gave up: {}", e);
            Vec::new()
        }
    }
}
