use std::path::Path;
use thiserror::Error;

/// Longest display name kept, in bytes
pub const MAX_FILENAME_LEN: usize = 255;

/// Longest extension carried over to the staged path
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

/// Reduces a client-supplied name to a safe display name.
///
/// Only the last path component survives; control and reserved characters
/// become `_`. The result is never used to address the filesystem directly.
pub fn sanitize_filename(filename: &str) -> Result<String, ValidationError> {
    // Treat backslashes as separators too, whatever the host platform
    let normalized = filename.replace('\\', "/");
    let name = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() {
        return Err(ValidationError {
            code: "INVALID_FILENAME",
            message: format!("'{}' does not name a file", filename),
        });
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > MAX_FILENAME_LEN {
        let mut end = MAX_FILENAME_LEN;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    Ok(sanitized)
}

/// Lowercased extension of a sanitized name, if it is short and alphanumeric
pub fn staged_extension(sanitized: &str) -> Option<String> {
    let ext = Path::new(sanitized).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
