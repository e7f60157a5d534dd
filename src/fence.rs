// src/fence.rs

use crate::error::ExtractError;
use serde_json::Value;
use tracing::warn;

/// Strip one leading and one trailing markdown code fence from a payload
/// the service returned as a string. The opening fence may carry a
/// language tag (```` ```json ````); either fence may be surrounded by
/// whitespace. Fences are never nested or repeated, so exactly one of
/// each is removed. A payload without fences passes through unchanged.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // Drop the optional language tag glued to the opening fence. The
        // tag must end the fence line; an alphanumeric run followed by
        // anything else is payload, not a tag.
        let tag_len = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count();
        let after_tag = &rest[tag_len..];
        s = if after_tag.is_empty() || after_tag.starts_with(char::is_whitespace) {
            after_tag.trim_start()
        } else {
            rest
        };
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}

/// Unwrap the `result` field of a success response body.
///
/// The service returns either a structured object or a JSON string,
/// sometimes fenced in a markdown code block. The string form is
/// fence-stripped and parsed; a body without `result`, or a string that
/// still fails to parse, is a `ParseError` — the request itself
/// succeeded, the payload is just unusable.
pub fn unwrap_result(body: &Value) -> Result<Value, ExtractError> {
    let result = body.get("result").ok_or(ExtractError::ParseError)?;
    match result {
        Value::String(text) => {
            serde_json::from_str(strip_code_fence(text)).map_err(|e| {
                warn!(error = %e, "Response payload is not valid JSON after fence stripping");
                ExtractError::ParseError
            })
        }
        structured => Ok(structured.clone()),
    }
}
