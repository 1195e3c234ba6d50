//! Turns raw LLM output into the stored profile object.

use serde_json::{json, Value};

/// Strips one surrounding markdown code fence (```json ... ``` or ``` ... ```).
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // drop the language tag line
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// Parses a JSON object from the LLM answer; anything else is wrapped as `{"summary": text}`.
pub fn parse_profile(raw: &str) -> Value {
    let body = strip_code_fence(raw);
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => value,
        _ => json!({ "summary": raw.trim() }),
    }
}
