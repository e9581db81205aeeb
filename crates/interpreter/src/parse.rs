//! Defensive parsing of model replies.
//!
//! Models wrap JSON in prose or code fences often enough that a plain
//! `serde_json::from_str` is not good enough. We strip fences, locate the
//! first balanced object or array, and parse only that.

use querylens_core::error::AnalysisError;
use serde::de::DeserializeOwned;

/// Extract the first JSON value (object, array, or a bare `null`) from a reply.
pub fn extract_json(reply: &str) -> Result<serde_json::Value, AnalysisError> {
    let text = strip_fences(reply.trim());

    if text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("none") {
        return Ok(serde_json::Value::Null);
    }

    let start = text
        .find(['{', '['])
        .ok_or_else(|| AnalysisError::UnparseableOutput(preview(reply)))?;
    let end = balanced_end(&text[start..])
        .ok_or_else(|| AnalysisError::UnparseableOutput(preview(reply)))?;

    serde_json::from_str(&text[start..start + end])
        .map_err(|e| AnalysisError::UnparseableOutput(format!("{e}: {}", preview(reply))))
}

/// Extract and deserialize into `T`.
pub fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T, AnalysisError> {
    let value = extract_json(reply)?;
    serde_json::from_value(value)
        .map_err(|e| AnalysisError::UnparseableOutput(format!("{e}: {}", preview(reply))))
}

/// Clamp a model-reported score into [0, 1]; NaN becomes 0.
pub fn unit_score(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Byte length of the balanced JSON value at the start of `text`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn preview(reply: &str) -> String {
    const MAX: usize = 120;
    match reply.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &reply[..i]),
        None => reply.to_string(),
    }
}
