/*!
 * Response extraction.
 *
 * Turns a raw backend response into exactly `n` translated strings. The
 * backend is asked for `{"translations": [...]}` but may answer with a bare
 * array, a JSON string wrapping either shape, JSON buried in chatter, plain
 * lines of text, or a service error envelope. Extraction order:
 *
 * 1. parse the whole response, unwrapping a nested JSON string
 * 2. scan for the first balanced `{...}` / `[...]` candidate
 * 3. fall back to non-empty lines
 *
 * A detected error envelope is reported as a backend error so the retry
 * layer handles it like any other failed call.
 */

use log::debug;
use serde_json::Value;

use crate::errors::{ProviderError, TranslationError};

/// Key holding the translation list in an object response
pub const TRANSLATIONS_KEY: &str = "translations";

/// Extract exactly `expected` translations from a raw backend response
pub fn extract_translations(raw: &str, expected: usize) -> Result<Vec<String>, TranslationError> {
    let items = extract_items(raw)?;
    Ok(normalize_length(items, expected))
}

/// Extract the translation list without length normalization
pub fn extract_items(raw: &str) -> Result<Vec<String>, TranslationError> {
    let trimmed = raw.trim();

    // Direct parse of the whole response
    let direct = serde_json::from_str::<Value>(trimmed)
        .ok()
        .map(unwrap_nested_structured);

    if let Some(value) = &direct {
        check_error_envelope(value)?;
        if let Some(items) = items_from_value(value) {
            return Ok(items);
        }
    }

    // A JSON string that did not unwrap cleanly is scanned in decoded form
    let scan_target = match &direct {
        Some(Value::String(inner)) => inner.as_str(),
        _ => trimmed,
    };

    if let Some(value) = scan_for_structure(scan_target) {
        check_error_envelope(&value)?;
        if let Some(items) = items_from_value(&value) {
            return Ok(items);
        }
    }

    // Last resort: one translation per non-empty line
    let lines: Vec<String> = scan_target
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(TranslationError::ResponseFormat(
            "response contains no translations".to_string(),
        ));
    }

    debug!("No structured payload found, split response into {} lines", lines.len());
    Ok(lines)
}

/// Parse a JSON string value whose content is itself JSON
///
/// Handles double-encoded responses such as `"{\"translations\": [...]}"`.
/// Any other value is returned unchanged.
pub fn unwrap_nested_structured(value: Value) -> Value {
    if let Value::String(inner) = &value {
        let inner = inner.trim();
        if inner.starts_with('{') || inner.starts_with('[') {
            if let Ok(nested) = serde_json::from_str::<Value>(inner) {
                return nested;
            }
        }
    }
    value
}

/// Read a translation list from a parsed value
///
/// Accepts a bare array or an object with a `translations` array.
pub fn items_from_value(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get(TRANSLATIONS_KEY)?.as_array()?,
        _ => return None,
    };
    Some(items.iter().map(coerce_to_string).collect())
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Whether a value looks like a backend error envelope (`{"Output": {"__type": ...}}`)
pub fn is_error_envelope(value: &Value) -> bool {
    value
        .get("Output")
        .and_then(|output| output.get("__type"))
        .is_some()
}

fn check_error_envelope(value: &Value) -> Result<(), TranslationError> {
    if is_error_envelope(value) {
        return Err(ProviderError::ServiceError(value.to_string()).into());
    }
    Ok(())
}

/// Find the first balanced `{...}` or `[...]` in `text` and parse it
///
/// Depth only tracks the bracket kind that opened the candidate. Returns
/// `None` when there is no candidate or it is not valid JSON.
pub fn scan_for_structure(text: &str) -> Option<Value> {
    let start = text.find(['{', '['])?;
    let open = text[start..].chars().next()?;
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
        }

        if depth == 0 {
            let candidate = &text[start..start + offset + ch.len_utf8()];
            return serde_json::from_str::<Value>(candidate)
                .ok()
                .map(unwrap_nested_structured);
        }
    }

    None
}

/// Pad (repeating the last item) or truncate `items` to exactly `expected`
pub fn normalize_length(mut items: Vec<String>, expected: usize) -> Vec<String> {
    if items.len() < expected {
        let filler = items.last().cloned().unwrap_or_default();
        items.resize(expected, filler);
    } else {
        items.truncate(expected);
    }
    items
}
