//! Permissive parsing of classifier responses
//!
//! The classifier wraps its JSON in arbitrary prose more often than not.
//! Parsing extracts the first well-formed JSON array from the body and
//! silently filters anything that isn't usable: non-string entries, empty
//! phrases, objects without a `text` field. A body with no parseable array
//! yields an empty result, never an error.

use super::LabeledPhrase;
use serde_json::Value;

/// Extract a flat list of forbidden phrases from a response body
pub fn extract_phrases(body: &str) -> Vec<String> {
    let Some(array) = first_json_array(body) else {
        return Vec::new();
    };

    array
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            // Some classifier versions return objects even in phrase mode
            Value::Object(mut map) => match map.remove("text") {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
            _ => None,
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Extract labeled entities from a legacy-style response body
pub fn extract_labeled(body: &str) -> Vec<LabeledPhrase> {
    let Some(array) = first_json_array(body) else {
        return Vec::new();
    };

    array
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => {
                let text = s.trim().to_string();
                if text.is_empty() {
                    None
                } else {
                    Some(LabeledPhrase {
                        text,
                        category: None,
                    })
                }
            }
            Value::Object(mut map) => {
                let text = match map.remove("text") {
                    Some(Value::String(s)) => s.trim().to_string(),
                    _ => return None,
                };
                if text.is_empty() {
                    return None;
                }
                let category = match map.remove("category") {
                    Some(Value::String(c)) => Some(c),
                    _ => None,
                };
                Some(LabeledPhrase { text, category })
            }
            _ => None,
        })
        .collect()
}

/// Find the first substring of `body` that parses as a JSON array.
///
/// Scans for `[`, walks to the matching bracket while honoring string
/// literals and escapes, and attempts a parse; on failure the scan resumes
/// at the next `[`.
fn first_json_array(body: &str) -> Option<Vec<Value>> {
    let bytes = body.as_bytes();
    let mut search_from = 0;

    while let Some(rel) = body[search_from..].find('[') {
        let start = search_from + rel;
        if let Some(end) = matching_bracket(bytes, start) {
            if let Ok(Value::Array(items)) = serde_json::from_str(&body[start..=end]) {
                return Some(items);
            }
        }
        search_from = start + 1;
    }
    None
}

fn matching_bracket(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
