//! Recovery of a JSON object from free-form model output.
//!
//! Models wrap JSON in code fences, return a one-element array instead of an
//! object, add prose around it, or leave trailing commas. Everything here is a
//! string-aware scan: braces and commas inside string literals are never touched.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Member dropped as a last resort when the reply still does not parse.
const DISPOSABLE_MEMBER: &str = "extracurriculars";

#[derive(Debug, Error)]
pub enum MalformedOutput {
    #[error("model reply is empty")]
    Empty,

    #[error("model reply is valid JSON but not an object")]
    NotAnObject,

    #[error("model reply is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Recovers the first JSON object from a model reply.
pub fn parse_model_object(reply: &str) -> Result<Map<String, Value>, MalformedOutput> {
    let mut cleaned = strip_code_fences(reply);
    if cleaned.is_empty() {
        return Err(MalformedOutput::Empty);
    }

    if cleaned.starts_with('[') && cleaned.ends_with(']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&cleaned) {
            match items.into_iter().next() {
                Some(Value::Object(object)) => return Ok(object),
                Some(first) => cleaned = first.to_string(),
                None => {}
            }
        }
    }

    let candidate = first_object_span(&cleaned).unwrap_or(&cleaned);
    let repaired = strip_trailing_commas(candidate);

    let first_error = match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Object(object)) => return Ok(object),
        Ok(_) => return Err(MalformedOutput::NotAnObject),
        Err(e) => e,
    };
    debug!("Model reply failed to parse ({first_error}), dropping '{DISPOSABLE_MEMBER}'");

    let without_member = strip_trailing_commas(&remove_member(&repaired, DISPOSABLE_MEMBER));
    match serde_json::from_str::<Value>(&without_member) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(MalformedOutput::NotAnObject),
        Err(_) => Err(MalformedOutput::Syntax(first_error)),
    }
}

/// Removes ```` ```json ```` (any case) and bare ```` ``` ```` markers anywhere in the text.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Returns the first balanced `{...}` span. When the object never closes
/// (truncated output), falls back to the span up to the last `}`, or to the end.
pub fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = balanced_end(text.as_bytes(), start)
        .or_else(|| text.rfind('}').map(|i| i + 1).filter(|&end| end > start))
        .unwrap_or(text.len());
    Some(&text[start..end])
}

/// Drops commas that directly precede a closing `}` or `]`.
pub fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in text.char_indices() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                let next = text[i + 1..].trim_start().chars().next();
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Deletes every `"key": <value>` member together with one adjoining comma.
pub fn remove_member(text: &str, key: &str) -> String {
    let bytes = text.as_bytes();
    let needle = format!("\"{key}\"");
    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }
        let string_end = skip_string(bytes, i);
        let colon = skip_whitespace(bytes, string_end);
        let is_target = &text[i..string_end] == needle && bytes.get(colon) == Some(&b':');
        if !is_target {
            i = string_end;
            continue;
        }

        let value_start = skip_whitespace(bytes, colon + 1);
        let mut remove_to = value_end(bytes, value_start);

        // Prefer eating the comma before the member; otherwise eat the one after.
        let before = text[copied_to..i].trim_end();
        let remove_from = if before.ends_with(',') {
            copied_to + before.len() - 1
        } else {
            let after = skip_whitespace(bytes, remove_to);
            if bytes.get(after) == Some(&b',') {
                remove_to = after + 1;
            }
            i
        };

        out.push_str(&text[copied_to..remove_from]);
        copied_to = remove_to;
        i = remove_to;
    }

    out.push_str(&text[copied_to..]);
    out
}

/// Index just past the string literal opening at `open`.
fn skip_string(bytes: &[u8], open: usize) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Index just past the bracket that closes the one at `open`.
fn balanced_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index just past the JSON value starting at `start`.
fn value_end(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(b'{') | Some(b'[') => balanced_end(bytes, start).unwrap_or(bytes.len()),
        Some(b'"') => skip_string(bytes, start),
        Some(_) => {
            let mut i = start;
            while i < bytes.len() && !matches!(bytes[i], b',' | b'}' | b']') {
                i += 1;
            }
            i
        }
        None => bytes.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_uppercase_tag() {
        let input = "```JSON\n{\"key\": \"value\"}```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "  {\"key\": \"value\"}  ";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_first_object_span_ignores_braces_in_strings() {
        let text = r#"Here you go: {"note": "use } carefully", "n": {"x": 1}} trailing {"other": 2}"#;
        assert_eq!(
            first_object_span(text),
            Some(r#"{"note": "use } carefully", "n": {"x": 1}}"#)
        );
    }

    #[test]
    fn test_first_object_span_handles_escaped_quotes() {
        let text = r#"{"quote": "she said \"}\"", "ok": true} and more"#;
        assert_eq!(
            first_object_span(text),
            Some(r#"{"quote": "she said \"}\"", "ok": true}"#)
        );
    }

    #[test]
    fn test_first_object_span_unclosed_object_runs_to_end() {
        assert_eq!(first_object_span(r#"{"a": [1, 2"#), Some(r#"{"a": [1, 2"#));
        assert_eq!(first_object_span("no braces here"), None);
    }

    #[test]
    fn test_strip_trailing_commas() {
        let input = r#"{"a": [1, 2, ], "b": "x,}", "c": {"d": 1,},}"#;
        assert_eq!(
            strip_trailing_commas(input),
            r#"{"a": [1, 2 ], "b": "x,}", "c": {"d": 1}}"#
        );
    }

    #[test]
    fn test_remove_member_with_leading_comma() {
        let input = r#"{"cgpa": "8.0", "extracurriculars": {"club": "chess"}}"#;
        assert_eq!(remove_member(input, "extracurriculars"), r#"{"cgpa": "8.0"}"#);
    }

    #[test]
    fn test_remove_member_first_in_object() {
        let input = r#"{"extracurriculars": ["a", "b"], "cgpa": "8.0"}"#;
        let output = remove_member(input, "extracurriculars");
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, json!({"cgpa": "8.0"}));
    }

    #[test]
    fn test_remove_member_leaves_string_values_alone() {
        let input = r#"{"note": "extracurriculars", "cgpa": "8.0"}"#;
        assert_eq!(remove_member(input, "extracurriculars"), input);
    }

    #[test]
    fn test_parse_array_takes_first_object() {
        let object = parse_model_object(r#"[{"cgpa": "9.1"}, {"cgpa": "7.0"}]"#).unwrap();
        assert_eq!(object.get("cgpa"), Some(&json!("9.1")));
    }

    #[test]
    fn test_parse_recovers_by_dropping_broken_extracurriculars() {
        let reply = r#"{"cgpa": "8.0", "extracurriculars": {"club": chess}}"#;
        let object = parse_model_object(reply).unwrap();
        assert_eq!(Value::Object(object), json!({"cgpa": "8.0"}));
    }

    #[test]
    fn test_parse_duplicate_keys_keeps_last() {
        let object = parse_model_object(r#"{"cgpa": "7.0", "cgpa": "8.5"}"#).unwrap();
        assert_eq!(object.get("cgpa"), Some(&json!("8.5")));
    }

    #[test]
    fn test_parse_prose_fails() {
        assert!(matches!(
            parse_model_object("I could not find any resume details."),
            Err(MalformedOutput::Syntax(_))
        ));
        assert!(matches!(
            parse_model_object("```json\n```"),
            Err(MalformedOutput::Empty)
        ));
    }

    #[test]
    fn test_parse_scalar_is_not_an_object() {
        assert!(matches!(
            parse_model_object("42"),
            Err(MalformedOutput::NotAnObject)
        ));
    }
}
