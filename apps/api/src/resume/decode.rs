//! Field-by-field decoding of loosely-typed model JSON.
//!
//! Each helper returns a default for absent or ill-shaped input and records the
//! offending field path in `defaulted`, so callers can report exactly what was lost.

use serde_json::{Map, Value};

/// String-like scalar. Numbers are accepted (`8.2` reads as `"8.2"`).
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Top-level string field. Absent, null, or non-scalar values are defaulted.
pub fn string_field(object: &Map<String, Value>, key: &str, defaulted: &mut Vec<String>) -> String {
    match object.get(key).and_then(scalar_string) {
        Some(s) => s,
        None => {
            defaulted.push(key.to_string());
            String::new()
        }
    }
}

/// Nested string field. Absence is normal; only a present value of the wrong shape is reported.
pub fn nested_string_field(
    object: &Map<String, Value>,
    parent: &str,
    key: &str,
    defaulted: &mut Vec<String>,
) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(value) => scalar_string(value).unwrap_or_else(|| {
            defaulted.push(format!("{parent}.{key}"));
            String::new()
        }),
    }
}

/// List of strings. A single comma-separated string is split into items;
/// non-scalar array elements are skipped and reported.
pub fn string_list_field(
    object: &Map<String, Value>,
    key: &str,
    defaulted: &mut Vec<String>,
) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            let mut skipped = false;
            for item in items {
                match scalar_string(item) {
                    Some(s) if !s.is_empty() => out.push(s),
                    Some(_) => {}
                    None => skipped = true,
                }
            }
            if skipped {
                defaulted.push(key.to_string());
            }
            out
        }
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        _ => {
            defaulted.push(key.to_string());
            Vec::new()
        }
    }
}

/// Non-negative integer. Accepts integers, floats (floored), and numeric strings.
/// Negative values clamp to zero.
pub fn count_field(object: &Map<String, Value>, key: &str, defaulted: &mut Vec<String>) -> u32 {
    let parsed = match object.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| v.min(u64::from(u32::MAX)) as u32)
            .or_else(|| n.as_f64().map(clamp_to_count)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(clamp_to_count),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        defaulted.push(key.to_string());
        0
    })
}

/// Integer score, accepting floats and numeric strings. No clamping here.
pub fn integer_field(object: &Map<String, Value>, key: &str) -> Option<i64> {
    match object.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

/// Boolean, accepting `"true"`/`"false"`/`"yes"`/`"no"` strings.
pub fn bool_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn clamp_to_count(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.floor().min(f64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_string_field_accepts_numbers() {
        let obj = object(json!({"cgpa": 8.2}));
        let mut defaulted = Vec::new();
        assert_eq!(string_field(&obj, "cgpa", &mut defaulted), "8.2");
        assert!(defaulted.is_empty());
    }

    #[test]
    fn test_string_field_reports_missing_and_null() {
        let obj = object(json!({"cgpa": null}));
        let mut defaulted = Vec::new();
        assert_eq!(string_field(&obj, "cgpa", &mut defaulted), "");
        assert_eq!(string_field(&obj, "absent", &mut defaulted), "");
        assert_eq!(defaulted, vec!["cgpa", "absent"]);
    }

    #[test]
    fn test_string_list_splits_comma_string() {
        let obj = object(json!({"databases": "MySQL, MongoDB ,"}));
        let mut defaulted = Vec::new();
        assert_eq!(
            string_list_field(&obj, "databases", &mut defaulted),
            vec!["MySQL", "MongoDB"]
        );
        assert!(defaulted.is_empty());
    }

    #[test]
    fn test_string_list_skips_objects() {
        let obj = object(json!({"databases": ["MySQL", {"name": "Redis"}, ""]}));
        let mut defaulted = Vec::new();
        assert_eq!(
            string_list_field(&obj, "databases", &mut defaulted),
            vec!["MySQL"]
        );
        assert_eq!(defaulted, vec!["databases"]);
    }

    #[test]
    fn test_count_field_variants() {
        let obj = object(json!({"a": 2, "b": "3", "c": -1, "d": 2.7, "e": "many"}));
        let mut defaulted = Vec::new();
        assert_eq!(count_field(&obj, "a", &mut defaulted), 2);
        assert_eq!(count_field(&obj, "b", &mut defaulted), 3);
        assert_eq!(count_field(&obj, "c", &mut defaulted), 0);
        assert_eq!(count_field(&obj, "d", &mut defaulted), 2);
        assert_eq!(count_field(&obj, "e", &mut defaulted), 0);
        assert_eq!(defaulted, vec!["e"]);
    }

    #[test]
    fn test_integer_field_rounds() {
        let obj = object(json!({"score": 84.6, "text": "72", "bad": [1]}));
        assert_eq!(integer_field(&obj, "score"), Some(85));
        assert_eq!(integer_field(&obj, "text"), Some(72));
        assert_eq!(integer_field(&obj, "bad"), None);
        assert_eq!(integer_field(&obj, "absent"), None);
    }

    #[test]
    fn test_bool_value() {
        assert_eq!(bool_value(&json!(true)), Some(true));
        assert_eq!(bool_value(&json!("No")), Some(false));
        assert_eq!(bool_value(&json!(1)), None);
    }
}
