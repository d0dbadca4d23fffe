pub mod job;
pub mod resume;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// Model replies and client payloads are loosely typed. These deserializers
// accept the common shapes instead of failing the whole record.

/// Accepts `3`, `3.5`, `"3"`, `"5+ years"`; anything else becomes 0.
pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().map(|f| f.max(0.0).floor() as u32).unwrap_or(0),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    })
}

/// Accepts a string, number or bool; `null` and containers become `""`.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Treats `null` as the type's default.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts an array of strings or numbers, or one newline-separated string.
pub(crate) fn lenient_strings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.lines().map(str::to_string).collect(),
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().trim_start_matches(['•', '-', '*']).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Order-preserving, case-insensitive dedupe.
pub fn dedupe_case_insensitive(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "lenient_u32", default)]
        years: u32,
        #[serde(deserialize_with = "lenient_strings", default)]
        items: Vec<String>,
        #[serde(deserialize_with = "lenient_string", default)]
        label: String,
    }

    #[test]
    fn test_lenient_u32_shapes() {
        let cases = [
            (r#"{"years": 4}"#, 4),
            (r#"{"years": 3.7}"#, 3),
            (r#"{"years": -2}"#, 0),
            (r#"{"years": "5+ years"}"#, 5),
            (r#"{"years": null}"#, 0),
            (r#"{}"#, 0),
        ];
        for (json, expected) in cases {
            let sample: Sample = serde_json::from_str(json).unwrap();
            assert_eq!(sample.years, expected, "input: {json}");
        }
    }

    #[test]
    fn test_lenient_strings_accepts_text_block() {
        let sample: Sample = serde_json::from_str(r#"{"items": "• Rust\n- Go\n\n"}"#).unwrap();
        assert_eq!(sample.items, vec!["Rust", "Go"]);

        let sample: Sample = serde_json::from_str(r#"{"items": ["Rust", 3, {"x": 1}, " "]}"#).unwrap();
        assert_eq!(sample.items, vec!["Rust", "3"]);
    }

    #[test]
    fn test_lenient_string_shapes() {
        let cases = [
            (r#"{"label": "Remote"}"#, "Remote"),
            (r#"{"label": null}"#, ""),
            (r#"{"label": 120000}"#, "120000"),
            (r#"{"label": true}"#, "true"),
            (r#"{"label": ["a"]}"#, ""),
            (r#"{}"#, ""),
        ];
        for (json, expected) in cases {
            let sample: Sample = serde_json::from_str(json).unwrap();
            assert_eq!(sample.label, expected, "input: {json}");
        }
    }

    #[test]
    fn test_null_default_for_nested_records() {
        #[derive(Debug, Default, PartialEq, Deserialize)]
        struct Inner {
            n: u32,
        }
        #[derive(Deserialize)]
        struct Outer {
            #[serde(deserialize_with = "null_default", default)]
            inner: Inner,
        }

        let outer: Outer = serde_json::from_str(r#"{"inner": null}"#).unwrap();
        assert_eq!(outer.inner, Inner::default());
        let outer: Outer = serde_json::from_str(r#"{"inner": {"n": 2}}"#).unwrap();
        assert_eq!(outer.inner.n, 2);
    }

    #[test]
    fn test_dedupe_case_insensitive_keeps_first() {
        let out = dedupe_case_insensitive(vec![
            "React".to_string(),
            "react".to_string(),
            "AWS".to_string(),
        ]);
        assert_eq!(out, vec!["React", "AWS"]);
    }
}
