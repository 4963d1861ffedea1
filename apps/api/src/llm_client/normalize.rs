//! Response normalization: fence stripping, JSON parsing and shallow shape checks.
//!
//! Only top-level keys are validated here. Field types are enforced afterwards by the
//! typed deserialization of each task's output record.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Whether a task's result is a single JSON object or an array of objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Object,
    Array,
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultShape::Object => f.write_str("object"),
            ResultShape::Array => f.write_str("array"),
        }
    }
}

/// Expected shape of a model response. For arrays, `required_keys` applies to every element.
#[derive(Debug, Clone, Copy)]
pub struct ResponseSchema {
    pub shape: ResultShape,
    pub required_keys: &'static [&'static str],
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Model response was empty")]
    Empty,

    #[error("Model response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Expected a JSON {expected}, found {found}")]
    WrongShape {
        expected: ResultShape,
        found: &'static str,
    },

    #[error("Expected a non-empty JSON array")]
    EmptyArray,

    #[error("Missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Fields have unexpected types: {0}")]
    InvalidFields(#[source] serde_json::Error),
}

/// Strips code fences and surrounding prose from LLM output, leaving the JSON payload.
///
/// Handles ```` ```json ... ``` ````, bare ```` ``` ```` fences, fences preceded by prose
/// ("Here is the result:"), and unfenced JSON with leading or trailing chatter.
pub fn strip_json_fences(text: &str) -> &str {
    let mut text = text.trim();
    if serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok() {
        return text;
    }

    // a fence only wraps the payload when it opens before the first `{` or `[`;
    // later backticks belong to string values
    let first_bracket = text.find(|c: char| c == '{' || c == '[');
    let fence = text
        .find("```")
        .filter(|start| first_bracket.map_or(true, |open| *start < open));

    if let Some(start) = fence {
        let after = &text[start + 3..];
        // optional language tag directly after the opening fence
        let tag_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(after.len());
        let body = &after[tag_len..];
        text = match body.rfind("```") {
            Some(end) => body[..end].trim(),
            None => body.trim(),
        };
    }

    slice_json_payload(text)
}

/// Narrows `text` to the span from the first `{` or `[` to the last matching closer.
fn slice_json_payload(text: &str) -> &str {
    let Some(open) = text.find(|c: char| c == '{' || c == '[') else {
        return text;
    };
    let closer = if text[open..].starts_with('{') { '}' } else { ']' };
    match text.rfind(closer) {
        Some(close) if close > open => &text[open..=close],
        _ => &text[open..],
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn missing_keys(value: &Value, required: &[&str], missing: &mut BTreeSet<String>) {
    match value.as_object() {
        Some(map) => {
            for key in required {
                if !map.contains_key(*key) {
                    missing.insert((*key).to_string());
                }
            }
        }
        None => missing.extend(required.iter().map(|k| (*k).to_string())),
    }
}

/// Strips, parses and shape-checks a raw response, returning the untyped JSON value.
pub fn normalize_value(schema: &ResponseSchema, raw: &str) -> Result<Value, ParseError> {
    let payload = strip_json_fences(raw);
    if payload.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: Value = serde_json::from_str(payload).map_err(ParseError::InvalidJson)?;

    let mut missing = BTreeSet::new();
    match (schema.shape, &value) {
        (ResultShape::Object, Value::Object(_)) => {
            missing_keys(&value, schema.required_keys, &mut missing);
        }
        (ResultShape::Array, Value::Array(items)) => {
            if items.is_empty() {
                return Err(ParseError::EmptyArray);
            }
            for item in items {
                if !item.is_object() {
                    return Err(ParseError::WrongShape {
                        expected: ResultShape::Object,
                        found: json_type_name(item),
                    });
                }
                missing_keys(item, schema.required_keys, &mut missing);
            }
        }
        (expected, other) => {
            return Err(ParseError::WrongShape {
                expected,
                found: json_type_name(other),
            });
        }
    }

    if !missing.is_empty() {
        return Err(ParseError::MissingKeys(missing.into_iter().collect()));
    }

    Ok(value)
}

/// Full normalization into the task's typed record.
pub fn normalize<T: DeserializeOwned>(schema: &ResponseSchema, raw: &str) -> Result<T, ParseError> {
    let value = normalize_value(schema, raw)?;
    serde_json::from_value(value).map_err(ParseError::InvalidFields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AB_OBJECT: ResponseSchema = ResponseSchema {
        shape: ResultShape::Object,
        required_keys: &["a", "b"],
    };

    const AB_ARRAY: ResponseSchema = ResponseSchema {
        shape: ResultShape::Array,
        required_keys: &["a", "b"],
    };

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_backticks_inside_string_values_are_kept() {
        let input = r#"{"a": "wrap code in ```rust fences```", "b": 2}"#;
        assert_eq!(strip_json_fences(input), input);

        let fenced = format!("Here you go:\n```json\n{input}\n```");
        assert_eq!(strip_json_fences(&fenced), input);

        let value = normalize_value(&AB_OBJECT, input).unwrap();
        assert_eq!(value["b"], 2);
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_after_prose() {
        let input = "Here is the result:\n```json\n{\"a\":1}\n```\nHope this helps!";
        assert_eq!(strip_json_fences(input), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fences_single_line() {
        assert_eq!(strip_json_fences("```json {\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        assert_eq!(strip_json_fences("```json\n[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_unfenced_prose_is_trimmed_to_payload() {
        let input = "Sure! [{\"a\":1,\"b\":2}] Let me know if you need more.";
        assert_eq!(strip_json_fences(input), "[{\"a\":1,\"b\":2}]");
    }

    #[test]
    fn test_fenced_and_bare_payload_parse_identically() {
        let bare = "{\"a\": 1, \"b\": [\"x\", \"y\"]}";
        let fenced = format!("```json\n{bare}\n```");
        let left = normalize_value(&AB_OBJECT, bare).unwrap();
        let right = normalize_value(&AB_OBJECT, &fenced).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let err = normalize_value(&AB_OBJECT, "Here is the result:\n```json\n{\"a\":1}\n```")
            .unwrap_err();
        match err {
            ParseError::MissingKeys(keys) => assert_eq!(keys, vec!["b"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_superset_is_accepted() {
        let value = normalize_value(&AB_OBJECT, "{\"a\":1,\"b\":2,\"c\":3}").unwrap();
        assert_eq!(value["c"], 3);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = normalize_value(&AB_OBJECT, "{\"a\": 1,").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_empty_response_is_parse_error() {
        assert!(matches!(
            normalize_value(&AB_OBJECT, "  ```json\n```  "),
            Err(ParseError::Empty)
        ));
    }

    #[test]
    fn test_object_expected_but_array_found() {
        let err = normalize_value(&AB_OBJECT, "[{\"a\":1,\"b\":2}]").unwrap_err();
        assert!(matches!(
            err,
            ParseError::WrongShape {
                expected: ResultShape::Object,
                found: "array"
            }
        ));
    }

    #[test]
    fn test_array_elements_are_each_checked() {
        let err = normalize_value(&AB_ARRAY, "[{\"a\":1,\"b\":2},{\"a\":3}]").unwrap_err();
        assert!(matches!(err, ParseError::MissingKeys(ref k) if k == &vec!["b".to_string()]));
    }

    #[test]
    fn test_empty_array_is_rejected() {
        assert!(matches!(
            normalize_value(&AB_ARRAY, "[]"),
            Err(ParseError::EmptyArray)
        ));
    }

    #[test]
    fn test_array_of_scalars_is_wrong_shape() {
        assert!(matches!(
            normalize_value(&AB_ARRAY, "[1, 2]"),
            Err(ParseError::WrongShape { found: "number", .. })
        ));
    }

    #[test]
    fn test_typed_normalize_rejects_wrong_field_type() {
        #[derive(Debug, serde::Deserialize)]
        struct Ab {
            #[allow(dead_code)]
            a: u32,
            #[allow(dead_code)]
            b: Vec<String>,
        }
        let err = normalize::<Ab>(&AB_OBJECT, "{\"a\":1,\"b\":\"not a list\"}").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFields(_)));
    }
}
