//! Notion property values flattened to plain strings, and back.
//!
//! Only text-like property types are supported for writes. Reads of any
//! other type yield the empty string.

use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};
use starsync_core::TableError;

/// Notion caps a single rich-text object at 2000 characters.
const MAX_TEXT_CHUNK: usize = 2000;

/// The declared type of a database column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    RichText,
    Url,
    Email,
    PhoneNumber,
    Select,
    #[serde(other)]
    Other,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Url => "url",
            PropertyKind::Email => "email",
            PropertyKind::PhoneNumber => "phone_number",
            PropertyKind::Select => "select",
            PropertyKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Flatten a page property value (`{"type": ..., "<type>": ...}`) to text.
pub fn read_value(property: &Value) -> String {
    let kind = property.get("type").and_then(Value::as_str).unwrap_or("");
    let payload = property.get(kind).unwrap_or(&Value::Null);
    match kind {
        "title" | "rich_text" => payload
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("plain_text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default(),
        "url" | "email" | "phone_number" => payload.as_str().unwrap_or("").to_string(),
        "select" => payload
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        _ => String::new(),
    }
}

/// Build the property value that sets a `kind` column named `field` to `value`.
pub fn write_value(field: &str, kind: &PropertyKind, value: &str) -> Result<Value, TableError> {
    let nullable = |v: &str| {
        if v.is_empty() {
            Value::Null
        } else {
            Value::String(v.to_string())
        }
    };
    Ok(match kind {
        PropertyKind::Title => json!({ "title": text_chunks(value) }),
        PropertyKind::RichText => json!({ "rich_text": text_chunks(value) }),
        PropertyKind::Url => json!({ "url": nullable(value) }),
        PropertyKind::Email => json!({ "email": nullable(value) }),
        PropertyKind::PhoneNumber => json!({ "phone_number": nullable(value) }),
        PropertyKind::Select if value.is_empty() => json!({ "select": Value::Null }),
        PropertyKind::Select => json!({ "select": { "name": value } }),
        PropertyKind::Other => {
            return Err(TableError::UnsupportedField {
                field: field.to_string(),
                kind: kind.to_string(),
            })
        }
    })
}

fn text_chunks(value: &str) -> Vec<Value> {
    let chars: Vec<char> = value.chars().collect();
    chars
        .chunks(MAX_TEXT_CHUNK)
        .map(|chunk| json!({ "type": "text", "text": { "content": chunk.iter().collect::<String>() } }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_title_by_joining_fragments() {
        let prop = json!({
            "type": "title",
            "title": [{"plain_text": "rip"}, {"plain_text": "grep"}]
        });
        assert_eq!(read_value(&prop), "ripgrep");
    }

    #[test]
    fn reads_null_url_as_empty() {
        assert_eq!(read_value(&json!({"type": "url", "url": null})), "");
    }

    #[test]
    fn reads_unsupported_type_as_empty() {
        assert_eq!(read_value(&json!({"type": "checkbox", "checkbox": true})), "");
    }

    #[test]
    fn writes_rich_text() {
        let v = write_value("Description", &PropertyKind::RichText, "fast grep").unwrap();
        assert_eq!(v["rich_text"][0]["text"]["content"], "fast grep");
    }

    #[test]
    fn long_text_is_split_into_chunks() {
        let long = "x".repeat(MAX_TEXT_CHUNK + 5);
        let v = write_value("Description", &PropertyKind::RichText, &long).unwrap();
        let parts = v["rich_text"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["text"]["content"], "xxxxx");
    }

    #[test]
    fn empty_url_is_null() {
        let v = write_value("URL", &PropertyKind::Url, "").unwrap();
        assert!(v["url"].is_null());
    }

    #[test]
    fn other_kinds_are_rejected() {
        let err = write_value("Stars", &PropertyKind::Other, "1").unwrap_err();
        assert!(matches!(err, TableError::UnsupportedField { .. }));
    }

    #[test]
    fn unknown_kind_deserializes_to_other() {
        let kind: PropertyKind = serde_json::from_value(json!("checkbox")).unwrap();
        assert_eq!(kind, PropertyKind::Other);
    }
}
