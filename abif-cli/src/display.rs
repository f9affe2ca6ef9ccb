//! Tag display: text interpretation of known tags and output formatting
//!
//! The decoder hands back char arrays for every type-2 field; some of those
//! are really text (base calls, filter wheel order). Which tags those are is
//! display-layer knowledge, so the reinterpretation lives here and never in
//! the decoder.

use abif_decoder::{Result, Tag, Value};
use serde::Serialize;
use std::collections::HashSet;

/// Tags whose char-array values are conventionally text
const KNOWN_TEXT_TAGS: [&[u8; 4]; 4] = [b"APrX", b"PBAS", b"RMdX", b"FWO_"];

/// Build the set of tag names to render as text.
///
/// Starts from the built-in set (unless `raw`), then adds 4-character names
/// from the config; other lengths cannot be tag names and are skipped with
/// a warning.
pub fn text_tag_names(extra: &[String], raw: bool) -> HashSet<[u8; 4]> {
    let mut names: HashSet<[u8; 4]> = if raw {
        HashSet::new()
    } else {
        KNOWN_TEXT_TAGS.iter().map(|&&name| name).collect()
    };

    for name in extra {
        match name.as_bytes().try_into() {
            Ok(name) => {
                names.insert(name);
            }
            Err(_) => log::warn!("ignoring text tag {:?}: name must be 4 characters", name),
        }
    }
    names
}

/// Reinterpret a decoded value for display.
///
/// Char arrays of known-text tags become strings; everything else passes
/// through unchanged.
pub fn interpret(tag: Tag, value: Value, text_tags: &HashSet<[u8; 4]>) -> Value {
    match value {
        Value::I8Array(chars) if text_tags.contains(&tag.name) => {
            let bytes: Vec<u8> = chars.iter().map(|&c| c as u8).collect();
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        other => other,
    }
}

/// One line of dump output: `NAME:num: type(value)`, or the error for
/// tags that fail to decode
pub fn format_line(tag: Tag, result: &Result<Value>, show_values: bool) -> String {
    match result {
        Ok(value) if show_values => format!("{}: {}({})", tag, value.type_name(), value),
        Ok(value) => format!("{}: {}", tag, value.type_name()),
        Err(e) => format!("{}: {}", tag, e),
    }
}

/// JSON record for one tag
#[derive(Debug, Serialize)]
pub struct JsonRecord {
    pub tag: Tag,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JsonRecord {
    pub fn new(tag: Tag, result: Result<Value>) -> Self {
        match result {
            Ok(value) => Self {
                tag,
                type_name: Some(value.type_name()),
                value: Some(value),
                error: None,
            },
            Err(e) => Self {
                tag,
                type_name: None,
                value: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_become_text() {
        let names = text_tag_names(&[], false);
        let tag = Tag::new(*b"PBAS", 1);
        let value = Value::I8Array(vec![71, 65, 84, 67]); // "GATC"

        assert_eq!(
            interpret(tag, value, &names),
            Value::String("GATC".to_string())
        );
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        let names = text_tag_names(&[], false);
        let tag = Tag::new(*b"PLOC", 1);
        let value = Value::I8Array(vec![71, 65]);

        assert_eq!(interpret(tag, value.clone(), &names), value);
    }

    #[test]
    fn test_raw_disables_builtins() {
        let names = text_tag_names(&[], true);
        assert!(names.is_empty());
    }

    #[test]
    fn test_config_extends_set() {
        let extra = vec!["PCON".to_string(), "toolong".to_string()];
        let names = text_tag_names(&extra, false);
        assert!(names.contains(b"PCON"));
        assert!(names.contains(b"PBAS"));
        assert_eq!(names.len(), KNOWN_TEXT_TAGS.len() + 1);
    }

    #[test]
    fn test_format_line() {
        let tag = Tag::new(*b"LANE", 1);
        assert_eq!(
            format_line(tag, &Ok(Value::I16(3)), true),
            "LANE:1: i16(3)"
        );
        assert_eq!(format_line(tag, &Ok(Value::I16(3)), false), "LANE:1: i16");

        let err = Err(abif_decoder::AbifError::TagNotFound(tag));
        assert_eq!(format_line(tag, &err, true), "LANE:1: tag not found: LANE:1");
    }
}
