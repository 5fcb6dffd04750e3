//! Front-matter extraction.
//!
//! A markup page may open with a YAML header fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Getting Started
//! tags: [intro]
//! ---
//! # Body starts here
//! ```
//!
//! The header is treated as an opaque key-value block: it is parsed into a
//! JSON-compatible mapping and never validated against any schema. A header
//! that does not parse, or that parses to something other than a mapping,
//! degrades to an empty mapping so a typo in one page cannot fail the build.

use crate::types::Metadata;
use serde_json::Value;

const FENCE: &str = "---";

/// Result of splitting a source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub data: Metadata,
    pub body: String,
}

/// Split `raw` into its front-matter mapping and the remaining body.
///
/// Documents without a leading fence come back unchanged with empty data.
pub fn extract(raw: &str) -> FrontMatter {
    let Some((header, body)) = split_header(raw) else {
        return FrontMatter {
            data: Metadata::new(),
            body: raw.to_string(),
        };
    };

    let data = if header.trim().is_empty() {
        Metadata::new()
    } else {
        match serde_yaml::from_str::<Value>(header) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Metadata::new(),
            Err(e) => {
                log::warn!("malformed front matter, ignoring header: {e}");
                Metadata::new()
            }
        }
    };

    FrontMatter {
        data,
        body: body.to_string(),
    }
}

/// Locate the fenced header, returning `(header, body)` slices.
fn split_header(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let first_line_end = raw.find('\n')?;
    if raw[..first_line_end].trim_end() != FENCE {
        return None;
    }

    let rest = &raw[first_line_end + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}
