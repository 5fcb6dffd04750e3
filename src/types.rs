//! Page map types shared by the tree builder, the locale filter, and the
//! module generators.
//!
//! The page map is a plain ownership tree: a [`Directory`] owns its children
//! and nothing points back up. It serializes to the exact object shapes the
//! theme consumes at runtime, so a node written with `serde_json` can be
//! embedded in generated module source as a literal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Front-matter or meta mapping, in source key order.
pub type Metadata = Map<String, Value>;

/// Name every [`MetaFile`] node carries, regardless of its locale.
pub const META_NODE_NAME: &str = "meta.json";

/// One node of the page map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageMapNode {
    Directory(Directory),
    MetaFile(MetaFile),
    Page(Page),
}

/// A directory with at least one admissible descendant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub name: String,
    pub children: Vec<PageMapNode>,
    pub route: String,
}

/// One content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// File name with every extension removed (`about.fr.mdx` → `about`)
    pub name: String,
    pub route: String,
    /// Only present when the file's front-matter header is non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_matter: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// A directory-level navigation/title override for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub name: String,
    pub meta: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl PageMapNode {
    pub fn name(&self) -> &str {
        match self {
            PageMapNode::Directory(d) => &d.name,
            PageMapNode::MetaFile(m) => &m.name,
            PageMapNode::Page(p) => &p.name,
        }
    }

    /// Route of directories and pages; meta files have none.
    pub fn route(&self) -> Option<&str> {
        match self {
            PageMapNode::Directory(d) => Some(&d.route),
            PageMapNode::Page(p) => Some(&p.route),
            PageMapNode::MetaFile(_) => None,
        }
    }

    /// Locale tag of pages and meta files. Directories are never localized.
    pub fn locale(&self) -> Option<&str> {
        match self {
            PageMapNode::Directory(_) => None,
            PageMapNode::MetaFile(m) => m.locale.as_deref(),
            PageMapNode::Page(p) => p.locale.as_deref(),
        }
    }
}

/// Title a meta entry assigns to a child, if any.
///
/// Entries are either a bare string (`"intro": "Introduction"`) or a nested
/// mapping whose `title` key names the child (`"intro": { "title": "..." }`).
pub fn meta_title<'a>(meta: &'a Metadata, name: &str) -> Option<&'a str> {
    match meta.get(name)? {
        Value::String(title) => Some(title),
        Value::Object(nested) => nested.get("title").and_then(Value::as_str),
        _ => None,
    }
}
