//! Centralized filename parsing for the `name.locale.ext` convention.
//!
//! Every entry under the pages directory follows one of two shapes:
//!
//! - `name.ext` — a page with no locale tag (the locale-less default)
//! - `name.locale.ext` — one locale variant of the logical page `name`
//!
//! where `ext` is one of [`CONTENT_EXTENSIONS`]. Directory-level navigation
//! overrides follow the same idea: `meta.json` or `meta.locale.json`.
//!
//! ## Routes
//!
//! The route segment of a file is its base name (everything before the first
//! `.`), except that `index` collapses to the empty segment so that
//! `docs/index.mdx` is served at `/docs` rather than `/docs/index`:
//!
//! - `about.mdx` → `about`
//! - `about.fr.mdx` → `about`
//! - `index.en.mdx` → `` (the parent directory's own route)

use std::sync::LazyLock;

use regex::Regex;

/// Extensions recognized as pages: markup with front matter, or scripts.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx", "js", "jsx", "ts", "tsx"];

/// The subset of [`CONTENT_EXTENSIONS`] that carries a front-matter header.
pub const MARKUP_EXTENSIONS: &[&str] = &["md", "mdx"];

/// `<base>.<locale>.<ext>`, capturing the locale tag.
static LOCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-zA-Z-]+)?\.(?:mdx?|jsx?|tsx?|json)$").unwrap());

/// `meta.json` or `meta.<locale>.json`.
static META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^meta(?:\.([a-zA-Z-]+))?\.json$").unwrap());

/// Locale tag embedded in a filename, if any.
///
/// ```text
/// index.en.mdx → Some("en")
/// index.mdx    → None
/// meta.zh-CN.json → Some("zh-CN")
/// ```
pub fn locale_of(filename: &str) -> Option<&str> {
    LOCALE_RE
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The prefix up to the first `.`.
pub fn remove_extension(filename: &str) -> &str {
    filename
        .split_once('.')
        .map(|(base, _)| base)
        .unwrap_or(filename)
}

/// Everything after the first `.`, or the empty string for undotted names.
pub fn extension(filename: &str) -> &str {
    filename
        .split_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
}

/// Route segment contributed by a file or directory name.
pub fn route_segment(filename: &str) -> &str {
    match remove_extension(filename) {
        "index" => "",
        base => base,
    }
}

/// Join a parent route and a segment, the way URL paths nest.
///
/// The root route is `/`; an empty segment resolves to the parent itself.
pub fn join_route(parent: &str, segment: &str) -> String {
    if segment.is_empty() {
        return parent.to_string();
    }
    if parent.ends_with('/') {
        format!("{parent}{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}

fn last_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Whether `filename` is a page (markup or script).
pub fn is_content_file(filename: &str) -> bool {
    last_extension(filename).is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext))
}

/// Whether `filename` is a markup page that may carry front matter.
pub fn is_markup_file(filename: &str) -> bool {
    last_extension(filename).is_some_and(|ext| MARKUP_EXTENSIONS.contains(&ext))
}

/// Classify a directory-level meta file.
///
/// Returns `None` when `filename` is not a meta file at all, `Some(None)` for
/// the locale-less `meta.json`, and `Some(Some(locale))` for `meta.<locale>.json`.
pub fn meta_locale(filename: &str) -> Option<Option<&str>> {
    META_RE
        .captures(filename)
        .map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Normalize Windows separators so paths can be embedded in module source.
pub fn slash(path: &str) -> String {
    path.replace('\\', "/")
}
