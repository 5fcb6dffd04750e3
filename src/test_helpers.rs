//! Shared test utilities for the pagemap test suite.
//!
//! Provides on-disk site builders, in-memory node constructors, and lookup
//! helpers over [`Directory`] children.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = site(&[("index.mdx", "# Home"), ("docs/intro.mdx", "")]);
//! let tree = build(tmp.path(), &tmp.path().join("index.mdx")).unwrap();
//!
//! let docs = find_dir(&tree.root, "docs");
//! assert_eq!(find_page(docs, "intro").route, "/docs/intro");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Directory, META_NODE_NAME, MetaFile, Metadata, Page, PageMapNode};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// The copy holds `pagemap.toml` and a multi-locale `pages/` directory.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Materialize `files` (relative path, contents) under a fresh temp directory.
pub fn site(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, contents) in files {
        let path = tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }
    tmp
}

// =========================================================================
// In-memory node constructors
// =========================================================================

pub fn dir(name: &str, route: &str, children: Vec<PageMapNode>) -> Directory {
    Directory {
        name: name.to_string(),
        children,
        route: route.to_string(),
    }
}

pub fn subdir(name: &str, route: &str, children: Vec<PageMapNode>) -> PageMapNode {
    PageMapNode::Directory(dir(name, route, children))
}

pub fn page(name: &str, route: &str, locale: Option<&str>) -> PageMapNode {
    PageMapNode::Page(Page {
        name: name.to_string(),
        route: route.to_string(),
        front_matter: None,
        locale: locale.map(str::to_string),
    })
}

pub fn meta(locale: Option<&str>, entries: &[(&str, &str)]) -> PageMapNode {
    let meta: Metadata = entries
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    PageMapNode::MetaFile(MetaFile {
        name: META_NODE_NAME.to_string(),
        meta,
        locale: locale.map(str::to_string),
    })
}

// =========================================================================
// Lookups — panic with a clear message on miss
// =========================================================================

/// Names of a directory's children in order.
pub fn child_names(dir: &Directory) -> Vec<&str> {
    dir.children.iter().map(|c| c.name()).collect()
}

/// Find a child directory by name. Panics if not found.
pub fn find_dir<'a>(dir: &'a Directory, name: &str) -> &'a Directory {
    dir.children
        .iter()
        .find_map(|c| match c {
            PageMapNode::Directory(d) if d.name == name => Some(d),
            _ => None,
        })
        .unwrap_or_else(|| {
            panic!(
                "directory '{name}' not found in '{}'. Available: {:?}",
                dir.route,
                child_names(dir)
            )
        })
}

/// Find the first page child by name. Panics if not found.
pub fn find_page<'a>(dir: &'a Directory, name: &str) -> &'a Page {
    pages(dir)
        .into_iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| {
            panic!(
                "page '{name}' not found in '{}'. Available: {:?}",
                dir.route,
                child_names(dir)
            )
        })
}

/// All direct page children in order.
pub fn pages(dir: &Directory) -> Vec<&Page> {
    dir.children
        .iter()
        .filter_map(|c| match c {
            PageMapNode::Page(p) => Some(p),
            _ => None,
        })
        .collect()
}

/// All direct meta file children in order.
pub fn meta_files(dir: &Directory) -> Vec<&MetaFile> {
    dir.children
        .iter()
        .filter_map(|c| match c {
            PageMapNode::MetaFile(m) => Some(m),
            _ => None,
        })
        .collect()
}
