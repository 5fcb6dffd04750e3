//! Page map construction.
//!
//! Walks the pages directory and produces the [`PageMapNode`] tree that
//! describes every route of the site. The same traversal also resolves the
//! route and navigation title of the *active* file, the one whose
//! compilation triggered this build.
//!
//! ## Directory Structure
//!
//! ```text
//! pages/
//! ├── meta.json                # Titles for this directory (locale-less)
//! ├── meta.fr.json             # Titles for this directory (French)
//! ├── index.mdx                # Route "/"
//! ├── about.en.mdx             # Route "/about", locale "en"
//! ├── about.fr.mdx             # Route "/about", locale "fr"
//! ├── api/                     # Server endpoints, never part of the map
//! └── docs/
//!     ├── index.mdx            # Route "/docs"
//!     └── intro.mdx            # Route "/docs/intro"
//! ```
//!
//! ## Traversal
//!
//! Siblings are visited in parallel with rayon, one task per entry, and
//! collected back in enumeration order: completion order never leaks into
//! the tree because navigation and locale fallback both depend on it.
//! Directories without any admissible descendant are pruned.
//!
//! ## Title resolution
//!
//! Once a directory's children are known, the child whose route equals the
//! active route is looked up in that directory's authoritative meta mapping.
//! Resolution runs as the recursion unwinds, so an ancestor that also has a
//! child on the active route (a directory whose `index` is active) has the
//! final word.

use crate::frontmatter;
use crate::naming;
use crate::types::{Directory, META_NODE_NAME, MetaFile, Metadata, Page, PageMapNode, meta_title};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Pages root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Directory route under which server endpoints live.
const API_ROUTE: &str = "/api";

/// Output of one page map build.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTree {
    /// The pages directory itself, routed at `/`.
    pub root: Directory,
    /// Route of the active file; empty if it is not under the root.
    pub active_route: String,
    /// Meta title of the active route, falling back to the file's name.
    pub active_route_title: String,
}

/// One directory entry as listed on disk.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List a directory in enumeration order.
///
/// Hidden entries are skipped. Names are ordered byte-wise, the order the
/// host pipeline's own directory listing yields, so the page map is stable
/// across filesystems.
pub fn list_dir(dir: &Path) -> Result<Vec<DirEntry>, std::io::Error> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        entries.push(DirEntry {
            is_dir: path.is_dir(),
            name,
            path,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Read a file as text, replacing invalid UTF-8 sequences.
///
/// Only a file that cannot be read at all is an error; legacy encodings
/// degrade to U+FFFD with a warning.
pub fn read_lossy(path: &Path) -> Result<String, std::io::Error> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::warn!(
                "{} is not valid UTF-8, invalid bytes replaced",
                path.display()
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Build the page map rooted at `root`, resolving the route and title of
/// `active_file` along the way.
pub fn build(root: &Path, active_file: &Path) -> Result<PageTree, TreeError> {
    let root = fs::canonicalize(root)?;
    if !root.is_dir() {
        return Err(TreeError::NotADirectory(root));
    }
    let active_file = fs::canonicalize(active_file).unwrap_or_else(|_| active_file.to_path_buf());
    let active_name = active_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let walk = Walk {
        active_file: &active_file,
        locale: naming::locale_of(&active_name),
    };
    let listing = walk.directory(&root, "/")?;

    let (active_route, active_route_title) = match listing.active {
        Some(active) => {
            let title = active.title.unwrap_or_default();
            (active.route, title)
        }
        None => (String::new(), String::new()),
    };

    log::debug!(
        "page map for {}: {} top-level entries, active route {:?}",
        root.display(),
        listing.children.len(),
        active_route
    );

    Ok(PageTree {
        root: Directory {
            name: root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            children: listing.children,
            route: "/".to_string(),
        },
        active_route,
        active_route_title,
    })
}

/// Active route discovered in a subtree, with its title once resolved.
#[derive(Debug, Clone)]
struct Active {
    route: String,
    title: Option<String>,
}

struct Listing {
    children: Vec<PageMapNode>,
    active: Option<Active>,
}

/// What visiting one entry produced.
struct Visited {
    node: Option<PageMapNode>,
    active: Option<Active>,
    /// Meta mapping that qualifies for this build's locale
    authoritative_meta: Option<Metadata>,
}

struct Walk<'a> {
    active_file: &'a Path,
    /// Locale of the active file; meta files must match it to name titles
    locale: Option<&'a str>,
}

impl Walk<'_> {
    fn directory(&self, dir: &Path, route: &str) -> Result<Listing, TreeError> {
        let entries = list_dir(dir)?;

        let visited = entries
            .par_iter()
            .map(|entry| self.entry(entry, route))
            .collect::<Result<Vec<_>, TreeError>>()?;

        let mut children = Vec::with_capacity(visited.len());
        let mut dir_meta = Metadata::new();
        let mut active = None;
        for v in visited {
            if let Some(meta) = v.authoritative_meta {
                dir_meta = meta;
            }
            if active.is_none() {
                active = v.active;
            }
            children.extend(v.node);
        }

        if let Some(active) = active.as_mut()
            && let Some(child) = children
                .iter()
                .find(|c| c.route() == Some(active.route.as_str()))
        {
            let title = meta_title(&dir_meta, child.name()).unwrap_or(child.name());
            active.title = Some(title.to_string());
        }

        Ok(Listing { children, active })
    }

    fn entry(&self, entry: &DirEntry, route: &str) -> Result<Visited, TreeError> {
        let entry_route = naming::join_route(route, naming::route_segment(&entry.name));
        let is_active = entry.path == self.active_file;
        let own_active = is_active.then(|| Active {
            route: entry_route.clone(),
            title: None,
        });

        if entry.is_dir {
            if entry_route == API_ROUTE {
                return Ok(Visited {
                    node: None,
                    active: own_active,
                    authoritative_meta: None,
                });
            }
            let listing = self.directory(&entry.path, &entry_route)?;
            let node = (!listing.children.is_empty()).then(|| {
                PageMapNode::Directory(Directory {
                    name: entry.name.clone(),
                    children: listing.children,
                    route: entry_route,
                })
            });
            return Ok(Visited {
                node,
                active: listing.active.or(own_active),
                authoritative_meta: None,
            });
        }

        if naming::is_content_file(&entry.name) {
            let front_matter = if naming::is_markup_file(&entry.name) {
                let raw = read_lossy(&entry.path)?;
                Some(frontmatter::extract(&raw).data).filter(|data| !data.is_empty())
            } else {
                None
            };
            let node = PageMapNode::Page(Page {
                name: naming::remove_extension(&entry.name).to_string(),
                route: entry_route,
                front_matter,
                locale: naming::locale_of(&entry.name).map(str::to_string),
            });
            return Ok(Visited {
                node: Some(node),
                active: own_active,
                authoritative_meta: None,
            });
        }

        if let Some(locale) = naming::meta_locale(&entry.name) {
            let raw = read_lossy(&entry.path)?;
            let meta = parse_meta(&raw, &entry.path);
            let authoritative = (self.locale.is_none() || self.locale == locale).then(|| meta.clone());
            let node = PageMapNode::MetaFile(MetaFile {
                name: META_NODE_NAME.to_string(),
                meta,
                locale: locale.map(str::to_string),
            });
            return Ok(Visited {
                node: Some(node),
                active: own_active,
                authoritative_meta: authoritative,
            });
        }

        Ok(Visited {
            node: None,
            active: own_active,
            authoritative_meta: None,
        })
    }
}

/// Parse a meta file body. Malformed JSON never aborts the build.
fn parse_meta(raw: &str, path: &Path) -> Metadata {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::warn!("{} is not a JSON object, ignoring it", path.display());
            Metadata::new()
        }
        Err(e) => {
            log::warn!(
                "Error parsing {}, make sure it's a valid JSON: {e}",
                path.display()
            );
            Metadata::new()
        }
    }
}
