//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Tree
//!
//! ```text
//! Page map
//! 001 about [en] → /about
//! 002 about [fr] → /about
//! 003 docs/ → /docs
//!     001 getting-started [en] → /docs/getting-started
//!     002 meta.json [en] (1 entry)
//! 004 meta.json [en] (3 entries)
//!
//! Active
//!     Route: /docs/getting-started
//!     Title: Getting Started
//! ```
//!
//! ## Check
//!
//! ```text
//! Checked pages/
//!     2 directories, 7 pages, 4 meta files
//!     Locales: en, fr
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::tree::PageTree;
use crate::types::{Directory, PageMapNode};
use std::collections::BTreeSet;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn locale_suffix(locale: Option<&str>) -> String {
    match locale {
        Some(l) => format!(" [{l}]"),
        None => String::new(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn walk(dir: &Directory, depth: usize, lines: &mut Vec<String>) {
    for (i, child) in dir.children.iter().enumerate() {
        let pos = format_index(i + 1);
        let pad = indent(depth);
        match child {
            PageMapNode::Directory(d) => {
                lines.push(format!("{pad}{pos} {}/ → {}", d.name, d.route));
                walk(d, depth + 1, lines);
            }
            PageMapNode::Page(p) => lines.push(format!(
                "{pad}{pos} {}{} → {}",
                p.name,
                locale_suffix(p.locale.as_deref()),
                p.route
            )),
            PageMapNode::MetaFile(m) => lines.push(format!(
                "{pad}{pos} {}{} ({})",
                m.name,
                locale_suffix(m.locale.as_deref()),
                plural(m.meta.len(), "entry", "entries")
            )),
        }
    }
}

/// Indented listing of a page map, one node per line.
pub fn format_page_map(dir: &Directory) -> Vec<String> {
    let mut lines = vec!["Page map".to_string()];
    walk(dir, 0, &mut lines);
    lines
}

/// Page map listing followed by the active route, when one was found.
pub fn format_tree_output(tree: &PageTree, page_map: &Directory) -> Vec<String> {
    let mut lines = format_page_map(page_map);
    if !tree.active_route.is_empty() {
        lines.push(String::new());
        lines.push("Active".to_string());
        lines.push(format!("{}Route: {}", indent(1), tree.active_route));
        lines.push(format!("{}Title: {}", indent(1), tree.active_route_title));
    }
    lines
}

pub fn print_tree_output(tree: &PageTree, page_map: &Directory) {
    for line in format_tree_output(tree, page_map) {
        println!("{}", line);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub directories: usize,
    pub pages: usize,
    pub meta_files: usize,
    pub locales: BTreeSet<String>,
}

/// Tally nodes below `dir`, not counting `dir` itself.
pub fn count(dir: &Directory) -> Counts {
    let mut counts = Counts::default();
    tally(dir, &mut counts);
    counts
}

fn tally(dir: &Directory, counts: &mut Counts) {
    for child in &dir.children {
        if let Some(locale) = child.locale() {
            counts.locales.insert(locale.to_string());
        }
        match child {
            PageMapNode::Directory(d) => {
                counts.directories += 1;
                tally(d, counts);
            }
            PageMapNode::Page(_) => counts.pages += 1,
            PageMapNode::MetaFile(_) => counts.meta_files += 1,
        }
    }
}

pub fn format_check_output(dir: &Directory, pages_dir: &Path) -> Vec<String> {
    let counts = count(dir);
    let mut lines = vec![format!("Checked {}/", pages_dir.display())];
    lines.push(format!(
        "{}{}, {}, {}",
        indent(1),
        plural(counts.directories, "directory", "directories"),
        plural(counts.pages, "page", "pages"),
        plural(counts.meta_files, "meta file", "meta files")
    ));
    if !counts.locales.is_empty() {
        let locales: Vec<&str> = counts.locales.iter().map(String::as_str).collect();
        lines.push(format!("{}Locales: {}", indent(1), locales.join(", ")));
    }
    lines
}

pub fn print_check_output(dir: &Directory, pages_dir: &Path) {
    for line in format_check_output(dir, pages_dir) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{dir, meta, page, subdir};

    fn sample() -> Directory {
        dir(
            "pages",
            "/",
            vec![
                page("about", "/about", Some("en")),
                page("about", "/about", None),
                subdir(
                    "docs",
                    "/docs",
                    vec![
                        page("intro", "/docs/intro", Some("fr")),
                        meta(Some("fr"), &[("intro", "Intro")]),
                    ],
                ),
                meta(None, &[("about", "About"), ("docs", "Docs")]),
            ],
        )
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn page_map_lines_nest_directories() {
        let lines = format_page_map(&sample());
        assert_eq!(
            lines,
            vec![
                "Page map",
                "001 about [en] → /about",
                "002 about → /about",
                "003 docs/ → /docs",
                "    001 intro [fr] → /docs/intro",
                "    002 meta.json [fr] (1 entry)",
                "004 meta.json (2 entries)",
            ]
        );
    }

    #[test]
    fn tree_output_appends_active_route() {
        let tree = PageTree {
            root: sample(),
            active_route: "/docs/intro".to_string(),
            active_route_title: "Intro".to_string(),
        };
        let lines = format_tree_output(&tree, &tree.root);
        let tail: Vec<&str> = lines.iter().rev().take(3).rev().map(String::as_str).collect();
        assert_eq!(tail, vec!["Active", "    Route: /docs/intro", "    Title: Intro"]);
    }

    #[test]
    fn tree_output_without_active_route() {
        let tree = PageTree {
            root: sample(),
            active_route: String::new(),
            active_route_title: String::new(),
        };
        let lines = format_tree_output(&tree, &tree.root);
        assert!(!lines.iter().any(|l| l == "Active"));
    }

    #[test]
    fn count_tallies_nested_nodes() {
        let counts = count(&sample());
        assert_eq!(counts.directories, 1);
        assert_eq!(counts.pages, 3);
        assert_eq!(counts.meta_files, 2);
        assert_eq!(
            counts.locales.into_iter().collect::<Vec<_>>(),
            vec!["en".to_string(), "fr".to_string()]
        );
    }

    #[test]
    fn check_output_summarizes() {
        let lines = format_check_output(&sample(), Path::new("pages"));
        assert_eq!(
            lines,
            vec![
                "Checked pages/",
                "    1 directory, 3 pages, 2 meta files",
                "    Locales: en, fr",
            ]
        );
    }

    #[test]
    fn check_output_omits_locales_when_none() {
        let empty = dir("pages", "/", vec![page("a", "/a", None)]);
        let lines = format_check_output(&empty, Path::new("pages"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "    0 directories, 1 page, 0 meta files");
    }
}
