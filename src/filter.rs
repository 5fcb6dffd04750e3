//! Locale fallback filtering.
//!
//! Collapses a multi-locale page map into the map one locale sees. Within
//! each directory, non-directory siblings sharing a `name` are locale
//! variants of one logical entry; for every name the filter keeps either the
//! variants that match the request locale exactly, or a single fallback.
//!
//! ## Matching
//!
//! A node matches exactly when its locale equals the request locale, or when
//! it has no locale and the request is for the default locale. An exact match
//! *resolves* its name for the rest of the directory: no fallback is emitted
//! for it, even if the fallback candidate was seen first.
//!
//! ## Fallback
//!
//! A locale-less or default-locale node becomes the fallback candidate for an
//! unresolved name, overwriting any earlier candidate. The last qualifying
//! node in enumeration order therefore wins, which lets `a.md` and `a.en.md`
//! coexist with the later file taking precedence.
//!
//! Exact matches are emitted in place; fallbacks are appended after the pass
//! in the order their names were first seen. Directories are never filtered
//! themselves, only recursed into.

use crate::types::{Directory, PageMapNode};
use std::collections::HashMap;

/// Per-name bookkeeping for one directory pass.
#[derive(Debug, Default)]
struct Slot<'a> {
    resolved: bool,
    fallback: Option<&'a PageMapNode>,
}

/// Filter `tree` down to what `locale` sees, falling back to `default_locale`.
///
/// An empty `locale` means no locale was requested, and the map comes back
/// unfiltered.
pub fn filter(tree: &Directory, locale: &str, default_locale: &str) -> Directory {
    if locale.is_empty() {
        return tree.clone();
    }
    Directory {
        name: tree.name.clone(),
        children: filter_children(&tree.children, locale, default_locale),
        route: tree.route.clone(),
    }
}

fn filter_children(children: &[PageMapNode], locale: &str, default_locale: &str) -> Vec<PageMapNode> {
    let is_default_locale = locale == default_locale;

    let mut output = Vec::with_capacity(children.len());
    // Names in first-seen order, with their slot
    let mut order: Vec<&str> = Vec::new();
    let mut slots: HashMap<&str, Slot<'_>> = HashMap::new();

    for node in children {
        if let PageMapNode::Directory(dir) = node {
            output.push(PageMapNode::Directory(filter(dir, locale, default_locale)));
            continue;
        }

        let node_locale = node.locale();
        let is_exact = node_locale == Some(locale) || (node_locale.is_none() && is_default_locale);

        if is_exact {
            slot_for(&mut slots, &mut order, node.name()).resolved = true;
            output.push(node.clone());
            continue;
        }

        let qualifies = node_locale.is_none() || node_locale == Some(default_locale);
        if qualifies && !slots.get(node.name()).is_some_and(|slot| slot.resolved) {
            slot_for(&mut slots, &mut order, node.name()).fallback = Some(node);
        }
    }

    for name in order {
        if let Some(Slot {
            resolved: false,
            fallback: Some(node),
        }) = slots.get(name)
        {
            output.push((*node).clone());
        }
    }

    output
}

fn slot_for<'a, 'm>(
    slots: &'m mut HashMap<&'a str, Slot<'a>>,
    order: &mut Vec<&'a str>,
    name: &'a str,
) -> &'m mut Slot<'a> {
    slots.entry(name).or_insert_with(|| {
        order.push(name);
        Slot::default()
    })
}
