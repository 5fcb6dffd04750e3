//! # pagemap
//!
//! Build-time compiler for locale-aware content sites. A directory of content
//! files becomes a route tree (the *page map*), and every content file is
//! compiled into a module that hands its body, front matter and the page map
//! to the site's theme.
//!
//! # Architecture: One Invocation Per File
//!
//! The host build pipeline calls [`loader::load`] for each content file it
//! compiles. Every invocation rebuilds the page map from disk, so no state is
//! shared between invocations except the caller-owned [`search::SearchIndex`]:
//!
//! ```text
//! pages/                       tree::build        filter::filter
//! ├── index.en.mdx     ──►     page map      ──►  page map for one locale
//! ├── index.fr.mdx               │                      │
//! ├── meta.en.json               │                      ▼
//! └── docs/                      │             generate::generate_page_module
//!     └── intro.en.mdx           ▼
//!                      siblings::analyze ──► dispatch::generate
//!                      (locale-less entry with locale variants)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Locale tags, route segments and extension handling for file names |
//! | [`types`] | Page map node types, serialized into generated modules |
//! | [`frontmatter`] | YAML front matter split from markup bodies |
//! | [`tree`] | Recursive page map builder with active route and title resolution |
//! | [`filter`] | Collapses a multi-locale page map into the map one locale sees |
//! | [`siblings`] | Finds a page's locale variants and their data-fetching exports |
//! | [`dispatch`] | Emits the module that picks a locale variant at runtime |
//! | [`generate`] | Emits the page wrapper module around a compiled body |
//! | [`search`] | Per-locale full-text search index files for production builds |
//! | [`loader`] | Per-file entry point tying the above together |
//! | [`config`] | `pagemap.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Listing Order Is Navigation Order
//!
//! Children appear in the byte-wise order of their file names. Nothing sorts
//! by title or prefix afterwards: navigation and locale fallback precedence
//! both follow this order, so it must not depend on which concurrent read
//! finished first. Sibling reads run on rayon and are collected in input order.
//!
//! ## Locale Fallback
//!
//! A page map holding `about.mdx`, `about.en.mdx` and `about.fr.mdx` is
//! collapsed per request locale: an exact locale match always wins, otherwise
//! the last locale-less or default-locale node in listing order stands in.
//! See [`filter`] for the exact rules.
//!
//! ## Dispatch Modules
//!
//! A locale-less entry whose content only exists as locale variants compiles
//! to a small dispatcher. Its variant imports carry the `?pagemap-raw` query so
//! the variants themselves compile to ordinary page wrappers.

pub mod config;
pub mod dispatch;
pub mod filter;
pub mod frontmatter;
pub mod generate;
pub mod loader;
pub mod naming;
pub mod output;
pub mod search;
pub mod siblings;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
