//! Full-text search index side files.
//!
//! Production builds describe every indexed page to an external full-text
//! indexer through one configuration file per locale:
//!
//! ```text
//! .next/static/
//! ├── stork-default.toml   # pages without a locale tag
//! ├── stork-en.toml
//! └── stork-fr.toml
//! ```
//!
//! Each file lists one `[[input.files]]` block per page:
//!
//! ```toml
//! [input]
//! frontmatter_handling = "Omit"
//!
//! [[input.files]]
//! title = "Getting Started"
//! url = "/docs/getting-started"
//! contents = "Getting Started Install the package..."
//! filetype = "PlainText"
//! ```
//!
//! # Design
//!
//! The host pipeline compiles pages concurrently, so the index is an explicit
//! accumulator owned by the caller rather than process-wide state. The
//! per-locale index is created the first time its locale is seen, and its
//! file is rewritten in full on every accepted update. Each locale has its own
//! lock: writers on one locale serialize, different locales proceed in
//! parallel.
//!
//! Entries are keyed by URL. Recompiling a page replaces its entry in place;
//! an identical entry (same SHA-256 digest) is a no-op and does not touch the
//! file.

use pulldown_cmark::{Event, Parser, TagEnd};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML serialize error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Locale key for pages without a locale tag.
pub const DEFAULT_LOCALE_KEY: &str = "default";

/// One indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub title: String,
    pub url: String,
    pub contents: String,
    pub filetype: String,
}

impl IndexEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            contents: contents.into(),
            filetype: "PlainText".to_string(),
        }
    }

    fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for field in [&self.title, &self.url, &self.contents, &self.filetype] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Serialize)]
struct IndexFile<'a> {
    input: IndexInput<'a>,
}

#[derive(Serialize)]
struct IndexInput<'a> {
    frontmatter_handling: &'static str,
    files: &'a [IndexEntry],
}

#[derive(Debug, Default)]
struct LocaleIndex {
    entries: Vec<IndexEntry>,
    /// url → (position in `entries`, digest)
    by_url: HashMap<String, (usize, String)>,
}

/// Accumulates index entries per locale and keeps their files current.
#[derive(Debug)]
pub struct SearchIndex {
    output_dir: PathBuf,
    locales: Mutex<HashMap<String, Arc<Mutex<LocaleIndex>>>>,
}

impl SearchIndex {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            locales: Mutex::new(HashMap::new()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the index file for `locale`.
    pub fn file_path(&self, locale: &str) -> PathBuf {
        self.output_dir.join(format!("stork-{locale}.toml"))
    }

    /// Locales seen so far, sorted.
    pub fn locales(&self) -> Vec<String> {
        let locales = self.locales.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = locales.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Add or replace the entry for `entry.url` under `locale` and flush.
    ///
    /// Returns `false` when an identical entry was already present and
    /// nothing was written.
    pub fn add(&self, locale: &str, entry: IndexEntry) -> Result<bool, IndexError> {
        let index = {
            let mut locales = self.locales.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locales.entry(locale.to_string()).or_default())
        };
        let mut index = index.lock().unwrap_or_else(PoisonError::into_inner);

        let digest = entry.digest();
        match index.by_url.get(&entry.url).cloned() {
            Some((_, existing)) if existing == digest => return Ok(false),
            Some((position, _)) => {
                index.by_url.insert(entry.url.clone(), (position, digest));
                index.entries[position] = entry;
            }
            None => {
                let position = index.entries.len();
                index.by_url.insert(entry.url.clone(), (position, digest));
                index.entries.push(entry);
            }
        }

        self.flush(locale, &index.entries)?;
        Ok(true)
    }

    fn flush(&self, locale: &str, entries: &[IndexEntry]) -> Result<(), IndexError> {
        let file = IndexFile {
            input: IndexInput {
                frontmatter_handling: "Omit",
                files: entries,
            },
        };
        let body = toml::to_string(&file)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.file_path(locale);
        fs::write(&path, body)?;
        log::debug!("search index {} now has {} entries", path.display(), entries.len());
        Ok(())
    }
}

/// Reduce a markup body to the plain text the indexer ingests.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::new();
    for event in Parser::new(markup) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => out.push('\n'),
            _ => {}
        }
    }
    out.trim().to_string()
}
