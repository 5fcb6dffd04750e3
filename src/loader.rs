//! Per-file compilation entry point.
//!
//! The host build pipeline calls [`load`] once for every content file it
//! compiles and uses the returned string as that file's module source.
//!
//! ```text
//! pages/about.mdx ──► build page map ──► front matter ──► (search index)
//!                                                            │
//!          ┌──────────────────────────────┬─────────────────┘
//!          ▼                              ▼
//!   locale variants exist?          locale-tagged file?
//!   emit dispatcher module          filter page map for its locale
//!                                         │
//!                                         ▼
//!                                  emit page wrapper module
//! ```
//!
//! Every invocation rebuilds the page map from disk. The pages directory is
//! declared as a dependency so the host recompiles when the tree changes.

use crate::config::{BuildMode, SiteConfig};
use crate::dispatch::{self, RAW_QUERY};
use crate::filter::filter;
use crate::frontmatter;
use crate::generate::{self, GenerateError, PageModule};
use crate::naming;
use crate::search::{self, DEFAULT_LOCALE_KEY, IndexEntry, IndexError, SearchIndex};
use crate::siblings::{self, AnalyzeError};
use crate::tree::{self, TreeError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Page map error: {0}")]
    Tree(#[from] TreeError),
    #[error("Locale variant error: {0}")]
    Analyze(#[from] AnalyzeError),
    #[error("Search index error: {0}")]
    Index(#[from] IndexError),
    #[error("Module generation error: {0}")]
    Generate(#[from] GenerateError),
}

/// One file handed over by the host pipeline.
#[derive(Debug, Clone)]
pub struct LoaderRequest<'a> {
    /// Raw file contents
    pub source: &'a str,
    /// Absolute path of the file being compiled
    pub resource_path: &'a Path,
    /// Import query, e.g. `?pagemap-raw`, or empty
    pub resource_query: &'a str,
}

/// Settings shared by every invocation of one build.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub config: SiteConfig,
    pub project_root: PathBuf,
    pub mode: BuildMode,
}

impl LoaderOptions {
    pub fn pages_dir(&self) -> PathBuf {
        self.config.pages_path(&self.project_root)
    }
}

/// Callbacks into the host build pipeline.
pub trait Host {
    /// Recompile the current file whenever anything under `dir` changes.
    fn add_dependency(&mut self, dir: &Path);
}

/// Compile one content file into its module source.
pub fn load(
    request: &LoaderRequest,
    options: &LoaderOptions,
    host: &mut dyn Host,
    index: &SearchIndex,
) -> Result<String, LoaderError> {
    let config = &options.config;
    let pages_dir = options.pages_dir();
    host.add_dependency(&pages_dir);

    let page_tree = tree::build(&pages_dir, request.resource_path)?;
    let front_matter = frontmatter::extract(request.source);

    let filename = request
        .resource_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_locale = naming::locale_of(&filename);

    if options.mode == BuildMode::Production
        && config.search.enabled
        && naming::is_markup_file(&filename)
    {
        let title = front_matter
            .data
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or(&page_tree.active_route_title);
        let entry = IndexEntry::new(
            title,
            page_tree.active_route.as_str(),
            search::plain_text(&front_matter.body),
        );
        index.add(file_locale.unwrap_or(DEFAULT_LOCALE_KEY), entry)?;
    }

    let Some(theme) = &config.theme else {
        log::error!(
            "no theme configured, {} is emitted without a layout",
            request.resource_path.display()
        );
        return Ok(request.source.to_string());
    };

    let default_locale = config.i18n.default_locale.as_deref();
    let mut page_map = page_tree.root;

    if config.i18n.enabled() {
        if !request.resource_query.contains(RAW_QUERY) && file_locale.is_none() {
            let descriptor = siblings::analyze(request.resource_path, default_locale)?;
            if !descriptor.is_empty() {
                log::debug!(
                    "dispatching {} across {} locale variants",
                    filename,
                    descriptor.files.len()
                );
                return Ok(dispatch::generate(&descriptor));
            }
        }
        if let Some(locale) = file_locale {
            page_map = filter(&page_map, locale, default_locale.unwrap_or(""));
        }
    }

    let theme = generate::resolve_specifier(theme, &options.project_root);
    let theme_config = config
        .theme_config
        .as_deref()
        .map(|c| generate::resolve_specifier(c, &options.project_root));

    let module = PageModule {
        theme: &theme,
        theme_config: theme_config.as_deref(),
        ssg_module: &config.ssg_module,
        filename: &filename,
        route: &page_tree.active_route,
        meta: &front_matter.data,
        page_map: &page_map.children,
        body: &front_matter.body,
    };
    Ok(generate::generate_page_module(&module)?)
}
