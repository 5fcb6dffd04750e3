//! Project configuration module.
//!
//! Handles loading, validating, and merging `pagemap.toml`. Stock defaults are
//! overridden by the user file at the project root.
//!
//! ## Config File Location
//!
//! ```text
//! my-site/
//! ├── pagemap.toml          # Project config (overrides stock defaults)
//! ├── theme.config.js
//! └── pages/
//!     ├── index.en.mdx
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! pages_dir = "pages"              # Content root, relative to the project root
//! # theme = "pagemap-theme-docs"   # Layout module (package name or ./path)
//! # theme_config = "./theme.config.js"
//! ssg_module = "pagemap/ssg"       # Module providing withSSG
//!
//! [i18n]
//! locales = []                     # e.g. ["en", "fr"]
//! # default_locale = "en"
//!
//! [search]
//! enabled = false                  # Write search index files in production
//! output_dir = ".next/static"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up in the project root.
pub const CONFIG_FILE: &str = "pagemap.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `pagemap.toml`.
///
/// All fields have defaults; user files specify only what they override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content root directory, relative to the project root.
    pub pages_dir: String,
    /// Theme layout module. Without one, pages are emitted unwrapped.
    pub theme: Option<String>,
    /// Theme configuration module passed to the layout.
    pub theme_config: Option<String>,
    /// Module exporting the `withSSG` helper.
    pub ssg_module: String,
    /// Locale routing.
    pub i18n: I18nConfig,
    /// Search index generation.
    pub search: SearchConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            pages_dir: "pages".to_string(),
            theme: None,
            theme_config: None,
            ssg_module: "pagemap/ssg".to_string(),
            i18n: I18nConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "pages_dir must not be empty".into(),
            ));
        }
        if self.ssg_module.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ssg_module must not be empty".into(),
            ));
        }
        if let Some(default) = &self.i18n.default_locale
            && !self.i18n.locales.is_empty()
            && !self.i18n.locales.contains(default)
        {
            return Err(ConfigError::Validation(format!(
                "i18n.default_locale \"{default}\" is not one of i18n.locales {:?}",
                self.i18n.locales
            )));
        }
        Ok(())
    }

    /// Absolute content root for a project rooted at `project_root`.
    pub fn pages_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.pages_dir)
    }

    /// Absolute search index output directory.
    pub fn search_output_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.search.output_dir)
    }
}

/// Locale routing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    /// Locales the site is published in. Empty disables locale routing.
    pub locales: Vec<String>,
    /// Locale served when a page has no variant for the request locale.
    pub default_locale: Option<String>,
}

impl I18nConfig {
    pub fn enabled(&self) -> bool {
        !self.locales.is_empty()
    }
}

/// Search index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Write per-locale index files during production builds.
    pub enabled: bool,
    /// Directory the index files are written to, relative to the project root.
    pub output_dir: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: ".next/static".to_string(),
        }
    }
}

/// Build mode of one invocation. Search indexing only runs in production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

/// Stock defaults as a TOML value, the base every user file merges onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `pagemap.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `pagemap.toml` in the project root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `pagemap.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pagemap configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Content root, relative to the project root.
pages_dir = "pages"

# Layout module every page is wrapped in. Values starting with "." or "/"
# are paths relative to the project root; anything else is a package name.
# Without a theme, pages are emitted unwrapped.
# theme = "pagemap-theme-docs"

# Module whose default export is passed to the layout as its config.
# theme_config = "./theme.config.js"

# Module exporting the withSSG static-generation helper.
ssg_module = "pagemap/ssg"

# ---------------------------------------------------------------------------
# Locale routing
# ---------------------------------------------------------------------------
[i18n]
# Locales the site is published in, e.g. ["en", "fr"].
# Leave empty to disable locale routing.
locales = []

# Locale served when a page has no variant for the request locale.
# Must be one of `locales`.
# default_locale = "en"

# ---------------------------------------------------------------------------
# Search index (production builds only)
# ---------------------------------------------------------------------------
[search]
# Write one stork-<locale>.toml index descriptor per locale.
enabled = false

# Output directory for the index files, relative to the project root.
output_dir = ".next/static"
"##
}
