//! Locale variant discovery for one logical page.
//!
//! Given `pages/about.mdx`, the variant group is every sibling named
//! `about.<locale>.<ext>`: `about.en.mdx`, `about.fr.tsx`, and so on. Each
//! variant is read and classified for the two data-fetching exports a page
//! may carry, which decides what the dispatcher module has to wire up.
//!
//! ## Export detection
//!
//! Detection is a line-anchored textual match, not a parse:
//!
//! ```text
//! export async function getStaticProps(ctx) { ... }   ✓
//! export const getStaticProps = async () => ...       ✓
//! export function getServerSideProps (ctx) { ... }    ✓
//!   export const getStaticProps = ...                 ✗ (indented)
//! export * from './data'                              ✗ (re-export)
//! ```
//!
//! Declarations nested inside blocks, or brought in by `export *`, are
//! missed. Pages relying on those must export the function directly.

use crate::naming;
use crate::tree::{list_dir, read_lossy};
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File has no parent directory: {0}")]
    NoParent(PathBuf),
    #[error("Invalid variant pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Request-time data fetching export (`getServerSideProps`).
static SERVER_FETCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^export .+ getServerSideProps[= (]").unwrap());

/// Build-time data fetching export (`getStaticProps`).
static STATIC_FETCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^export .+ getStaticProps[= (]").unwrap());

/// One member of a locale variant group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleVariant {
    /// File name, e.g. `about.fr.mdx`
    pub name: String,
    pub locale: String,
    pub has_server_fetch: bool,
    pub has_static_fetch: bool,
}

/// Analyzed summary of a locale variant group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchDescriptor {
    pub files: Vec<LocaleVariant>,
    /// Index into `files` of the default-locale variant, or 0 if absent
    pub default_index: usize,
    pub has_any_server_fetch: bool,
    pub has_any_static_fetch: bool,
}

impl DispatchDescriptor {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Scan the directory of `file_path` for its locale variants.
pub fn analyze(file_path: &Path, default_locale: Option<&str>) -> Result<DispatchDescriptor, AnalyzeError> {
    let dir = containing_dir(file_path)?;
    let filename = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let variant_re = Regex::new(&format!(
        r"^{}\.([a-zA-Z-]+)\.(?:mdx?|jsx?|tsx?)$",
        regex::escape(naming::remove_extension(&filename))
    ))?;

    let matched: Vec<(PathBuf, String, String)> = list_dir(dir)?
        .into_iter()
        .filter(|entry| !entry.is_dir)
        .filter_map(|entry| {
            let locale = variant_re.captures(&entry.name)?.get(1)?.as_str().to_string();
            Some((entry.path, entry.name, locale))
        })
        .collect();

    let files = matched
        .into_par_iter()
        .map(|(path, name, locale)| -> Result<LocaleVariant, AnalyzeError> {
            let content = read_lossy(&path)?;
            Ok(LocaleVariant {
                has_server_fetch: SERVER_FETCH_RE.is_match(&content),
                has_static_fetch: STATIC_FETCH_RE.is_match(&content),
                name,
                locale,
            })
        })
        .collect::<Result<Vec<_>, AnalyzeError>>()?;

    let default_index = default_locale
        .and_then(|default| files.iter().position(|f| f.locale == default))
        .unwrap_or(0);

    let descriptor = DispatchDescriptor {
        has_any_server_fetch: files.iter().any(|f| f.has_server_fetch),
        has_any_static_fetch: files.iter().any(|f| f.has_static_fetch),
        default_index,
        files,
    };
    log::debug!(
        "{} locale variants for {}",
        descriptor.files.len(),
        file_path.display()
    );
    Ok(descriptor)
}

/// Directory holding `file_path`; a bare file name lives in `.`.
fn containing_dir(file_path: &Path) -> Result<&Path, AnalyzeError> {
    match file_path.parent() {
        Some(dir) if dir.as_os_str().is_empty() => Ok(Path::new(".")),
        Some(dir) => Ok(dir),
        None => Err(AnalyzeError::NoParent(file_path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::site;

    fn locales(d: &DispatchDescriptor) -> Vec<&str> {
        d.files.iter().map(|f| f.locale.as_str()).collect()
    }

    #[test]
    fn finds_same_base_variants_in_order() {
        let tmp = site(&[
            ("about.mdx", ""),
            ("about.fr.mdx", ""),
            ("about.en.tsx", ""),
            ("about-us.en.mdx", ""),
            ("aboutx.en.mdx", ""),
            ("about.en.json", "{}"),
            ("other.en.mdx", ""),
        ]);
        let d = analyze(&tmp.path().join("about.mdx"), Some("en")).unwrap();

        assert_eq!(locales(&d), vec!["en", "fr"]);
        assert_eq!(d.files[0].name, "about.en.tsx");
        assert_eq!(d.default_index, 0);
    }

    #[test]
    fn default_index_points_at_default_locale() {
        let tmp = site(&[("a.de.mdx", ""), ("a.en.mdx", ""), ("a.fr.mdx", "")]);
        let d = analyze(&tmp.path().join("a.mdx"), Some("fr")).unwrap();

        assert_eq!(locales(&d), vec!["de", "en", "fr"]);
        assert_eq!(d.default_index, 2);
    }

    #[test]
    fn default_index_is_zero_when_default_absent() {
        let tmp = site(&[("a.en.mdx", ""), ("a.fr.mdx", "")]);
        let d = analyze(&tmp.path().join("a.mdx"), Some("de")).unwrap();
        assert_eq!(d.default_index, 0);

        let d = analyze(&tmp.path().join("a.mdx"), None).unwrap();
        assert_eq!(d.default_index, 0);
    }

    #[test]
    fn detects_both_fetch_kinds_across_spacings() {
        let tmp = site(&[
            ("p.en.mdx", "# En\n\nexport async function getStaticProps(ctx) {\n  return { props: {} }\n}\n"),
            ("p.fr.mdx", "export const getServerSideProps = async () => ({ props: {} })\n"),
            ("p.de.js", "export function getStaticProps (ctx) {}\n"),
        ]);
        let d = analyze(&tmp.path().join("p.mdx"), Some("en")).unwrap();

        let de = &d.files[0];
        assert_eq!(de.locale, "de");
        assert!(de.has_static_fetch && !de.has_server_fetch);
        let en = &d.files[1];
        assert!(en.has_static_fetch && !en.has_server_fetch);
        let fr = &d.files[2];
        assert!(fr.has_server_fetch && !fr.has_static_fetch);
        assert!(d.has_any_server_fetch);
        assert!(d.has_any_static_fetch);
    }

    #[test]
    fn indented_and_star_reexports_are_missed() {
        let tmp = site(&[
            ("p.en.mdx", "  export const getStaticProps = () => ({})\n"),
            ("p.fr.mdx", "export * from './data'\n"),
            ("p.de.mdx", "const getStaticProps = 1\n"),
        ]);
        let d = analyze(&tmp.path().join("p.mdx"), None).unwrap();

        assert!(!d.has_any_static_fetch);
        assert!(!d.has_any_server_fetch);
    }

    #[test]
    fn mention_in_prose_is_not_an_export() {
        let tmp = site(&[("p.en.mdx", "Use getStaticProps to fetch data.\n")]);
        let d = analyze(&tmp.path().join("p.mdx"), None).unwrap();
        assert!(!d.files[0].has_static_fetch);
    }

    #[test]
    fn no_variants_yields_empty_descriptor() {
        let tmp = site(&[("solo.mdx", "")]);
        let d = analyze(&tmp.path().join("solo.mdx"), Some("en")).unwrap();
        assert!(d.is_empty());
        assert_eq!(d, DispatchDescriptor::default());
    }

    #[test]
    fn base_name_is_matched_literally() {
        let tmp = site(&[("a+b.en.mdx", ""), ("aab.en.mdx", "")]);
        let d = analyze(&tmp.path().join("a+b.mdx"), None).unwrap();
        assert_eq!(d.files.len(), 1);
        assert_eq!(d.files[0].name, "a+b.en.mdx");
    }

    #[test]
    fn bare_file_name_resolves_to_current_dir() {
        assert_eq!(containing_dir(Path::new("about.mdx")).unwrap(), Path::new("."));
        assert_eq!(containing_dir(Path::new("pages/about.mdx")).unwrap(), Path::new("pages"));
        assert!(matches!(containing_dir(Path::new("/")), Err(AnalyzeError::NoParent(_))));
    }

    #[test]
    fn dot_component_in_path_finds_variants() {
        let tmp = site(&[("about.mdx", ""), ("about.en.mdx", "")]);
        let relative = tmp.path().join(".").join("about.mdx");
        let d = analyze(&relative, Some("en")).unwrap();
        assert_eq!(locales(&d), vec!["en"]);
    }

    #[test]
    fn invalid_utf8_variant_is_still_classified() {
        let tmp = site(&[("p.en.mdx", "")]);
        std::fs::write(
            tmp.path().join("p.fr.mdx"),
            b"# Caf\xe9\n\nexport const getStaticProps = () => ({ props: {} })\n",
        )
        .unwrap();
        let d = analyze(&tmp.path().join("p.mdx"), Some("en")).unwrap();

        assert_eq!(locales(&d), vec!["en", "fr"]);
        assert!(d.files[1].has_static_fetch);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = analyze(&tmp.path().join("gone/a.mdx"), None);
        assert!(matches!(result, Err(AnalyzeError::Io(_))));
    }
}
