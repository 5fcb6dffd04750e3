//! Page wrapper module generation.
//!
//! A normal compilation turns a page body into a module that hands the body,
//! together with everything the theme needs to render navigation, to the
//! theme's layout:
//!
//! ```text
//! import withLayout from "pagemap-theme-docs"
//! import { withSSG } from "pagemap/ssg"
//! import layoutConfig from "/site/theme.config.js"
//!
//! # Page body, front matter stripped
//!
//! export default function LayoutPage (props) {
//!   return withSSG(withLayout({
//!     filename: "intro.mdx",
//!     route: "/docs/intro",
//!     meta: {"title":"Intro"},
//!     pageMap: [...]
//!   }, layoutConfig))(props)
//! }
//! ```
//!
//! The route, front matter and page map are embedded as JSON literals, which
//! are valid JavaScript expressions.

use crate::naming;
use crate::types::{Metadata, PageMapNode};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a wrapped page module embeds.
#[derive(Debug, Clone)]
pub struct PageModule<'a> {
    /// Resolved theme module specifier
    pub theme: &'a str,
    /// Resolved theme config module specifier, if configured
    pub theme_config: Option<&'a str>,
    /// Module providing the `withSSG` helper
    pub ssg_module: &'a str,
    /// File name of the compiled page
    pub filename: &'a str,
    pub route: &'a str,
    pub meta: &'a Metadata,
    pub page_map: &'a [PageMapNode],
    pub body: &'a str,
}

/// Resolve a configured module reference.
///
/// Values starting with `.` or `/` are paths relative to the project root;
/// anything else is a package name passed through untouched.
pub fn resolve_specifier(value: &str, project_root: &Path) -> String {
    if value.starts_with('.') || value.starts_with('/') {
        let joined = project_root.join(value);
        naming::slash(&normalize(&joined))
    } else {
        value.to_string()
    }
}

/// Drop `.` components and fold `..` without touching the filesystem.
fn normalize(path: &Path) -> String {
    use std::path::Component;

    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(parts.last(), Some(Component::Normal(_))) =>
            {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts
        .iter()
        .collect::<std::path::PathBuf>()
        .to_string_lossy()
        .to_string()
}

pub fn generate_page_module(page: &PageModule) -> Result<String, GenerateError> {
    let mut out = String::new();
    out.push_str(&format!("import withLayout from {}\n", js_string(page.theme)?));
    out.push_str(&format!(
        "import {{ withSSG }} from {}\n",
        js_string(page.ssg_module)?
    ));
    if let Some(config) = page.theme_config {
        out.push_str(&format!("import layoutConfig from {}\n", js_string(config)?));
    }

    out.push('\n');
    out.push_str(page.body);
    out.push_str("\n\n");

    out.push_str("export default function LayoutPage (props) {\n");
    out.push_str("  return withSSG(withLayout({\n");
    out.push_str(&format!(
        "    filename: {},\n",
        js_string(&naming::slash(page.filename))?
    ));
    out.push_str(&format!(
        "    route: {},\n",
        js_string(&naming::slash(page.route))?
    ));
    out.push_str(&format!("    meta: {},\n", serde_json::to_string(page.meta)?));
    out.push_str(&format!(
        "    pageMap: {}\n",
        serde_json::to_string(page.page_map)?
    ));
    out.push_str(&format!(
        "  }}, {}))(props)\n}}\n",
        if page.theme_config.is_some() {
            "layoutConfig"
        } else {
            "null"
        }
    ));
    Ok(out)
}

fn js_string(value: &str) -> Result<String, GenerateError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::page;
    use serde_json::json;

    fn module<'a>(meta: &'a Metadata, page_map: &'a [PageMapNode]) -> PageModule<'a> {
        PageModule {
            theme: "pagemap-theme-docs",
            theme_config: None,
            ssg_module: "pagemap/ssg",
            filename: "intro.mdx",
            route: "/docs/intro",
            meta,
            page_map,
            body: "# Intro",
        }
    }

    #[test]
    fn wraps_body_with_layout_and_ssg() {
        let meta = Metadata::new();
        let src = generate_page_module(&module(&meta, &[])).unwrap();

        assert!(src.starts_with(
            "import withLayout from \"pagemap-theme-docs\"\nimport { withSSG } from \"pagemap/ssg\"\n\n# Intro\n\n"
        ));
        assert!(src.contains("    filename: \"intro.mdx\",\n"));
        assert!(src.contains("    route: \"/docs/intro\",\n"));
        assert!(src.contains("    meta: {},\n"));
        assert!(src.contains("    pageMap: []\n"));
        assert!(src.ends_with("  }, null))(props)\n}\n"));
    }

    #[test]
    fn theme_config_is_imported_and_passed() {
        let meta = Metadata::new();
        let mut m = module(&meta, &[]);
        m.theme_config = Some("/site/theme.config.js");
        let src = generate_page_module(&m).unwrap();

        assert!(src.contains("import layoutConfig from \"/site/theme.config.js\"\n"));
        assert!(src.ends_with("  }, layoutConfig))(props)\n}\n"));
    }

    #[test]
    fn meta_and_page_map_are_json_literals() {
        let meta: Metadata = serde_json::from_value(json!({ "title": "Intro", "tags": ["a"] })).unwrap();
        let map = vec![page("intro", "/docs/intro", Some("en"))];
        let src = generate_page_module(&module(&meta, &map)).unwrap();

        assert!(src.contains(r#"    meta: {"title":"Intro","tags":["a"]},"#));
        assert!(src.contains(r#"    pageMap: [{"name":"intro","route":"/docs/intro","locale":"en"}]"#));
    }

    #[test]
    fn windows_separators_are_normalized() {
        let meta = Metadata::new();
        let mut m = module(&meta, &[]);
        m.filename = r"docs\intro.mdx";
        let src = generate_page_module(&m).unwrap();
        assert!(src.contains("    filename: \"docs/intro.mdx\",\n"));
    }

    #[test]
    fn relative_specifiers_resolve_against_project_root() {
        let root = Path::new("/site");
        assert_eq!(resolve_specifier("./theme", root), "/site/theme");
        assert_eq!(resolve_specifier("../shared/theme.js", root), "/shared/theme.js");
        assert_eq!(resolve_specifier("/abs/theme", root), "/abs/theme");
        assert_eq!(resolve_specifier("pagemap-theme-docs", root), "pagemap-theme-docs");
        assert_eq!(resolve_specifier("@scope/theme", root), "@scope/theme");
    }
}
