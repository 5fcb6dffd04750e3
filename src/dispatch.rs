//! Locale dispatch module generation.
//!
//! When a logical page exists only as locale variants (`about.en.mdx`,
//! `about.fr.mdx`), the host still requests the locale-less `about` entry.
//! This module emits the source that entry compiles to: a page that picks
//! the variant for the active locale at render time, plus, when any variant
//! fetches data, a fetch function that dispatches the same way.
//!
//! ```text
//! import { useRouter } from 'next/router'
//! import Page_0, { getStaticProps as page_data_0 } from "./about.en.mdx?pagemap-raw"
//! import Page_1 from "./about.fr.mdx?pagemap-raw"
//!
//! export default function LocalizedPage (props) {
//!   const { locale } = useRouter()
//!   if (locale === "en") {
//!     return <Page_0 {...props}/>
//!   } else if (locale === "fr") {
//!     return <Page_1 {...props}/>
//!   } else {
//!     return <Page_0 {...props}/>
//!   }
//! }
//!
//! export async function getStaticProps (context) {
//!   const locale = context.locale
//!   if (locale === "en") {
//!     return page_data_0(context)
//!   } else if (locale === "fr") {
//!     return { props: {} }
//!   } else {
//!     return page_data_0(context)
//!   }
//! }
//! ```
//!
//! Variants are imported with the raw query so that their own compilation
//! produces a wrapped page instead of another dispatcher.

use crate::siblings::{DispatchDescriptor, LocaleVariant};

/// Resource query marking a variant import that must not be dispatched again.
pub const RAW_QUERY: &str = "pagemap-raw";

/// Data-fetching export a dispatcher forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Build-time `getStaticProps`
    Static,
    /// Request-time `getServerSideProps`
    Server,
}

impl FetchKind {
    pub fn export_name(self) -> &'static str {
        match self {
            FetchKind::Static => "getStaticProps",
            FetchKind::Server => "getServerSideProps",
        }
    }

    fn provided_by(self, variant: &LocaleVariant) -> bool {
        match self {
            FetchKind::Static => variant.has_static_fetch,
            FetchKind::Server => variant.has_server_fetch,
        }
    }
}

/// The fetch export the dispatcher emits. Static fetching wins over server
/// fetching; `None` means no fetch export at all.
pub fn fetch_kind(descriptor: &DispatchDescriptor) -> Option<FetchKind> {
    if descriptor.has_any_static_fetch {
        Some(FetchKind::Static)
    } else if descriptor.has_any_server_fetch {
        Some(FetchKind::Server)
    } else {
        None
    }
}

/// Emit the dispatcher module source for a variant group.
pub fn generate(descriptor: &DispatchDescriptor) -> String {
    if descriptor.files.is_empty() {
        return "export default function LocalizedPage () {\n  return null\n}\n".to_string();
    }

    let kind = fetch_kind(descriptor);
    let mut out = String::from("import { useRouter } from 'next/router'\n");

    for (index, file) in descriptor.files.iter().enumerate() {
        let fetch_import = match kind {
            Some(kind) if kind.provided_by(file) => {
                format!(", {{ {} as page_data_{index} }}", kind.export_name())
            }
            _ => String::new(),
        };
        out.push_str(&format!(
            "import Page_{index}{fetch_import} from {}\n",
            js_string(&format!("./{}?{RAW_QUERY}", file.name))
        ));
    }

    out.push_str("\nexport default function LocalizedPage (props) {\n");
    out.push_str("  const { locale } = useRouter()\n");
    out.push_str(&locale_chain(descriptor, |index, _| {
        format!("return <Page_{index} {{...props}}/>")
    }));
    out.push_str("}\n");

    if let Some(kind) = kind {
        out.push_str(&format!(
            "\nexport async function {} (context) {{\n",
            kind.export_name()
        ));
        out.push_str("  const locale = context.locale\n");
        out.push_str(&locale_chain(descriptor, |index, file| {
            if kind.provided_by(file) {
                format!("return page_data_{index}(context)")
            } else {
                "return { props: {} }".to_string()
            }
        }));
        out.push_str("}\n");
    }

    out
}

/// `if (locale === ...) { ... } else if ... else { <default> }`, resolving
/// each locale to the first variant that carries it.
fn locale_chain(
    descriptor: &DispatchDescriptor,
    branch: impl Fn(usize, &LocaleVariant) -> String,
) -> String {
    let mut out = String::new();
    for (index, file) in descriptor.files.iter().enumerate() {
        let keyword = if index == 0 { "  if" } else { " else if" };
        out.push_str(&format!(
            "{keyword} (locale === {}) {{\n    {}\n  }}",
            js_string(&file.locale),
            branch(index, file)
        ));
    }
    let default_index = descriptor.default_index.min(descriptor.files.len() - 1);
    out.push_str(&format!(
        " else {{\n    {}\n  }}\n",
        branch(default_index, &descriptor.files[default_index])
    ));
    out
}

/// A JSON string literal is a valid JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
