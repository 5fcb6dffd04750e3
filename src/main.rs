use clap::{Parser, Subcommand};
use pagemap::config::{self, BuildMode};
use pagemap::loader::{self, Host, LoaderOptions, LoaderRequest};
use pagemap::search::SearchIndex;
use pagemap::{filter, output, tree};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pagemap")]
#[command(about = "Page map compiler for locale-aware content sites")]
#[command(long_about = "\
Page map compiler for locale-aware content sites

Directories become route prefixes, content files become pages, and
meta.<locale>.json files name them per locale.

Project structure:

  my-site/
  ├── pagemap.toml                 # Project config (optional)
  └── pages/
      ├── index.en.mdx             # / in English
      ├── index.fr.mdx             # / in French
      ├── about.mdx                # /about, dispatches to its locale variants
      ├── about.en.mdx
      ├── meta.en.json             # {\"index\": \"Home\", \"about\": \"About\"}
      ├── api/                     # Server endpoints, never in the page map
      └── docs/
          └── getting-started.en.mdx

Run 'pagemap gen-config' to generate a documented pagemap.toml.")]
#[command(version)]
struct Cli {
    /// Project root containing pagemap.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the page map
    Tree {
        /// Show the page map as seen by this locale
        #[arg(long)]
        locale: Option<String>,
        /// Resolve the route and title of this file
        #[arg(long)]
        active: Option<PathBuf>,
        /// Print JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },
    /// Compile one content file and print the emitted module
    Compile {
        /// Content file to compile
        file: PathBuf,
        /// Import query, e.g. "?pagemap-raw"
        #[arg(long, default_value = "")]
        query: String,
        /// Production build (writes search index files when enabled)
        #[arg(long)]
        production: bool,
    },
    /// Build the page map and report what it contains
    Check,
    /// Print a stock pagemap.toml with all options documented
    GenConfig,
}

/// Host that records dependencies for the log.
struct CliHost;

impl Host for CliHost {
    fn add_dependency(&mut self, dir: &Path) {
        log::debug!("dependency: {}", dir.display());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Tree {
            locale,
            active,
            json,
        } => {
            let config = config::load_config(&cli.root)?;
            let pages_dir = config.pages_path(&cli.root);
            let active = active.unwrap_or_else(|| pages_dir.clone());
            let page_tree = tree::build(&pages_dir, &active)?;
            let page_map = match &locale {
                Some(locale) => filter::filter(
                    &page_tree.root,
                    locale,
                    config.i18n.default_locale.as_deref().unwrap_or(""),
                ),
                None => page_tree.root.clone(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&page_map.children)?);
            } else {
                output::print_tree_output(&page_tree, &page_map);
            }
        }
        Command::Compile {
            file,
            query,
            production,
        } => {
            let config = config::load_config(&cli.root)?;
            let index = SearchIndex::new(config.search_output_path(&cli.root));
            let options = LoaderOptions {
                config,
                project_root: cli.root.clone(),
                mode: if production {
                    BuildMode::Production
                } else {
                    BuildMode::Development
                },
            };
            let file = std::fs::canonicalize(&file)?;
            let source = tree::read_lossy(&file)?;
            let request = LoaderRequest {
                source: &source,
                resource_path: &file,
                resource_query: &query,
            };
            let module = loader::load(&request, &options, &mut CliHost, &index)?;
            print!("{}", module);
            let locales = index.locales();
            if !locales.is_empty() {
                log::info!(
                    "search index for {} written to {}",
                    locales.join(", "),
                    index.output_dir().display()
                );
            }
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            let pages_dir = config.pages_path(&cli.root);
            println!("==> Checking {}", pages_dir.display());
            let page_tree = tree::build(&pages_dir, &pages_dir)?;
            output::print_check_output(&page_tree.root, Path::new(&config.pages_dir));
            println!("==> Page map is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
