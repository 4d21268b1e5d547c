use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sponsr_core::config::SiteConfig;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "sponsr")]
#[command(author, version, about = "Browse the SponsrBridge insights feed")]
#[command(after_help = "Examples:
  sponsr insights
  sponsr insights --pages 2
  sponsr post pricing-sponsorship --html
  sponsr post /insights/pricing-sponsorship
  sponsr config")]
pub struct Config {
    /// Content project id; without one the built-in articles are shown
    #[arg(long, env = "SANITY_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Content dataset
    #[arg(long, env = "SANITY_DATASET")]
    pub dataset: Option<String>,

    /// Query the live API instead of the edge cache
    #[arg(long)]
    pub no_cdn: bool,

    /// Custom path to the config.toml file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List insights: featured article first, then the article grid
    #[command(after_help = "Example: sponsr insights --pages 3 --json")]
    Insights {
        /// Extra pages to load after the first one
        #[arg(short, long, default_value = "0")]
        pages: usize,
        /// Articles per page
        #[arg(long)]
        page_size: Option<usize>,
        /// Print the listing snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single article by slug or /insights/<slug> path
    Post {
        /// Article slug or site path
        slug: String,
        /// Render the body as HTML
        #[arg(long, conflicts_with = "json")]
        html: bool,
        /// Print the article as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}

impl Config {
    /// Applies environment and flag overrides on top of the file configuration.
    pub fn apply(&self, mut site: SiteConfig) -> SiteConfig {
        if let Some(project_id) = self.project_id.as_ref().filter(|id| !id.trim().is_empty()) {
            site.sanity.project_id = Some(project_id.trim().to_string());
        }
        if let Some(dataset) = self.dataset.as_ref().filter(|d| !d.trim().is_empty()) {
            site.sanity.dataset = dataset.trim().to_string();
        }
        if self.no_cdn {
            site.sanity.use_cdn = false;
        }
        if let Command::Insights {
            page_size: Some(size),
            ..
        } = self.command
        {
            if size > 0 {
                site.listing.page_size = size;
            }
        }
        site
    }
}
