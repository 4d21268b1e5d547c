use anyhow::{bail, Context};
use clap::Parser;
use dotenvy::dotenv;
use std::path::Path;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sponsr_cli::{Command, Config};
use sponsr_client::{OfflineGateway, SanityClient};
use sponsr_core::{
    default_config_path, load_site_config, render_html, AppError, ContentGateway, DetailLoader,
    DetailState, Entry, HttpConfig, ImageUrlBuilder, ListingConfig, ListingLoader,
    ListingSnapshot, LoadMoreOutcome, LoadMorePhase, Route, SanityConfig, SiteConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::parse();

    // Setup logging (stderr to keep stdout clean for JSON output)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config_path = config.config.clone().or_else(default_config_path);
    let site = match &config_path {
        Some(path) => load_site_config(path).map_err(with_user_message)?,
        None => SiteConfig::default(),
    };
    let site = config.apply(site);

    match &config.command {
        Command::Config => show_config(&site, config_path.as_deref()),
        Command::Insights { pages, json, .. } => {
            if site.sanity.is_configured() {
                let client = sanity_client(&site.sanity, &site.http)?;
                insights(client, site.listing, *pages, *json).await
            } else {
                insights(OfflineGateway::new(), site.listing, *pages, *json).await
            }
        }
        Command::Post { slug, html, json } => {
            let slug = resolve_slug(slug)?;
            if site.sanity.is_configured() {
                let client = sanity_client(&site.sanity, &site.http)?;
                let images = client.images().clone();
                post(client, &slug, *html, *json, Some(&images)).await
            } else {
                post(OfflineGateway::new(), &slug, *html, *json, None).await
            }
        }
    }
}

fn sanity_client(sanity: &SanityConfig, http: &HttpConfig) -> anyhow::Result<SanityClient> {
    SanityClient::new(sanity, http.clone()).map_err(with_user_message)
}

/// Wraps an [`AppError`] so the CLI prints its user-facing message first and
/// the underlying error as the cause.
fn with_user_message(err: AppError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

/// Accepts a bare slug or an `/insights/<slug>` path.
fn resolve_slug(arg: &str) -> anyhow::Result<String> {
    if !arg.starts_with('/') {
        return Ok(arg.to_string());
    }
    match Route::parse(arg) {
        Some(Route::InsightDetail(slug)) => Ok(slug),
        _ => bail!("Not an article path: {}", arg),
    }
}

/// Load the insights listing, then up to `pages` more pages
async fn insights<G: ContentGateway>(
    gateway: G,
    listing_config: ListingConfig,
    pages: usize,
    json: bool,
) -> anyhow::Result<()> {
    let listing = ListingLoader::new(gateway, listing_config);
    listing.initialize().await;

    for _ in 0..pages {
        match listing.load_more().await {
            LoadMoreOutcome::Appended { added } => debug!("Loaded {} more insights", added),
            outcome => {
                debug!(?outcome, "Stopped loading more");
                break;
            }
        }
    }

    let snapshot = listing.snapshot();
    info!(
        "Showing {} insights{}",
        snapshot.entries.len(),
        if snapshot.is_fallback() { " (built-in)" } else { "" }
    );

    if json {
        let value = create_listing_record(&snapshot);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let featured = &snapshot.featured;
    println!("\n📰 Latest Article\n");
    println!("  {}", featured.title);
    println!(
        "  {} · {} · {}",
        featured.tag,
        featured.display_date(),
        featured.read_time
    );
    println!("  {}", truncate_text(&featured.excerpt, 160));
    println!("  → {}", listing.select(featured));

    println!("\n📚 More Insights\n");
    for (i, entry) in snapshot.entries.iter().enumerate() {
        println!("{:>3}. {}", i + 1, entry.title);
        println!(
            "     {} · {} · {}",
            entry.tag,
            entry.display_date(),
            entry.read_time
        );
        println!("     → {}", listing.select(entry));
    }
    println!();

    if snapshot.load_more_phase == LoadMorePhase::Exhausted {
        println!("You've reached the end of the list.");
    } else {
        println!("More available: sponsr insights --pages {}", pages + 1);
    }
    println!();

    Ok(())
}

/// Load and print a single article
async fn post<G: ContentGateway>(
    gateway: G,
    slug: &str,
    html: bool,
    json: bool,
    images: Option<&ImageUrlBuilder>,
) -> anyhow::Result<()> {
    let detail = DetailLoader::new(gateway);

    let entry = match detail.load(slug).await {
        DetailState::Found(entry) => entry,
        state => {
            debug!(?state, "Article unavailable");
            println!("\nArticle Not Found\n");
            println!("The article you're looking for doesn't exist or has been moved.");
            println!("  Back to Insights: {}\n", detail.back_to_list());
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    print_article(&entry, html, images);
    println!("Ready to Put These Insights Into Action?");
    println!("  Book a Discovery Call: {}", detail.book_call());
    println!("  More Insights:         {}\n", detail.back_to_list());

    Ok(())
}

fn print_article(entry: &Entry, html: bool, images: Option<&ImageUrlBuilder>) {
    println!();
    if !entry.tag.is_empty() {
        println!("[{}]", entry.tag);
    }
    println!("{}\n", entry.title);
    if !entry.excerpt.is_empty() {
        println!("{}\n", entry.excerpt);
    }

    let mut meta = Vec::new();
    if let Some(author) = &entry.author {
        meta.push(author.clone());
    }
    if !entry.date.is_empty() {
        meta.push(entry.display_date());
    }
    if !entry.read_time.is_empty() {
        meta.push(entry.read_time.clone());
    }
    if !meta.is_empty() {
        println!("{}\n", meta.join(" · "));
    }

    if let Some(body) = entry.body.as_ref().filter(|b| !b.is_empty()) {
        if html {
            println!("{}\n", render_html(body, images));
        } else {
            println!("{}\n", body.plain_text());
        }
    }
}

/// Show the effective configuration
fn show_config(site: &SiteConfig, path: Option<&Path>) -> anyhow::Result<()> {
    println!("\n⚙️  Configuration\n");
    match path {
        Some(path) if path.exists() => println!("  Config file:   {}", path.display()),
        Some(path) => println!("  Config file:   {} (not found, using defaults)", path.display()),
        None => println!("  Config file:   (none)"),
    }
    println!(
        "  Project:       {}",
        site.sanity.project_id.as_deref().unwrap_or("(not set, built-in articles only)")
    );
    println!("  Dataset:       {}", site.sanity.dataset);
    println!("  API version:   {}", site.sanity.api_version);
    println!("  Edge cache:    {}", if site.sanity.use_cdn { "on" } else { "off" });
    println!("  Page size:     {}", site.listing.page_size);
    println!("  HTTP timeout:  {}s", site.http.timeout.as_secs());
    println!("  HTTP retries:  {}", site.http.max_retries);
    println!();
    Ok(())
}

/// Create a JSON record of the listing snapshot
fn create_listing_record(snapshot: &ListingSnapshot) -> serde_json::Value {
    serde_json::json!({
        "featured": snapshot.featured,
        "entries": snapshot.entries,
        "totalCount": snapshot.total_count,
        "exhausted": snapshot.load_more_phase == LoadMorePhase::Exhausted,
        "fallback": snapshot.is_fallback(),
    })
}

/// Truncate text to a maximum number of characters, adding ellipsis if needed
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.chars().count() <= max_chars {
        cleaned
    } else {
        let cut: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
