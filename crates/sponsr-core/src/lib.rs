//! Sponsr Core - Domain types, content loaders, error handling and configuration.
//!
//! - [`listing`] - paginated insights listing with fallback content
//! - [`detail`] - single-article loader with a stale-response guard
//! - [`gateway`] - the content backend interface both loaders consume
//! - [`richtext`] - article bodies and their HTML rendering
//! - [`navigation`] - navigation intents, routes and the shell that applies them

pub mod config;
pub mod detail;
pub mod error;
pub mod fallback;
pub mod format;
pub mod gateway;
pub mod listing;
pub mod models;
pub mod navigation;
pub mod richtext;

pub use config::{
    default_config_path, load_site_config, HttpConfig, ListingConfig, SanityConfig, SiteConfig,
};
pub use detail::{DetailLoader, DetailState, NotFoundCause};
pub use error::{AppError, ErrorCode};
pub use gateway::ContentGateway;
pub use listing::{
    FallbackCause, ListingLoader, ListingPhase, ListingSnapshot, LoadMoreOutcome, LoadMorePhase,
    RejectReason,
};
pub use models::Entry;
pub use navigation::{
    NavigationIntent, Navigator, Route, ScrollController, ScrollTarget, ThemeState,
};
pub use richtext::{render_html, Document, ImageUrlBuilder};
