//! Single-article loader keyed by slug.
//!
//! Every [`DetailLoader::load`] starts from [`DetailState::Loading`] and
//! ends in `Found` or `NotFound`. A response that arrives after a newer
//! `load` was issued is dropped, so the state always belongs to the latest
//! requested slug.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::ErrorCode;
use crate::gateway::ContentGateway;
use crate::models::Entry;
use crate::navigation::{NavigationIntent, Route};

/// Internal reason behind a not-found page. All causes render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundCause {
    /// The route carried no slug; the gateway was not called.
    MissingSlug,
    /// The backend has no entry for the slug.
    NoSuchEntry,
    /// The fetch failed.
    Gateway(ErrorCode),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Found(Entry),
    NotFound(NotFoundCause),
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DetailState::NotFound(_))
    }

    pub fn entry(&self) -> Option<&Entry> {
        match self {
            DetailState::Found(entry) => Some(entry),
            _ => None,
        }
    }
}

struct DetailInner {
    generation: u64,
    slug: Option<String>,
    state: DetailState,
}

pub struct DetailLoader<G> {
    gateway: G,
    inner: Mutex<DetailInner>,
}

impl<G: ContentGateway> DetailLoader<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            inner: Mutex::new(DetailInner {
                generation: 0,
                slug: None,
                state: DetailState::Loading,
            }),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> DetailState {
        self.lock().state.clone()
    }

    /// The slug most recently passed to [`load`](Self::load).
    pub fn current_slug(&self) -> Option<String> {
        self.lock().slug.clone()
    }

    /// Loads the entry for `slug`, replacing whatever was shown before.
    ///
    /// Returns the state after this call: the loaded result, or the newer
    /// state when this request was superseded while in flight.
    pub async fn load(&self, slug: &str) -> DetailState {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.slug = Some(slug.to_string());

            if slug.trim().is_empty() {
                inner.state = DetailState::NotFound(NotFoundCause::MissingSlug);
                return inner.state.clone();
            }

            inner.state = DetailState::Loading;
            inner.generation
        };

        let result = self.gateway.fetch_by_slug(slug).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(slug, "Discarding response for superseded request");
            return inner.state.clone();
        }

        inner.state = match result {
            Ok(Some(entry)) => DetailState::Found(entry),
            Ok(None) => {
                debug!(slug, "No article for slug");
                DetailState::NotFound(NotFoundCause::NoSuchEntry)
            }
            Err(e) => {
                warn!(slug, code = %e.code(), "Error fetching post: {}", e);
                DetailState::NotFound(NotFoundCause::Gateway(e.code()))
            }
        };
        inner.state.clone()
    }

    /// Stops applying results for any request still in flight.
    pub fn unmount(&self) {
        self.lock().generation += 1;
    }

    /// "Back to Insights".
    pub fn back_to_list(&self) -> NavigationIntent {
        NavigationIntent::GoTo(Route::Insights)
    }

    /// "Book a Discovery Call".
    pub fn book_call(&self) -> NavigationIntent {
        NavigationIntent::GoTo(Route::Contact)
    }

    fn lock(&self) -> MutexGuard<'_, DetailInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
