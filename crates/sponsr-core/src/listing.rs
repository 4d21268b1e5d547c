//! Paginated insights listing with a featured entry and fallback content.
//!
//! The loader is a view-model: the page holds one per mount, calls
//! [`ListingLoader::initialize`] once, then [`ListingLoader::load_more`] on
//! demand, and renders [`ListingLoader::snapshot`]. Gateway failures are
//! never surfaced; the listing degrades to the built-in articles.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::ListingConfig;
use crate::error::ErrorCode;
use crate::fallback::{fallback_entries, featured_entry};
use crate::gateway::ContentGateway;
use crate::models::Entry;
use crate::navigation::NavigationIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMorePhase {
    Idle,
    Loading,
    /// Terminal: no further pages will be requested.
    Exhausted,
}

/// Why the listing shows the built-in articles instead of live ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCause {
    /// The backend answered with an empty first page.
    EmptyFeed,
    /// The initial fetch failed.
    Gateway(ErrorCode),
}

/// Read-only view of the listing state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub phase: ListingPhase,
    pub featured: Entry,
    pub entries: Vec<Entry>,
    pub total_count: usize,
    pub load_more_phase: LoadMorePhase,
    /// Set when `entries` holds the built-in articles.
    pub fallback_cause: Option<FallbackCause>,
}

impl ListingSnapshot {
    pub fn is_fallback(&self) -> bool {
        self.fallback_cause.is_some()
    }

    pub fn can_load_more(&self) -> bool {
        self.phase == ListingPhase::Ready && self.load_more_phase == LoadMorePhase::Idle
    }
}

/// Result of a single [`ListingLoader::load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    /// A page arrived; `added` entries were appended.
    Appended { added: usize },
    /// The backend returned an empty page; the listing is exhausted.
    EndOfFeed,
    /// Every entry on the page was already listed. The next offset would
    /// not move, so the listing is exhausted.
    NoNewEntries,
    /// The fetch failed; the listing is exhausted.
    Failed(ErrorCode),
    /// Nothing was fetched because the listing was not idle.
    Rejected(RejectReason),
    /// The loader was unmounted while the fetch was in flight.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotReady,
    InFlight,
    Exhausted,
}

struct ListingState {
    view: ListingSnapshot,
    initialize_started: bool,
    mounted: bool,
}

pub struct ListingLoader<G> {
    gateway: G,
    page_size: usize,
    state: Mutex<ListingState>,
}

impl<G: ContentGateway> ListingLoader<G> {
    /// Mounts a loader. The featured slot starts with the built-in article
    /// and the collection starts empty until [`initialize`](Self::initialize)
    /// completes.
    pub fn new(gateway: G, config: ListingConfig) -> Self {
        Self {
            gateway,
            page_size: config.page_size.max(1),
            state: Mutex::new(ListingState {
                view: ListingSnapshot {
                    phase: ListingPhase::Loading,
                    featured: featured_entry(),
                    entries: Vec::new(),
                    total_count: 0,
                    load_more_phase: LoadMorePhase::Idle,
                    fallback_cause: None,
                },
                initialize_started: false,
                mounted: true,
            }),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        self.lock().view.clone()
    }

    /// Stops applying results. In-flight fetches complete but are dropped.
    pub fn unmount(&self) {
        self.lock().mounted = false;
    }

    /// Fetches the featured entry, the first page and the total count
    /// together, then moves to [`ListingPhase::Ready`].
    ///
    /// The three fetches succeed or fail as a unit. Any failure leaves the
    /// built-in articles in place with a total count of zero. Only the first
    /// call does anything.
    pub async fn initialize(&self) {
        {
            let mut state = self.lock();
            if state.initialize_started {
                warn!("Listing already initialized, ignoring repeated call");
                return;
            }
            state.initialize_started = true;
        }

        let result = futures::try_join!(
            self.gateway.fetch_featured(),
            self.gateway.fetch_page(self.page_size, 0),
            self.gateway.fetch_count(),
        );

        let mut state = self.lock();
        if !state.mounted {
            debug!("Listing unmounted before initial load completed");
            return;
        }
        let view = &mut state.view;

        match result {
            Ok((featured, page, total)) => {
                if let Some(featured) = featured {
                    view.featured = featured;
                }

                if page.is_empty() {
                    info!("Content feed is empty, showing built-in articles");
                    view.entries = fallback_entries();
                    view.fallback_cause = Some(FallbackCause::EmptyFeed);
                    view.load_more_phase = LoadMorePhase::Exhausted;
                } else {
                    view.entries = page;
                    view.total_count = total;
                    view.fallback_cause = None;
                    view.load_more_phase = if view.entries.len() >= total {
                        LoadMorePhase::Exhausted
                    } else {
                        LoadMorePhase::Idle
                    };
                    info!(
                        "Loaded {} of {} insights",
                        view.entries.len(),
                        view.total_count
                    );
                }
            }
            Err(e) => {
                warn!(
                    code = %e.code(),
                    "Failed to load insights, showing built-in articles: {}", e
                );
                view.featured = featured_entry();
                view.entries = fallback_entries();
                view.total_count = 0;
                view.fallback_cause = Some(FallbackCause::Gateway(e.code()));
                view.load_more_phase = LoadMorePhase::Exhausted;
            }
        }

        view.phase = ListingPhase::Ready;
    }

    /// Fetches the next page and appends it.
    ///
    /// Only acts when the listing is ready and idle; a call made while a
    /// page is in flight is rejected, never queued. An empty page, a page
    /// of already listed entries, or a failure exhausts the listing for good.
    pub async fn load_more(&self) -> LoadMoreOutcome {
        let offset = {
            let mut state = self.lock();
            let view = &mut state.view;
            if view.phase != ListingPhase::Ready {
                return LoadMoreOutcome::Rejected(RejectReason::NotReady);
            }
            match view.load_more_phase {
                LoadMorePhase::Loading => {
                    debug!("Load more already in flight, rejecting");
                    return LoadMoreOutcome::Rejected(RejectReason::InFlight);
                }
                LoadMorePhase::Exhausted => {
                    return LoadMoreOutcome::Rejected(RejectReason::Exhausted);
                }
                LoadMorePhase::Idle => {}
            }
            view.load_more_phase = LoadMorePhase::Loading;
            view.entries.len()
        };

        let result = self.gateway.fetch_page(self.page_size, offset).await;

        let mut state = self.lock();
        if !state.mounted {
            debug!(offset, "Listing unmounted, dropping page");
            return LoadMoreOutcome::Discarded;
        }
        let view = &mut state.view;

        match result {
            Ok(page) if !page.is_empty() => {
                let added = append_unique(&mut view.entries, page);
                if added == 0 {
                    warn!(offset, "Page held only entries already listed, stopping");
                    view.load_more_phase = LoadMorePhase::Exhausted;
                    return LoadMoreOutcome::NoNewEntries;
                }
                view.load_more_phase = if view.entries.len() >= view.total_count {
                    LoadMorePhase::Exhausted
                } else {
                    LoadMorePhase::Idle
                };
                debug!(offset, added, total = view.total_count, "Appended page");
                LoadMoreOutcome::Appended { added }
            }
            Ok(_) => {
                view.load_more_phase = LoadMorePhase::Exhausted;
                LoadMoreOutcome::EndOfFeed
            }
            Err(e) => {
                warn!(offset, code = %e.code(), "Failed to load more insights: {}", e);
                view.load_more_phase = LoadMorePhase::Exhausted;
                LoadMoreOutcome::Failed(e.code())
            }
        }
    }

    /// Where selecting `entry` leads.
    pub fn select(&self, entry: &Entry) -> NavigationIntent {
        NavigationIntent::for_entry(entry)
    }

    fn lock(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Appends `page` in order, skipping entries whose slug is already listed.
fn append_unique(entries: &mut Vec<Entry>, page: Vec<Entry>) -> usize {
    let mut seen: HashSet<String> = entries
        .iter()
        .filter(|e| e.has_detail_page())
        .map(|e| e.slug.clone())
        .collect();

    let before = entries.len();
    for entry in page {
        if entry.has_detail_page() && !seen.insert(entry.slug.clone()) {
            debug!(slug = %entry.slug, "Skipping entry already listed");
            continue;
        }
        entries.push(entry);
    }
    entries.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{post, posts, ScriptedGateway};
    use crate::navigation::{Route, ScrollTarget};
    use std::time::Duration;

    fn loader(gateway: ScriptedGateway) -> ListingLoader<ScriptedGateway> {
        ListingLoader::new(gateway, ListingConfig::default())
    }

    #[tokio::test]
    async fn test_initial_state_before_load() {
        let listing = loader(ScriptedGateway::new(posts(3)));
        let snap = listing.snapshot();
        assert_eq!(snap.phase, ListingPhase::Loading);
        assert!(snap.entries.is_empty());
        assert_eq!(snap.featured, featured_entry());
        assert!(!snap.can_load_more());
    }

    #[tokio::test]
    async fn test_initialize_then_load_more_to_exhaustion() {
        let listing = loader(ScriptedGateway::new(posts(8)).with_count(8));

        listing.initialize().await;
        let snap = listing.snapshot();
        assert_eq!(snap.phase, ListingPhase::Ready);
        assert_eq!(snap.entries.len(), 6);
        assert_eq!(snap.total_count, 8);
        assert_eq!(snap.load_more_phase, LoadMorePhase::Idle);
        assert!(!snap.is_fallback());

        assert_eq!(
            listing.load_more().await,
            LoadMoreOutcome::Appended { added: 2 }
        );
        let snap = listing.snapshot();
        assert_eq!(snap.entries.len(), 8);
        assert_eq!(snap.load_more_phase, LoadMorePhase::Exhausted);
        assert_eq!(listing.gateway().page_calls(), vec![(6, 0), (6, 6)]);
    }

    #[tokio::test]
    async fn test_featured_replaced_when_present() {
        let listing = loader(ScriptedGateway::new(posts(2)).with_featured(post("lead")));
        listing.initialize().await;
        let snap = listing.snapshot();
        assert_eq!(snap.featured.slug, "lead");
        assert_eq!(snap.load_more_phase, LoadMorePhase::Exhausted);
    }

    #[tokio::test]
    async fn test_missing_featured_keeps_builtin() {
        let listing = loader(ScriptedGateway::new(posts(2)));
        listing.initialize().await;
        assert_eq!(listing.snapshot().featured, featured_entry());
    }

    #[tokio::test]
    async fn test_gateway_failure_degrades_to_fallback() {
        let listing = loader(ScriptedGateway::failing());
        listing.initialize().await;

        let snap = listing.snapshot();
        assert_eq!(snap.phase, ListingPhase::Ready);
        assert_eq!(snap.entries, fallback_entries());
        assert_eq!(snap.featured, featured_entry());
        assert_eq!(snap.total_count, 0);
        assert_eq!(
            snap.fallback_cause,
            Some(FallbackCause::Gateway(ErrorCode::Network))
        );
        assert_eq!(
            listing.load_more().await,
            LoadMoreOutcome::Rejected(RejectReason::Exhausted)
        );
    }

    #[tokio::test]
    async fn test_empty_feed_keeps_fallback_and_exhausts() {
        let listing = loader(ScriptedGateway::new(Vec::new()).with_featured(post("lead")));
        listing.initialize().await;

        let snap = listing.snapshot();
        assert_eq!(snap.entries, fallback_entries());
        assert_eq!(snap.featured.slug, "lead");
        assert_eq!(snap.load_more_phase, LoadMorePhase::Exhausted);
        assert_eq!(snap.fallback_cause, Some(FallbackCause::EmptyFeed));
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let listing = loader(ScriptedGateway::new(posts(8)));
        listing.initialize().await;
        listing.initialize().await;
        assert_eq!(listing.gateway().page_calls(), vec![(6, 0)]);
    }

    #[tokio::test]
    async fn test_load_more_before_initialize_is_rejected() {
        let listing = loader(ScriptedGateway::new(posts(8)));
        assert_eq!(
            listing.load_more().await,
            LoadMoreOutcome::Rejected(RejectReason::NotReady)
        );
        assert!(listing.gateway().page_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_load_more_fetches_once() {
        let listing = loader(
            ScriptedGateway::new(posts(20))
                .with_count(20)
                .with_delay(Duration::from_millis(50)),
        );
        listing.initialize().await;

        let (first, second) = tokio::join!(listing.load_more(), listing.load_more());
        assert_eq!(first, LoadMoreOutcome::Appended { added: 6 });
        assert_eq!(second, LoadMoreOutcome::Rejected(RejectReason::InFlight));

        assert_eq!(listing.snapshot().entries.len(), 12);
        assert_eq!(listing.gateway().page_calls(), vec![(6, 0), (6, 6)]);
    }

    #[tokio::test]
    async fn test_empty_page_exhausts_permanently() {
        // Count overstates the feed: loading stops on the empty page.
        let listing = loader(ScriptedGateway::new(posts(6)).with_count(10));
        listing.initialize().await;
        assert_eq!(listing.snapshot().load_more_phase, LoadMorePhase::Idle);

        assert_eq!(listing.load_more().await, LoadMoreOutcome::EndOfFeed);
        assert_eq!(listing.snapshot().load_more_phase, LoadMorePhase::Exhausted);

        assert_eq!(
            listing.load_more().await,
            LoadMoreOutcome::Rejected(RejectReason::Exhausted)
        );
        assert_eq!(listing.snapshot().load_more_phase, LoadMorePhase::Exhausted);
        assert_eq!(listing.gateway().page_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_low_count_stops_early() {
        let listing = loader(ScriptedGateway::new(posts(12)).with_count(6));
        listing.initialize().await;
        let snap = listing.snapshot();
        assert_eq!(snap.entries.len(), 6);
        assert_eq!(snap.load_more_phase, LoadMorePhase::Exhausted);
    }

    #[tokio::test]
    async fn test_page_failure_exhausts_and_keeps_entries() {
        let listing = loader(
            ScriptedGateway::new(posts(20))
                .with_count(20)
                .failing_pages_from(6),
        );
        listing.initialize().await;

        assert_eq!(
            listing.load_more().await,
            LoadMoreOutcome::Failed(ErrorCode::Timeout)
        );
        let snap = listing.snapshot();
        assert_eq!(snap.entries.len(), 6);
        assert!(!snap.is_fallback());
        assert_eq!(snap.load_more_phase, LoadMorePhase::Exhausted);
    }

    #[tokio::test]
    async fn test_pages_grow_monotonically_without_duplicates() {
        let listing = loader(ScriptedGateway::new(posts(20)).with_count(20));
        listing.initialize().await;

        let mut last = listing.snapshot().entries.len();
        while listing.snapshot().can_load_more() {
            listing.load_more().await;
            let len = listing.snapshot().entries.len();
            assert!(len >= last);
            last = len;
        }

        let snap = listing.snapshot();
        assert_eq!(snap.entries.len(), 20);
        let slugs: HashSet<_> = snap.entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs.len(), 20);
        assert_eq!(snap.entries[0].slug, "post-0");
        assert_eq!(snap.entries[19].slug, "post-19");
    }

    #[tokio::test]
    async fn test_repeated_page_exhausts_instead_of_refetching() {
        let listing = loader(
            ScriptedGateway::new(posts(6))
                .with_count(20)
                .ignoring_offset(),
        );
        listing.initialize().await;
        assert!(listing.snapshot().can_load_more());

        let mut calls = 0;
        while listing.snapshot().can_load_more() {
            assert!(calls < 3, "load_more kept requesting the same offset");
            assert_eq!(listing.load_more().await, LoadMoreOutcome::NoNewEntries);
            calls += 1;
        }

        let snap = listing.snapshot();
        assert_eq!(snap.entries.len(), 6);
        assert_eq!(snap.load_more_phase, LoadMorePhase::Exhausted);
        assert_eq!(listing.gateway().page_calls(), vec![(6, 0), (6, 6)]);
        assert_eq!(
            listing.load_more().await,
            LoadMoreOutcome::Rejected(RejectReason::Exhausted)
        );
    }

    #[test]
    fn test_append_unique_skips_repeated_slugs() {
        let mut entries = vec![post("a"), post("b")];
        let added = append_unique(&mut entries, vec![post("b"), post("c")]);
        assert_eq!(added, 1);
        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_drops_in_flight_page() {
        let listing = loader(
            ScriptedGateway::new(posts(20))
                .with_count(20)
                .with_delay(Duration::from_millis(50)),
        );
        listing.initialize().await;

        let (outcome, ()) = tokio::join!(listing.load_more(), async { listing.unmount() });
        assert_eq!(outcome, LoadMoreOutcome::Discarded);
        assert_eq!(listing.snapshot().entries.len(), 6);
    }

    #[tokio::test]
    async fn test_select() {
        let listing = loader(ScriptedGateway::new(posts(1)));
        assert_eq!(
            listing.select(&post("roi")),
            NavigationIntent::GoTo(Route::InsightDetail("roi".to_string()))
        );
        assert_eq!(
            listing.select(&featured_entry()),
            NavigationIntent::ScrollTo(ScrollTarget::newsletter())
        );
    }
}
