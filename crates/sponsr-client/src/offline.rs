use tracing::info;

use sponsr_core::error::AppError;
use sponsr_core::gateway::ContentGateway;
use sponsr_core::models::Entry;

/// Gateway used when no content project is configured.
///
/// Every query fails with [`AppError::NotConfigured`], so the loaders show
/// the built-in articles and report every slug as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    pub fn new() -> Self {
        info!("No content project configured, using fallback data");
        Self
    }
}

impl ContentGateway for OfflineGateway {
    async fn fetch_featured(&self) -> Result<Option<Entry>, AppError> {
        Err(AppError::NotConfigured)
    }

    async fn fetch_page(&self, _limit: usize, _offset: usize) -> Result<Vec<Entry>, AppError> {
        Err(AppError::NotConfigured)
    }

    async fn fetch_count(&self) -> Result<usize, AppError> {
        Err(AppError::NotConfigured)
    }

    async fn fetch_by_slug(&self, _slug: &str) -> Result<Option<Entry>, AppError> {
        Err(AppError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sponsr_core::config::ListingConfig;
    use sponsr_core::error::ErrorCode;
    use sponsr_core::fallback::fallback_entries;
    use sponsr_core::{DetailLoader, DetailState, FallbackCause, ListingLoader, NotFoundCause};

    #[tokio::test]
    async fn test_every_query_fails_not_configured() {
        let gateway = OfflineGateway::new();
        assert!(matches!(gateway.fetch_count().await, Err(AppError::NotConfigured)));
        assert!(matches!(gateway.fetch_by_slug("x").await, Err(AppError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_listing_shows_fallback() {
        let listing = ListingLoader::new(OfflineGateway::new(), ListingConfig::default());
        listing.initialize().await;

        let snap = listing.snapshot();
        assert_eq!(snap.entries, fallback_entries());
        assert_eq!(
            snap.fallback_cause,
            Some(FallbackCause::Gateway(ErrorCode::NotConfigured))
        );
    }

    #[tokio::test]
    async fn test_detail_is_not_found() {
        let detail = DetailLoader::new(OfflineGateway::new());
        assert_eq!(
            detail.load("anything").await,
            DetailState::NotFound(NotFoundCause::Gateway(ErrorCode::NotConfigured))
        );
    }
}
