//! The content gateway consumed by the loaders.

use std::future::Future;

use crate::error::AppError;
use crate::models::Entry;

/// Query interface of the content backend.
///
/// Implementations return entries in the backend's order (newest first).
/// `fetch_count` is advisory: the loaders never rely on it alone to decide
/// that the feed is exhausted.
pub trait ContentGateway {
    /// The entry promoted to the top of the listing, if any.
    fn fetch_featured(&self) -> impl Future<Output = Result<Option<Entry>, AppError>> + Send;

    /// Up to `limit` summary entries starting at `offset`.
    fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = Result<Vec<Entry>, AppError>> + Send;

    /// Total number of entries the backend reports.
    fn fetch_count(&self) -> impl Future<Output = Result<usize, AppError>> + Send;

    /// The full entry for `slug`, including author and body.
    fn fetch_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Entry>, AppError>> + Send;
}
