//! Sponsr Client - content gateways for the insights loaders
//!
//! - [`sanity`] - Sanity query API over HTTP
//! - [`offline`] - stand-in used when no content project is configured
//!
//! Both implement [`sponsr_core::ContentGateway`].

pub mod offline;
pub mod sanity;

pub use offline::OfflineGateway;
pub use sanity::SanityClient;
