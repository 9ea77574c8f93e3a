use crate::domain::model::{Artwork, Release};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Catalog lookup seam. The production implementation talks to the Discogs
/// API; tests substitute a canned source.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Resolves a user-supplied query (Discogs URL or free-text search)
    /// into a normalized release.
    async fn lookup(&self, query: &str) -> Result<Release>;
}

/// Cover-art fetch seam. Failures are tolerated by callers: a label is
/// still produced without an image.
#[async_trait]
pub trait ArtworkSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Artwork>;
}
