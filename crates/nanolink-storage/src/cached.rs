use async_trait::async_trait;
use nanolink_core::repository::{ReadRepository, Repository, Result};
use nanolink_core::{LinkCache, ShortCode, ShortLink};
use tracing::{trace, warn};

/// A repository decorator that adds read-through caching.
///
/// Reads check the cache first and fall back to the inner repository; hits
/// from the inner repository are backfilled. Inserts go to the inner
/// repository and prime the cache with the new link.
#[derive(Debug, Clone)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
}

impl<R: ReadRepository, C: LinkCache> CachedRepository<R, C> {
    /// Creates a new cached repository decorator.
    pub fn new(inner: R, cache: C) -> Self {
        Self { inner, cache }
    }

    /// Returns a reference to the inner repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[async_trait]
impl<R: ReadRepository, C: LinkCache> ReadRepository for CachedRepository<R, C> {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        trace!(code = %code, "fetching link with cache");

        match self.cache.get_link(code).await {
            Ok(Some(link)) => return Ok(Some(link)),
            Ok(None) => trace!(code = %code, "cache miss, fetching from inner repository"),
            Err(err) => {
                warn!(code = %code, error = %err, "cache error, falling back to inner repository")
            }
        }

        // Storage failures pass through unchanged; only hits are backfilled.
        let link = self.inner.get(code).await?;
        if let Some(ref value) = link {
            if let Err(err) = self.cache.set_link(value).await {
                warn!(code = %code, error = %err, "failed to backfill cache");
            }
        }

        Ok(link)
    }
}

#[async_trait]
impl<R: Repository, C: LinkCache> Repository for CachedRepository<R, C> {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<ShortLink> {
        let link = self.inner.insert(code, original_url).await?;

        if let Err(err) = self.cache.set_link(&link).await {
            warn!(code = %code, error = %err, "failed to prime cache after insert");
        }

        Ok(link)
    }
}
