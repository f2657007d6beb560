use async_trait::async_trait;
use moka::future::Cache;
use nanolink_core::cache::Result;
use nanolink_core::{LinkCache, ShortCode, ShortLink};
use std::time::Duration;
use tracing::trace;
use typed_builder::TypedBuilder;

/// Default number of links kept in memory.
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory link cache backed by Moka.
///
/// Bounded by entry count with TinyLFU eviction. Cloning is cheap and clones
/// share the same underlying cache.
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    cache: Cache<String, ShortLink>,
}

impl MokaLinkCache {
    /// Creates a new cache holding at most [`DEFAULT_MAX_CAPACITY`] links.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        CacheConfig::builder().max_capacity(max_capacity).build().into()
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Number of cached links. Moka applies writes lazily, so this is an
    /// approximation until pending tasks have run.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MokaLinkCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get_link(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        let link = self.cache.get(code.as_str()).await;
        trace!(code = %code, hit = link.is_some(), "moka lookup");
        Ok(link)
    }

    async fn set_link(&self, link: &ShortLink) -> Result<()> {
        trace!(code = %link.short_code, "caching link in moka");
        self.cache
            .insert(link.short_code.as_str().to_owned(), link.clone())
            .await;
        Ok(())
    }
}

/// Configuration for creating a [`MokaLinkCache`] with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of links the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Evict links that have not been read for this long.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

impl From<CacheConfig> for MokaLinkCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaLinkCache {
            cache: builder.build(),
        }
    }
}
