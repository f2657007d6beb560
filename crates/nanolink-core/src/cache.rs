use crate::error::CacheError;
use crate::link::ShortLink;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache for short links, keyed by short code.
///
/// Links are immutable, so a cached hit never goes stale. Callers must not
/// cache misses: a code that is unknown now may be created a moment later.
#[async_trait]
pub trait LinkCache: Send + Sync + 'static {
    /// Get a link from the cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_link(&self, code: &ShortCode) -> Result<Option<ShortLink>>;

    /// Store a link in the cache, keyed by its short code.
    async fn set_link(&self, link: &ShortLink) -> Result<()>;
}
