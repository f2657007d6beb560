use crate::link::ShortLink;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL and returns the persisted link.
    async fn shorten(&self, original_url: &str) -> Result<ShortLink>;

    /// Resolves a short code to its stored link.
    /// Returns `None` if the code does not exist.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<ShortLink>>;
}
