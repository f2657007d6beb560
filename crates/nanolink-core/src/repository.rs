use crate::error::StorageError;
use crate::link::ShortLink;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// This trait provides only the lookup side of [`Repository`], which is all
/// a read-through decorator needs to know about.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the link stored under exactly this code (case-sensitive).
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>>;
}

/// An append-only store of short links.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new link and returns it with its store-assigned id.
    ///
    /// Returns `Err(StorageError::Conflict)` if the code already exists. The
    /// check is atomic with the write, so two concurrent inserts of the same
    /// code can never both succeed.
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<ShortLink>;
}
