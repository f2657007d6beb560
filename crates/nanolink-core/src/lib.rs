//! Core types and traits for the NanoLink URL shortener.
//!
//! This crate provides the shared vocabulary used by the generator, the
//! storage backends, the shortener service and the HTTP gateway.

pub mod cache;
pub mod error;
pub mod link;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use cache::LinkCache;
pub use error::{CacheError, CoreError, ShortenerError, StorageError};
pub use link::{ShortLink, MAX_URL_LENGTH};
pub use repository::{ReadRepository, Repository};
pub use shortcode::{ShortCode, ALPHABET, SHORT_CODE_LENGTH};
pub use shortener::Shortener;
