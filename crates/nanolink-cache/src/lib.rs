//! Link cache implementations for NanoLink.

pub mod moka;

pub use self::moka::{CacheConfig, MokaLinkCache};
pub use nanolink_core::cache::{LinkCache, Result};
pub use nanolink_core::CacheError;
