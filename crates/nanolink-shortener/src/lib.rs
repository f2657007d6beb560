//! URL shortener service implementation.
//!
//! This crate ties a [`Generator`](nanolink_generator::Generator) to a
//! [`Repository`](nanolink_core::Repository). Core types are re-exported
//! from `nanolink_core`.

pub mod service;

pub use nanolink_core::{ShortCode, ShortLink, Shortener, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings, DEFAULT_MAX_ATTEMPTS};
