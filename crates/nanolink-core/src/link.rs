use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted for an original URL.
pub const MAX_URL_LENGTH: usize = 500;

/// A persisted mapping from a short code to the URL it stands for.
///
/// Links are created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    /// Store-assigned identifier. Not related to the short code.
    pub id: i64,
    /// The original URL that was shortened.
    pub original_url: String,
    /// The unique code the URL is published under.
    pub short_code: ShortCode,
}
