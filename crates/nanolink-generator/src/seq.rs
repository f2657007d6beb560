use crate::Generator;
use nanolink_core::{ShortCode, ALPHABET, SHORT_CODE_LENGTH};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic generator that encodes a counter as a fixed-width
/// base-62 code over [`ALPHABET`].
///
/// Counter `0` becomes `"AAAAAA"`, `1` becomes `"AAAAAB"`, and so on. The
/// counter wraps around after 62^6 codes. Restarting a process resets the
/// counter, so against a persistent store this generator collides with its
/// own earlier output; it exists for reproducible fixtures and tests.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    fn encode(mut value: u64) -> String {
        let base = ALPHABET.len() as u64;
        let mut buf = [ALPHABET[0]; SHORT_CODE_LENGTH];
        for slot in buf.iter_mut().rev() {
            *slot = ALPHABET[(value % base) as usize];
            value /= base;
        }
        buf.iter().copied().map(char::from).collect()
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(Self::encode(count))
    }
}
