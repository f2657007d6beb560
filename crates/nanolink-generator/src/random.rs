use crate::Generator;
use nanolink_core::{ShortCode, ALPHABET, SHORT_CODE_LENGTH};
use rand::Rng;
use typed_builder::TypedBuilder;

/// Draws every character of a code uniformly and independently from
/// [`ALPHABET`], using the thread-local CSPRNG.
///
/// At the default length of 6 the code space holds 62^6 (about 56.8 billion)
/// codes, so collisions are rare but still possible. They are resolved by the
/// caller retrying against the repository's unique constraint.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = SHORT_CODE_LENGTH)]
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of [`SHORT_CODE_LENGTH`] characters.
    pub fn new() -> Self {
        Self::with_length(SHORT_CODE_LENGTH)
    }

    /// Creates a generator producing codes of `length` characters.
    ///
    /// A length of zero is clamped to one.
    pub fn with_length(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length.max(1)
    }

    fn random_code(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length())
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect()
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        ShortCode::new_unchecked(self.random_code())
    }
}
