use async_trait::async_trait;
use nanolink_core::{
    Repository, ShortCode, ShortLink, Shortener, ShortenerError, StorageError, MAX_URL_LENGTH,
};
use nanolink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Default number of candidates tried before giving up on a create.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Tunables for [`ShortenerService`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerSettings {
    /// How many generated candidates to try per create. Values below one
    /// are treated as one.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Longest accepted original URL, in characters.
    #[builder(default = MAX_URL_LENGTH)]
    pub max_url_length: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation
/// - Short code generation
/// - Collision recovery
///
/// Generated codes are not checked before the insert. The repository's
/// unique constraint decides, and a conflicting candidate is replaced by a
/// fresh one up to `max_attempts` times.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, ShortenerSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Returns a reference to the repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// Only emptiness and length are checked; the URL's syntax is the
    /// client's business.
    fn validate_url(&self, url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl("URL is required".to_string()));
        }

        if url.chars().count() > self.settings.max_url_length {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must be at most {} characters",
                self.settings.max_url_length
            )));
        }

        Ok(())
    }

    fn max_attempts(&self) -> u32 {
        self.settings.max_attempts.max(1)
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, original_url: &str) -> Result<ShortLink, ShortenerError> {
        self.validate_url(original_url)?;

        let attempts = self.max_attempts();
        for attempt in 1..=attempts {
            let candidate: ShortCode = self.generator.generate().into();

            match self.repository.insert(&candidate, original_url).await {
                Ok(link) => {
                    debug!(code = %link.short_code, id = link.id, attempt, "created short link");
                    return Ok(link);
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %candidate, attempt, attempts, "short code collision, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ShortenerError::Exhausted { attempts })
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Option<ShortLink>, ShortenerError> {
        trace!(code = %code, "resolving short code");
        Ok(self.repository.get(code).await?)
    }
}
