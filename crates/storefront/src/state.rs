//! Application state shared across handlers.

use std::path::Path;
use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::sanity::{ImageResolver, SanityClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    sanity: SanityClient,
    images: ImageResolver,
    pages: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `content_dir` - Directory holding `pages/*.md`
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read.
    pub fn new(config: StorefrontConfig, content_dir: &Path) -> Result<Self, ContentError> {
        let pages = ContentStore::load(content_dir)?;
        Ok(Self::with_pages(config, pages))
    }

    /// Create application state around an already loaded page store.
    #[must_use]
    pub fn with_pages(config: StorefrontConfig, pages: ContentStore) -> Self {
        let sanity = SanityClient::new(&config.sanity);
        let images = ImageResolver::new(&config.sanity);

        if !sanity.is_configured() {
            tracing::warn!("SANITY_PROJECT_ID is not set; content pages will be empty");
        }

        Self {
            inner: Arc::new(AppStateInner {
                config,
                sanity,
                images,
                pages,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Sanity content client.
    #[must_use]
    pub fn sanity(&self) -> &SanityClient {
        &self.inner.sanity
    }

    /// Get a reference to the image resolver.
    #[must_use]
    pub fn images(&self) -> &ImageResolver {
        &self.inner.images
    }

    /// Get a reference to the static page store.
    #[must_use]
    pub fn pages(&self) -> &ContentStore {
        &self.inner.pages
    }
}
