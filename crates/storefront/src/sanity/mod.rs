//! Sanity content store client, image resolver and rich-text rendering.
//!
//! # Architecture
//!
//! - Static GROQ queries ([`queries`]) sent over HTTPS to the project's
//!   query endpoint with `reqwest`
//! - Responses decoded through lenient wire types (`wire`) and converted
//!   into strict domain types ([`types`]) by `conversions`
//! - Sanity is the source of truth: no local copy, no cache, no retries
//! - Image asset references resolve to CDN URLs without network access
//!   ([`image`])
//!
//! # Failure handling
//!
//! The public read operations on [`SanityClient`] never return errors.
//! Transport, API and decoding failures, as well as an unconfigured project,
//! are logged and surface as `None` (detail lookups) or an empty `Vec`
//! (lists), so page rendering never fails on content availability.
//!
//! # Example
//!
//! ```rust,ignore
//! use kiyone_storefront::sanity::{ImageResolver, SanityClient};
//!
//! let client = SanityClient::new(&config.sanity);
//! let images = ImageResolver::new(&config.sanity);
//!
//! if let Some(product) = client.get_product_by_slug("golden-spoon").await {
//!     let cover = images
//!         .resolve(product.images.first())
//!         .width(1200)
//!         .height(1200)
//!         .url();
//! }
//! ```

mod client;
mod conversions;
pub mod image;
pub mod portable_text;
pub mod queries;
pub mod types;
mod wire;

pub use client::SanityClient;
pub use image::{FALLBACK_IMAGE, ImageResolver, ImageUrlBuilder};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when querying the content store.
///
/// These never cross the [`SanityClient`] boundary; they exist so failures
/// can be logged with a precise cause.
#[derive(Debug, Error)]
pub enum SanityError {
    /// No project id is configured.
    #[error("Sanity client is not configured (set SANITY_PROJECT_ID)")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The query API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanity_error_display() {
        let err = SanityError::Api {
            status: 400,
            message: "expected '}' following object body".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (400): expected '}' following object body"
        );
    }

    #[test]
    fn test_not_configured_names_variable() {
        assert!(
            SanityError::NotConfigured
                .to_string()
                .contains("SANITY_PROJECT_ID")
        );
    }
}
