//! Image reference resolution.
//!
//! Sanity image fields store an asset reference such as
//! `image-abc123-1200x800-jpg`. The CDN serves that asset at
//! `https://cdn.sanity.io/images/{project}/{dataset}/abc123-1200x800.jpg`,
//! with resizing requested through query parameters. Resolution is pure
//! string work; nothing here touches the network.
//!
//! Any image that cannot be resolved (missing field, missing reference,
//! malformed reference, unconfigured project) resolves to
//! [`FALLBACK_IMAGE`], a neutral square that keeps page layout intact.

use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use crate::config::SanityConfig;

use super::types::SanityImage;

/// Neutral placeholder served whenever an image cannot be resolved.
pub const FALLBACK_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 1200 1200%22%3E%3Crect width=%221200%22 height=%221200%22 fill=%22%23f5f5f4%22/%3E%3C/svg%3E";

const CDN_ORIGIN: &str = "https://cdn.sanity.io/images";

/// `image-{id}-{width}x{height}-{format}`
static ASSET_REF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^image-([a-zA-Z0-9]+)-(\d+x\d+)-([a-z0-9]+)$").ok());

/// Resolves image fields to CDN URLs for one project and dataset.
#[derive(Debug, Clone, Default)]
pub struct ImageResolver {
    /// `https://cdn.sanity.io/images/{project}/{dataset}`, or `None` when
    /// no project is configured.
    cdn_base: Option<String>,
}

impl ImageResolver {
    #[must_use]
    pub fn new(config: &SanityConfig) -> Self {
        Self {
            cdn_base: config
                .project()
                .map(|p| format!("{CDN_ORIGIN}/{}/{}", p.project_id, p.dataset)),
        }
    }

    /// Start building a URL for an image field.
    ///
    /// Never fails; unresolvable images produce a builder that yields
    /// [`FALLBACK_IMAGE`].
    #[must_use]
    pub fn resolve(&self, image: Option<&SanityImage>) -> ImageUrlBuilder {
        let alt = image.and_then(|i| i.alt.clone());
        let base = image
            .and_then(|i| i.asset_ref.as_deref())
            .and_then(|reference| self.asset_url(reference));

        ImageUrlBuilder {
            base,
            alt,
            width: None,
            height: None,
        }
    }

    fn asset_url(&self, reference: &str) -> Option<String> {
        let cdn_base = self.cdn_base.as_deref()?;
        let Some(captures) = ASSET_REF.as_ref().and_then(|re| re.captures(reference)) else {
            tracing::debug!(reference, "Unrecognized image asset reference");
            return None;
        };
        let id = captures.get(1)?.as_str();
        let dimensions = captures.get(2)?.as_str();
        let format = captures.get(3)?.as_str();
        Some(format!("{cdn_base}/{id}-{dimensions}.{format}"))
    }
}

/// Builder for a sized image URL.
///
/// Width and height are optional; setting either one again replaces the
/// earlier value, and `0` clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    base: Option<String>,
    alt: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl ImageUrlBuilder {
    /// Request a width in pixels.
    #[must_use]
    pub const fn width(mut self, width: u32) -> Self {
        self.width = if width == 0 { None } else { Some(width) };
        self
    }

    /// Request a height in pixels.
    #[must_use]
    pub const fn height(mut self, height: u32) -> Self {
        self.height = if height == 0 { None } else { Some(height) };
        self
    }

    /// Final URL, or [`FALLBACK_IMAGE`] when the image is unresolvable.
    ///
    /// Requests always crop to the requested box and let the CDN pick the
    /// best format for the client.
    #[must_use]
    pub fn url(&self) -> String {
        let Some(base) = self.base.as_deref() else {
            return FALLBACK_IMAGE.to_string();
        };

        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(width) = self.width {
            query.append_pair("w", &width.to_string());
        }
        if let Some(height) = self.height {
            query.append_pair("h", &height.to_string());
        }
        query.append_pair("fit", "crop");
        query.append_pair("auto", "format");

        format!("{base}?{}", query.finish())
    }

    /// Author alt text, if any.
    #[must_use]
    pub fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }

    /// Alt text with a fallback (typically the document title).
    #[must_use]
    pub fn alt_or(&self, fallback: &str) -> String {
        self.alt().unwrap_or(fallback).to_string()
    }

    /// Whether [`url`](Self::url) will return the placeholder.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.base.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::SanityProject;

    use super::*;

    fn resolver() -> ImageResolver {
        ImageResolver::new(&SanityConfig::Configured(
            SanityProject::new("abc123xy", "production").unwrap(),
        ))
    }

    fn image(reference: &str) -> SanityImage {
        SanityImage {
            asset_ref: Some(reference.to_string()),
            alt: Some("金湯匙".to_string()),
            ..SanityImage::default()
        }
    }

    #[test]
    fn test_resolves_reference_to_cdn_url() {
        let url = resolver()
            .resolve(Some(&image("image-abc123-1200x800-jpg")))
            .width(600)
            .height(400)
            .url();
        assert_eq!(
            url,
            "https://cdn.sanity.io/images/abc123xy/production/abc123-1200x800.jpg?w=600&h=400&fit=crop&auto=format"
        );
    }

    #[test]
    fn test_unsized_url_keeps_fit_and_format() {
        let url = resolver().resolve(Some(&image("image-Zx9-10x10-png"))).url();
        assert_eq!(
            url,
            "https://cdn.sanity.io/images/abc123xy/production/Zx9-10x10.png?fit=crop&auto=format"
        );
    }

    #[test]
    fn test_only_width() {
        let url = resolver()
            .resolve(Some(&image("image-abc123-1200x800-webp")))
            .width(300)
            .url();
        assert!(url.ends_with("abc123-1200x800.webp?w=300&fit=crop&auto=format"));
    }

    #[test]
    fn test_last_write_wins_and_zero_clears() {
        let builder = resolver().resolve(Some(&image("image-abc123-1200x800-jpg")));
        let url = builder.clone().width(100).width(200).url();
        assert!(url.contains("w=200"));
        assert!(!url.contains("w=100"));

        let url = builder.width(100).width(0).url();
        assert!(!url.contains("w="));
    }

    #[test]
    fn test_url_is_idempotent() {
        let builder = resolver()
            .resolve(Some(&image("image-abc123-1200x800-jpg")))
            .width(800);
        assert_eq!(builder.url(), builder.url());
    }

    #[test]
    fn test_missing_image_is_placeholder() {
        let builder = resolver().resolve(None);
        assert!(builder.is_placeholder());
        assert_eq!(builder.width(600).url(), FALLBACK_IMAGE);

        let builder = resolver().resolve(Some(&SanityImage::default()));
        assert_eq!(builder.url(), FALLBACK_IMAGE);
    }

    #[test]
    fn test_malformed_references_are_placeholder() {
        for reference in [
            "file-abc123-pdf",
            "image-abc123-jpg",
            "image-abc_123-10x10-jpg",
            "image-abc123-10x10-JPG",
            "image-abc123-10x10-jpg-extra",
            "",
        ] {
            assert_eq!(
                resolver().resolve(Some(&image(reference))).url(),
                FALLBACK_IMAGE,
                "{reference}"
            );
        }
    }

    #[test]
    fn test_unconfigured_resolver_is_placeholder() {
        let resolver = ImageResolver::new(&SanityConfig::Unconfigured);
        let builder = resolver.resolve(Some(&image("image-abc123-1200x800-jpg")));
        assert_eq!(builder.url(), FALLBACK_IMAGE);
        assert_eq!(builder.alt(), Some("金湯匙"));
    }

    #[test]
    fn test_alt_fallback() {
        let builder = resolver().resolve(None);
        assert_eq!(builder.alt_or("金湯匙"), "金湯匙");
    }

    #[test]
    fn test_placeholder_is_inline_svg() {
        assert!(FALLBACK_IMAGE.starts_with("data:image/svg+xml,"));
        assert!(FALLBACK_IMAGE.contains("%23f5f5f4"));
    }
}
