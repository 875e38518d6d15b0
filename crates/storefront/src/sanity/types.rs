//! Domain types for Sanity content.
//!
//! These are read-only, request-scoped copies of documents owned by the
//! content store. Every optional field is an explicit `Option` or an empty
//! `Vec`; the conversion layer has already applied fallbacks, so templates
//! never see malformed data.

use chrono::{DateTime, Utc};
use kiyone_core::{Price, PostId, ProductId, Slug};
use url::Url;

use super::portable_text::Block;

// =============================================================================
// Image Types
// =============================================================================

/// An image field: an asset reference plus author metadata.
///
/// The reference is opaque here; [`super::ImageResolver`] turns it into a
/// delivery URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanityImage {
    /// Asset reference (e.g., `image-abc123-1200x800-jpg`).
    pub asset_ref: Option<String>,
    /// Alt text for accessibility.
    pub alt: Option<String>,
    /// Author crop, as fractions trimmed from each edge.
    pub crop: Option<ImageCrop>,
    /// Author focal point.
    pub hotspot: Option<ImageHotspot>,
}

/// Crop rectangle (fractions of the source image, 0.0 - 1.0).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageCrop {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Focal region (center point and size, fractions of the source image).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageHotspot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// =============================================================================
// Product Types
// =============================================================================

/// A named customization group (e.g., zodiac animal or birth flower).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOptionGroup {
    /// Group label shown above the choices.
    pub label: String,
    /// Non-empty ordered choices.
    pub choices: Vec<String>,
}

/// Product projection for lists and related-product blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: ProductId,
    pub title: String,
    pub slug: Slug,
    /// `None` when the document has no valid price.
    pub price: Option<Price>,
    /// First product image.
    pub main_image: Option<SanityImage>,
    /// Marketplace checkout link; `None` means "not orderable yet".
    pub checkout_url: Option<Url>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full product document.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: Slug,
    pub price: Option<Price>,
    pub checkout_url: Option<Url>,
    /// Gallery images; the first is the cover.
    pub images: Vec<SanityImage>,
    pub custom_options: Vec<CustomOptionGroup>,
    pub body: Vec<Block>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Cover image (first gallery image).
    #[must_use]
    pub fn cover_image(&self) -> Option<&SanityImage> {
        self.images.first()
    }
}

// =============================================================================
// Post Types
// =============================================================================

/// Post projection for lists.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub slug: Slug,
    pub main_image: Option<SanityImage>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    /// Shallow related-product summary; empty when none are linked.
    pub related_products: Vec<ProductCard>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full post document.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: Slug,
    pub main_image: Option<SanityImage>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub body: Vec<Block>,
    /// Related products in author order; empty when none are linked.
    pub related_products: Vec<ProductCard>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
