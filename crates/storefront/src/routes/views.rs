//! Template view models shared across pages.
//!
//! Views hold display-ready strings so templates stay free of fallback
//! logic: prices are formatted, image URLs resolved, and missing values
//! replaced with the copy shoppers see.

use crate::sanity::{ImageResolver, PostCard, ProductCard, SanityImage};

/// Shown instead of a price when a product has none.
pub const PRICE_PENDING: &str = "尚未設定價格";

/// Shown when a post links no products.
pub const NO_RELATED_PRODUCT: &str = "尚未設定";

/// Resolved image for templates.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
    /// False when `url` is the placeholder.
    pub is_real: bool,
}

impl ImageView {
    /// Resolve an image at a fixed size, with alt text falling back to
    /// `fallback_alt`.
    #[must_use]
    pub fn resolve(
        images: &ImageResolver,
        image: Option<&SanityImage>,
        width: u32,
        height: u32,
        fallback_alt: &str,
    ) -> Self {
        let builder = images.resolve(image).width(width).height(height);
        Self {
            url: builder.url(),
            alt: builder.alt_or(fallback_alt),
            is_real: !builder.is_placeholder(),
        }
    }
}

/// Product card for grids and related-product blocks.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    /// Detail page path.
    pub href: String,
    pub title: String,
    pub price: String,
    pub image: ImageView,
    pub checkout_url: Option<String>,
}

impl ProductCardView {
    #[must_use]
    pub fn new(card: &ProductCard, images: &ImageResolver) -> Self {
        Self {
            href: content_path("products", card.slug.as_str()),
            title: card.title.clone(),
            price: price_label(card.price.as_ref()),
            image: ImageView::resolve(images, card.main_image.as_ref(), 800, 1000, &card.title),
            checkout_url: card.checkout_url.as_ref().map(ToString::to_string),
        }
    }
}

/// Post card for listings.
#[derive(Debug, Clone)]
pub struct PostCardView {
    /// Post page path.
    pub href: String,
    pub title: String,
    pub summary: String,
    /// Title of the first related product, or [`NO_RELATED_PRODUCT`].
    pub related_title: String,
}

impl PostCardView {
    #[must_use]
    pub fn new(card: &PostCard, fallback_summary: &str) -> Self {
        Self {
            href: content_path("blog", card.slug.as_str()),
            title: card.title.clone(),
            summary: card
                .seo_description
                .clone()
                .unwrap_or_else(|| fallback_summary.to_string()),
            related_title: card
                .related_products
                .first()
                .map_or_else(|| NO_RELATED_PRODUCT.to_string(), |p| p.title.clone()),
        }
    }
}

/// Site path for a document in `section`, with the slug encoded as a
/// single path segment.
#[must_use]
pub fn content_path(section: &str, slug: &str) -> String {
    format!("/{section}/{}", urlencoding::encode(slug))
}

/// Display price, or [`PRICE_PENDING`].
#[must_use]
pub fn price_label(price: Option<&kiyone_core::Price>) -> String {
    price.map_or_else(|| PRICE_PENDING.to_string(), kiyone_core::Price::format)
}
