//! Conversions from wire shapes into domain types.
//!
//! A document without an id or a usable slug cannot be linked to, so it is
//! dropped with a warning. Every other defect is repaired with a fallback.

use chrono::{DateTime, Utc};
use kiyone_core::{CurrencyCode, PostId, Price, ProductId, Slug};
use rust_decimal::Decimal;
use url::Url;

use super::portable_text::{Block, BlockStyle, ListKind, Mark, Span};
use super::types::{
    CustomOptionGroup, ImageCrop, ImageHotspot, Post, PostCard, Product, ProductCard, SanityImage,
};
use super::wire::{
    RawBlock, RawImage, RawMarkDef, RawOptionGroup, RawPost, RawPostCard, RawProduct,
    RawProductCard, RawSpan,
};

/// Title shown for a post without one.
pub const UNTITLED_POST: &str = "未命名文章";

/// Title shown for a product without one.
pub const UNTITLED_PRODUCT: &str = "未命名商品";

// =============================================================================
// Documents
// =============================================================================

pub fn convert_product_card(raw: RawProductCard) -> Option<ProductCard> {
    let (id, slug) = identity(raw.id, raw.slug.as_deref(), "product")?;
    Some(ProductCard {
        id: ProductId::new(id),
        title: raw.title.unwrap_or_else(|| UNTITLED_PRODUCT.to_string()),
        slug,
        price: convert_price(raw.price),
        main_image: raw.main_image.map(convert_image),
        checkout_url: raw.checkout_url.as_deref().and_then(convert_checkout_url),
        updated_at: parse_timestamp(raw.updated_at.as_deref()),
    })
}

pub fn convert_product(raw: RawProduct) -> Option<Product> {
    let (id, slug) = identity(raw.id, raw.slug.as_deref(), "product")?;
    Some(Product {
        id: ProductId::new(id),
        title: raw.title.unwrap_or_else(|| UNTITLED_PRODUCT.to_string()),
        slug,
        price: convert_price(raw.price),
        checkout_url: raw.checkout_url.as_deref().and_then(convert_checkout_url),
        images: raw.images.into_iter().map(convert_image).collect(),
        custom_options: raw
            .custom_options
            .into_iter()
            .filter_map(convert_option_group)
            .collect(),
        body: convert_blocks(raw.body),
        created_at: parse_timestamp(raw.created_at.as_deref()),
        updated_at: parse_timestamp(raw.updated_at.as_deref()),
    })
}

pub fn convert_post_card(raw: RawPostCard) -> Option<PostCard> {
    let (id, slug) = identity(raw.id, raw.slug.as_deref(), "post")?;
    Some(PostCard {
        id: PostId::new(id),
        title: raw.title.unwrap_or_else(|| UNTITLED_POST.to_string()),
        slug,
        main_image: raw.main_image.map(convert_image),
        seo_title: raw.seo_title,
        seo_description: raw.seo_description,
        related_products: convert_related(raw.related_products),
        updated_at: parse_timestamp(raw.updated_at.as_deref()),
    })
}

pub fn convert_post(raw: RawPost) -> Option<Post> {
    let (id, slug) = identity(raw.id, raw.slug.as_deref(), "post")?;
    Some(Post {
        id: PostId::new(id),
        title: raw.title.unwrap_or_else(|| UNTITLED_POST.to_string()),
        slug,
        main_image: raw.main_image.map(convert_image),
        seo_title: raw.seo_title,
        seo_description: raw.seo_description,
        body: convert_blocks(raw.body),
        related_products: convert_related(raw.related_products),
        created_at: parse_timestamp(raw.created_at.as_deref()),
        updated_at: parse_timestamp(raw.updated_at.as_deref()),
    })
}

fn convert_related(raw: Vec<RawProductCard>) -> Vec<ProductCard> {
    raw.into_iter().filter_map(convert_product_card).collect()
}

fn identity(id: Option<String>, slug: Option<&str>, kind: &str) -> Option<(String, Slug)> {
    let Some(id) = id else {
        tracing::warn!(kind, slug = ?slug, "Dropping document without _id");
        return None;
    };
    match slug.map(Slug::parse) {
        Some(Ok(slug)) => Some((id, slug)),
        Some(Err(e)) => {
            tracing::warn!(kind, id = %id, error = %e, "Dropping document with invalid slug");
            None
        }
        None => {
            tracing::warn!(kind, id = %id, "Dropping document without slug");
            None
        }
    }
}

// =============================================================================
// Fields
// =============================================================================

pub fn convert_image(raw: RawImage) -> SanityImage {
    SanityImage {
        asset_ref: raw.asset.and_then(|a| a.reference),
        alt: raw.alt,
        crop: raw.crop.map(|c| ImageCrop {
            top: c.top,
            bottom: c.bottom,
            left: c.left,
            right: c.right,
        }),
        hotspot: raw.hotspot.map(|h| ImageHotspot {
            x: h.x,
            y: h.y,
            width: h.width,
            height: h.height,
        }),
    }
}

fn convert_price(amount: Option<Decimal>) -> Option<Price> {
    amount.and_then(|amount| Price::non_negative(amount, CurrencyCode::TWD))
}

/// Only absolute web links can be used as a checkout target.
fn convert_checkout_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn convert_option_group(raw: RawOptionGroup) -> Option<CustomOptionGroup> {
    let label = raw.group_name?.trim().to_string();
    let choices: Vec<String> = raw
        .choices
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if choices.is_empty() {
        return None;
    }
    Some(CustomOptionGroup { label, choices })
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// =============================================================================
// Portable Text
// =============================================================================

pub fn convert_blocks(raw: Vec<RawBlock>) -> Vec<Block> {
    raw.into_iter().filter_map(convert_block).collect()
}

/// Convert a text block. Embedded objects (images, custom types) are skipped.
fn convert_block(raw: RawBlock) -> Option<Block> {
    if raw.kind.as_deref() != Some("block") {
        return None;
    }

    let RawBlock {
        style,
        list_item,
        mark_defs,
        children,
        ..
    } = raw;

    let spans = children
        .into_iter()
        .filter(|span| span.kind.as_deref().is_none_or(|k| k == "span"))
        .map(|span| convert_span(span, &mark_defs))
        .collect();

    Some(Block {
        style: style.as_deref().map_or_else(BlockStyle::default, BlockStyle::parse),
        list: list_item.as_deref().and_then(ListKind::parse),
        spans,
    })
}

fn convert_span(raw: RawSpan, mark_defs: &[RawMarkDef]) -> Span {
    let marks = raw
        .marks
        .iter()
        .filter_map(|name| {
            Mark::decorator(name).or_else(|| {
                mark_defs
                    .iter()
                    .find(|def| def.key.as_deref() == Some(name.as_str()))
                    .filter(|def| def.kind.as_deref() == Some("link"))
                    .and_then(|def| def.href.clone())
                    .map(Mark::Link)
            })
        })
        .collect();

    Span {
        text: raw.text,
        marks,
    }
}
