//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::views::price_label;
use crate::routes::{ImageView, Layout, ProductCardView, content_path};
use crate::sanity::portable_text::{self, RichTextNode};
use crate::sanity::{CustomOptionGroup, Product};
use crate::state::AppState;

/// Gallery image edge length in pixels.
const GALLERY_SIZE: u32 = 1200;

/// Thumbnail edge length in pixels.
const THUMBNAIL_SIZE: u32 = 240;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub slug: String,
    pub title: String,
    pub price: String,
    pub images: Vec<GalleryImageView>,
    pub options: Vec<CustomOptionGroup>,
    pub checkout_url: Option<String>,
}

/// Gallery entry with its thumbnail.
#[derive(Clone)]
pub struct GalleryImageView {
    pub full: ImageView,
    pub thumbnail: ImageView,
    /// 1-based position, used in labels.
    pub position: usize,
}

impl ProductView {
    fn new(product: &Product, state: &AppState) -> Self {
        let images = product
            .images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                let position = index + 1;
                let fallback_alt = format!("{} 商品圖 {position}", product.title);
                GalleryImageView {
                    full: ImageView::resolve(
                        state.images(),
                        Some(image),
                        GALLERY_SIZE,
                        GALLERY_SIZE,
                        &fallback_alt,
                    ),
                    thumbnail: ImageView::resolve(
                        state.images(),
                        Some(image),
                        THUMBNAIL_SIZE,
                        THUMBNAIL_SIZE,
                        &fallback_alt,
                    ),
                    position,
                }
            })
            .collect();

        Self {
            slug: product.slug.to_string(),
            title: product.title.clone(),
            price: price_label(product.price.as_ref()),
            images,
            options: product.custom_options.clone(),
            checkout_url: product.checkout_url.as_ref().map(ToString::to_string),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCardView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    /// Rendered description; read by `partials/rich_text.html`.
    pub body: Vec<RichTextNode>,
}

/// Display the product catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let products = state
        .sanity()
        .get_all_products()
        .await
        .iter()
        .map(|product| ProductCardView::new(product, state.images()))
        .collect();

    ProductsIndexTemplate {
        layout: Layout::for_page(
            state.config(),
            "/products",
            "商品列表",
            "瀏覽彌月金飾禮盒與可客製化款式。",
        ),
        products,
    }
}

/// Display product detail page.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no product has this slug or the content
/// store is unavailable.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state
        .sanity()
        .get_product_by_slug(&slug)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    add_breadcrumb(
        "navigation",
        "Viewed product",
        Some(&[("slug", product.slug.as_str())]),
    );

    let view = ProductView::new(&product, &state);
    let description = format!(
        "{}，{}，可選客製化款式，立即查看商品細節。",
        view.title, view.price
    );
    let og_image = product.cover_image().and_then(|cover| {
        let builder = state.images().resolve(Some(cover)).width(1200).height(630);
        (!builder.is_placeholder()).then(|| builder.url())
    });

    Ok(ProductShowTemplate {
        layout: Layout::for_page(
            state.config(),
            &content_path("products", product.slug.as_str()),
            view.title.clone(),
            description,
        )
        .with_og_image(og_image),
        body: portable_text::render(&product.body),
        product: view,
    })
}
