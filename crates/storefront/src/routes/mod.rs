//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured posts and products)
//! GET  /about                  - Brand story
//! GET  /health                 - Health check
//!
//! # Blog
//! GET  /blog                   - Post listing
//! GET  /blog/{slug}            - Post detail with related products
//! GET  /posts/{slug}           - Permanent redirect to /blog/{slug}
//!
//! # Products
//! GET  /products               - Full catalog
//! GET  /products/{slug}        - Product detail with checkout link
//!
//! # SEO
//! GET  /sitemap.xml            - Sitemap of static pages, posts and products
//! GET  /robots.txt             - Crawler rules
//! ```
//!
//! Unknown paths render the "not found" page with status 404.

pub mod blog;
pub mod home;
pub mod pages;
pub mod products;
pub mod sitemap;
mod views;

use axum::{Router, response::Response, routing::get};

use crate::config::{DEFAULT_MARKETPLACE_URL, StorefrontConfig};
use crate::error::not_found_page;
use crate::state::AppState;

pub use views::{ImageView, PostCardView, ProductCardView, content_path};

/// Site name appended to page titles.
pub const SITE_NAME: &str = "輕奢彌月金飾";

/// Site-wide description used when a page has none of its own.
pub const SITE_DESCRIPTION: &str = "母嬰送禮情境的輕奢金飾官網，結合內容導購與商品展示。";

/// Page chrome shared by every template (`base.html`).
#[derive(Debug, Clone)]
pub struct Layout {
    /// Page title without the site suffix.
    pub title: String,
    pub description: String,
    /// Absolute canonical URL.
    pub canonical_url: Option<String>,
    /// Absolute Open Graph image URL.
    pub og_image: Option<String>,
    /// Marketplace shop link used in the header and calls to action.
    pub marketplace_url: String,
}

impl Layout {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            canonical_url: None,
            og_image: None,
            marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
        }
    }

    /// Layout for a site path, with canonical URL and marketplace link from
    /// configuration.
    #[must_use]
    pub fn for_page(
        config: &StorefrontConfig,
        path: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            canonical_url: Some(config.absolute_url(path)),
            marketplace_url: config.marketplace_url.clone(),
            ..Self::new(title, description)
        }
    }

    #[must_use]
    pub fn with_og_image(mut self, url: Option<String>) -> Self {
        self.og_image = url;
        self
    }

    /// `<title>` text.
    #[must_use]
    pub fn full_title(&self) -> String {
        if self.title.is_empty() {
            SITE_NAME.to_string()
        } else {
            format!("{} | {SITE_NAME}", self.title)
        }
    }
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Brand story
        .route("/about", get(pages::about))
        // Blog routes
        .nest("/blog", blog_routes())
        // Legacy post URLs
        .route("/posts/{slug}", get(blog::legacy_redirect))
        // Product routes
        .nest("/products", product_routes())
        // SEO
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/robots.txt", get(sitemap::robots))
        .fallback(not_found)
}

/// Fallback for unknown paths.
async fn not_found() -> Response {
    not_found_page()
}
