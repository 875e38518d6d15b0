//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::{Layout, PostCardView, ProductCardView};
use crate::state::AppState;

/// Summary shown for featured posts without an SEO description.
const POST_SUMMARY_FALLBACK: &str = "閱讀彌月送禮指南、寶寶祝福寓意與挑選建議。";

// =============================================================================
// Static Content
// =============================================================================

/// Hero copy above the fold.
#[derive(Clone)]
pub struct Hero {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub headline_accent: &'static str,
    pub lede: &'static str,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            eyebrow: "LUXURY BABY GIFT",
            headline: "彌月的第一份金飾祝福，",
            headline_accent: "要溫柔，也要有份量。",
            lede: "以母嬰送禮情境打造的輕奢金飾品牌，結合十二生肖與生辰花客製，讓每一份禮都能被記住。",
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero: Hero,
    /// Latest posts for the column teaser.
    pub posts: Vec<PostCardView>,
    /// Latest products for the product grid.
    pub products: Vec<ProductCardView>,
}

/// Display the home page.
///
/// Posts and products are fetched concurrently; either list may be empty.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let (posts, products) = tokio::join!(
        state.sanity().get_featured_posts(),
        state.sanity().get_featured_products(),
    );

    tracing::debug!(
        posts = posts.len(),
        products = products.len(),
        "Loaded home page content"
    );

    HomeTemplate {
        layout: Layout::for_page(
            state.config(),
            "/",
            "溫暖祝福的第一份禮",
            "專注母嬰送禮場景的輕奢金飾品牌，提供彌月禮盒、十二生肖與生辰花客製款式，兼具質感與心意。",
        ),
        hero: Hero::default(),
        posts: posts
            .iter()
            .map(|post| PostCardView::new(post, POST_SUMMARY_FALLBACK))
            .collect(),
        products: products
            .iter()
            .map(|product| ProductCardView::new(product, state.images()))
            .collect(),
    }
}
