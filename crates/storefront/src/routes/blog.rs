//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::{ImageView, Layout, PostCardView, ProductCardView, content_path};
use crate::sanity::portable_text::{self, RichTextNode};
use crate::state::AppState;

/// Summary shown for listed posts without an SEO description.
const POST_SUMMARY_FALLBACK: &str = "閱讀更多彌月送禮與育兒情境內容。";

/// Meta description for posts without an SEO description or body text.
const POST_DESCRIPTION_FALLBACK: &str = "彌月送禮與母嬰選品內容。";

/// Post display data for templates.
#[derive(Clone)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub main_image: Option<ImageView>,
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub layout: Layout,
    pub posts: Vec<PostCardView>,
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub layout: Layout,
    pub post: PostView,
    /// Rendered body; read by `partials/rich_text.html`.
    pub body: Vec<RichTextNode>,
    pub related_products: Vec<ProductCardView>,
}

/// Display the blog index page with all posts.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let posts: Vec<PostCardView> = state
        .sanity()
        .get_all_posts()
        .await
        .iter()
        .map(|post| PostCardView::new(post, POST_SUMMARY_FALLBACK))
        .collect();

    BlogIndexTemplate {
        layout: Layout::for_page(
            state.config(),
            "/blog",
            "品牌專欄",
            "閱讀彌月送禮、母嬰祝福與金飾挑選內容。",
        ),
        posts,
    }
}

/// Display a single blog post by slug.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no post has this slug or the content
/// store is unavailable.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let post = state
        .sanity()
        .get_post_by_slug(&slug)
        .await
        .ok_or_else(|| AppError::NotFound(format!("post {slug}")))?;

    add_breadcrumb("navigation", "Viewed post", Some(&[("slug", post.slug.as_str())]));

    let main_image = post.main_image.as_ref().and_then(|image| {
        let view = ImageView::resolve(state.images(), Some(image), 1280, 720, &post.title);
        view.is_real.then_some(view)
    });
    let og_image = main_image.as_ref().map(|image| image.url.clone());

    let description = post
        .seo_description
        .clone()
        .or_else(|| portable_text::excerpt(&post.body, 120))
        .unwrap_or_else(|| POST_DESCRIPTION_FALLBACK.to_string());
    let page_title = post.seo_title.clone().unwrap_or_else(|| post.title.clone());

    let body = portable_text::render(&post.body);
    let related_products = post
        .related_products
        .iter()
        .map(|product| ProductCardView::new(product, state.images()))
        .collect();

    Ok(BlogShowTemplate {
        layout: Layout::for_page(
            state.config(),
            &content_path("blog", post.slug.as_str()),
            page_title,
            description,
        )
        .with_og_image(og_image),
        post: PostView {
            slug: post.slug.to_string(),
            title: post.title.clone(),
            description: post.seo_description.clone(),
            main_image,
        },
        body,
        related_products,
    })
}

/// Redirect a legacy `/posts/{slug}` URL to its blog page.
pub async fn legacy_redirect(Path(slug): Path<String>) -> Redirect {
    Redirect::permanent(&content_path("blog", &slug))
}
