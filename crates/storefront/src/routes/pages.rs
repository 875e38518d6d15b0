//! Static content page route handlers.
//!
//! Serves markdown-based pages bundled with the storefront.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::NaiveDate;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::{Layout, SITE_DESCRIPTION};
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub eyebrow: Option<String>,
    pub headline: String,
    pub lede: Option<String>,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Serve a content page by slug.
fn serve_content_page(state: &AppState, path: &str, slug: &str) -> Result<ContentPageTemplate> {
    let page = state
        .pages()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        layout: Layout::for_page(
            state.config(),
            path,
            page.meta.title.clone(),
            page.meta
                .description
                .clone()
                .unwrap_or_else(|| SITE_DESCRIPTION.to_string()),
        ),
        eyebrow: page.meta.eyebrow.clone(),
        headline: page
            .meta
            .headline
            .clone()
            .unwrap_or_else(|| page.meta.title.clone()),
        lede: page.meta.lede.clone(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// Display the brand story page.
///
/// # Errors
///
/// Returns 404 if the page file was not loaded.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> Result<impl IntoResponse> {
    serve_content_page(&state, "/about", "about")
}
