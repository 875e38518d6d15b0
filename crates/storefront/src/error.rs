//! Unified error handling with Sentry integration.
//!
//! Content availability never produces an error: the Sanity client absorbs
//! its own failures. `AppError` covers what is left, which is a missing
//! page and template or internal faults. Server errors are captured to
//! Sentry before the response is built.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::filters;
use crate::routes::Layout;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The storefront's "not found" page.
#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::NotFound(what) = &self {
            tracing::debug!(what = %what, "Not found");
            return not_found_page();
        }

        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose internal error details to clients
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Render the 404 page, falling back to plain text if the template fails.
#[must_use]
pub fn not_found_page() -> Response {
    let page = NotFoundTemplate {
        layout: Layout::new("找不到頁面", "您要找的頁面不存在或已下架。"),
    };
    match page.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render not-found page");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for page views.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of pages
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
