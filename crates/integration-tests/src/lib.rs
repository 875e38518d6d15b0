//! Integration tests for the Kiyone storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kiyone-integration-tests
//! ```
//!
//! No external services are needed. [`FakeContentStore`] stands in for the
//! Sanity query API: an axum server on an ephemeral local port that answers
//! the storefront's GROQ queries from in-memory documents. Tests point
//! `SANITY_API_HOST` at it and drive either `SanityClient` directly or the
//! full router.
//!
//! # Test Categories
//!
//! - `sanity_client` - Content access over HTTP
//! - `storefront_routes` - Rendered pages through the router

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use kiyone_storefront::config::StorefrontConfig;
use kiyone_storefront::sanity::queries;
use kiyone_storefront::state::AppState;
use serde_json::{Value, json};

/// Project id used by every fake-store configuration.
pub const PROJECT_ID: &str = "testproj";

/// Dataset used by every fake-store configuration.
pub const DATASET: &str = "production";

/// Public site URL used in canonical links and the sitemap.
pub const SITE_URL: &str = "https://kiyone.tw";

// =============================================================================
// Fake Content Store
// =============================================================================

/// Documents served by the fake store, newest first.
///
/// Products are stored as full documents; card queries derive `mainImage`
/// from the first gallery image the way the real projection does. Posts are
/// stored with their related products already in card form.
#[derive(Debug, Clone, Default)]
pub struct Documents {
    pub products: Vec<Value>,
    pub posts: Vec<Value>,
}

/// A query received by the fake store.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    /// Decoded `$slug` parameter.
    pub slug: Option<String>,
    pub authorization: Option<String>,
}

/// How the fake store answers queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    /// Evaluate queries, slices included.
    Normal,
    /// Evaluate queries but return every document, ignoring `[0...n]` slices.
    OverDeliver,
    /// Answer every query with HTTP 500.
    Fail,
}

struct StoreState {
    documents: Documents,
    behavior: Behavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the Sanity query API.
pub struct FakeContentStore {
    addr: SocketAddr,
    state: Arc<StoreState>,
}

impl FakeContentStore {
    /// Serve `documents` until the test's runtime shuts down.
    pub async fn start(documents: Documents) -> Self {
        Self::spawn(documents, Behavior::Normal).await
    }

    /// A store that ignores list slices and returns every matching document.
    pub async fn over_delivering(documents: Documents) -> Self {
        Self::spawn(documents, Behavior::OverDeliver).await
    }

    /// A store that answers every query with HTTP 500.
    pub async fn failing() -> Self {
        Self::spawn(Documents::default(), Behavior::Fail).await
    }

    async fn spawn(documents: Documents, behavior: Behavior) -> Self {
        let state = Arc::new(StoreState {
            documents,
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(handle_query)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake content store");
        let addr = listener
            .local_addr()
            .expect("Fake content store has no local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake content store error");
        });

        Self { addr, state }
    }

    /// Origin to use as `SANITY_API_HOST`.
    #[must_use]
    pub fn api_host(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Storefront configuration pointing at this store.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        self.config_with(&[])
    }

    /// Storefront configuration pointing at this store, plus extra variables.
    #[must_use]
    pub fn config_with(&self, extra: &[(&str, &str)]) -> StorefrontConfig {
        let api_host = self.api_host();
        let mut vars = vec![
            ("SITE_URL", SITE_URL),
            ("SANITY_PROJECT_ID", PROJECT_ID),
            ("SANITY_DATASET", DATASET),
            ("SANITY_API_HOST", api_host.as_str()),
        ];
        vars.extend_from_slice(extra);
        storefront_config(&vars)
    }

    /// Every query received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn handle_query(
    State(state): State<Arc<StoreState>>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = params.get("query").cloned();
    let slug = params
        .get("$slug")
        .and_then(|raw| serde_json::from_str::<String>(raw).ok());

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            path: uri.path().to_string(),
            query: query.clone(),
            slug: slug.clone(),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });

    if state.behavior == Behavior::Fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "description": "dataset unavailable" } })),
        )
            .into_response();
    }

    if uri.path() != format!("/v2024-01-01/data/query/{DATASET}") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not Found", "message": "unknown endpoint" })),
        )
            .into_response();
    }

    let sliced = state.behavior == Behavior::Normal;
    let answer = query.and_then(|query| {
        state
            .documents
            .answer(query.trim(), slug.as_deref(), sliced)
    });
    match answer {
        Some(result) => Json(json!({ "result": result })).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "description": "unsupported query" } })),
        )
            .into_response(),
    }
}

impl Documents {
    /// Evaluate one of the storefront's queries; `None` for anything else.
    ///
    /// With `sliced` false, bounded lists come back unbounded.
    fn answer(&self, query: &str, slug: Option<&str>, sliced: bool) -> Option<Value> {
        let is = |candidate: &str| candidate.trim() == query;
        let bound = |limit: usize| if sliced { limit } else { usize::MAX };

        if is(queries::PRODUCT_BY_SLUG) {
            return Some(find_by_slug(&self.products, slug));
        }
        if is(queries::POST_BY_SLUG) {
            return Some(find_by_slug(&self.posts, slug));
        }
        if is(queries::FEATURED_PRODUCTS) {
            return Some(product_cards(
                &self.products,
                bound(queries::FEATURED_PRODUCTS_LIMIT),
            ));
        }
        if is(queries::ALL_PRODUCTS) {
            return Some(product_cards(&self.products, usize::MAX));
        }
        if is(queries::FEATURED_POSTS) {
            return Some(post_cards(&self.posts, bound(queries::FEATURED_POSTS_LIMIT)));
        }
        if is(queries::ALL_POSTS) {
            return Some(post_cards(&self.posts, usize::MAX));
        }
        None
    }
}

fn find_by_slug(documents: &[Value], slug: Option<&str>) -> Value {
    documents
        .iter()
        .find(|doc| slug.is_some() && doc.get("slug").and_then(Value::as_str) == slug)
        .cloned()
        .unwrap_or(Value::Null)
}

fn product_cards(products: &[Value], limit: usize) -> Value {
    Value::Array(products.iter().take(limit).map(product_card).collect())
}

fn post_cards(posts: &[Value], limit: usize) -> Value {
    Value::Array(
        posts
            .iter()
            .take(limit)
            .map(|post| {
                let mut card = post.clone();
                if let Some(fields) = card.as_object_mut() {
                    fields.remove("body");
                }
                card
            })
            .collect(),
    )
}

// =============================================================================
// Fixtures
// =============================================================================

/// Card projection of a full product document.
#[must_use]
pub fn product_card(product: &Value) -> Value {
    let mut card = product.clone();
    if let Some(fields) = card.as_object_mut() {
        let main_image = fields
            .get("images")
            .and_then(|images| images.get(0))
            .cloned()
            .unwrap_or(Value::Null);
        fields.insert("mainImage".to_string(), main_image);
        for key in ["images", "customOptions", "body", "_createdAt"] {
            fields.remove(key);
        }
    }
    card
}

/// A published product with one image, one option group and a short body.
///
/// `id` must be alphanumeric so the image reference resolves.
#[must_use]
pub fn product_doc(id: &str, slug: &str, title: &str, price: u32) -> Value {
    json!({
        "_id": id,
        "_createdAt": "2026-01-05T08:00:00Z",
        "_updatedAt": "2026-03-01T10:00:00Z",
        "title": title,
        "slug": slug,
        "price": price,
        "shopeeUrl": format!("https://shopee.tw/product/{id}"),
        "images": [image(id, &format!("{title} 正面"))],
        "customOptions": [
            { "groupName": "生肖", "choices": ["鼠", "牛", " "] }
        ],
        "body": [block(&format!("{title} 以鍍金工藝打造。"))]
    })
}

/// A published post with a one-paragraph body.
#[must_use]
pub fn post_doc(id: &str, slug: &str, title: &str, related_products: &[Value]) -> Value {
    json!({
        "_id": id,
        "_createdAt": "2026-02-01T08:00:00Z",
        "_updatedAt": "2026-03-02T08:30:00Z",
        "title": title,
        "slug": slug,
        "mainImage": image(id, title),
        "seoTitle": null,
        "seoDescription": format!("{title}的挑選重點"),
        "body": [block("彌月禮挑選的三個重點。")],
        "relatedProducts": related_products.iter().map(product_card).collect::<Vec<_>>()
    })
}

/// Image field referencing a 1200x1200 JPEG asset.
#[must_use]
pub fn image(id: &str, alt: &str) -> Value {
    json!({
        "_type": "image",
        "asset": { "_type": "reference", "_ref": format!("image-{id}-1200x1200-jpg") },
        "alt": alt
    })
}

/// Plain paragraph block.
#[must_use]
pub fn block(text: &str) -> Value {
    json!({
        "_type": "block",
        "_key": "k0",
        "style": "normal",
        "markDefs": [],
        "children": [{ "_type": "span", "_key": "s0", "text": text, "marks": [] }]
    })
}

// =============================================================================
// Storefront Helpers
// =============================================================================

/// Build configuration from explicit variables, ignoring the environment.
#[must_use]
pub fn storefront_config(vars: &[(&str, &str)]) -> StorefrontConfig {
    StorefrontConfig::from_lookup(|key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string())
    })
    .expect("Invalid test configuration")
}

/// Configuration with no content store.
#[must_use]
pub fn unconfigured() -> StorefrontConfig {
    storefront_config(&[("SITE_URL", SITE_URL)])
}

/// The storefront's bundled markdown pages.
#[must_use]
pub fn content_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/content")
}

/// The storefront's static assets.
#[must_use]
pub fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/static")
}

/// The full storefront router for `config`.
#[must_use]
pub fn test_app(config: StorefrontConfig) -> Router {
    let state = AppState::new(config, &content_dir()).expect("Failed to load bundled pages");
    kiyone_storefront::app(state, &static_dir())
}
