//! Sanity query API client.
//!
//! Sends GROQ queries as `GET {api_host}/v{version}/data/query/{dataset}`
//! with parameters JSON-encoded into `$name` query pairs. Every call goes
//! to the live API (no CDN, no cache) so published edits show up on the
//! next request.

use std::sync::Arc;

use kiyone_core::Slug;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::config::SanityConfig;

use super::SanityError;
use super::conversions::{convert_post, convert_post_card, convert_product, convert_product_card};
use super::queries;
use super::types::{Post, PostCard, Product, ProductCard};
use super::wire::{QueryResponse, RawPost, RawPostCard, RawProduct, RawProductCard, lenient};

// =============================================================================
// SanityClient
// =============================================================================

/// Read-only client for the storefront's content.
///
/// Cheap to clone. Public operations never fail: every problem is logged
/// and reported as "not found" or an empty list.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    /// `None` when no project is configured.
    endpoint: Option<Endpoint>,
}

struct Endpoint {
    query_url: Url,
    read_token: Option<SecretString>,
}

impl std::fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityClient")
            .field(
                "query_url",
                &self.inner.endpoint.as_ref().map(|e| e.query_url.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl SanityClient {
    /// Create a client for the configured project.
    ///
    /// An unconfigured project yields a client whose reads all come back
    /// empty without any network traffic.
    #[must_use]
    pub fn new(config: &SanityConfig) -> Self {
        let endpoint = config.project().and_then(|project| {
            let mut query_url = project.api_host.clone();
            let segments_ok = query_url
                .path_segments_mut()
                .map(|mut segments| {
                    segments.pop_if_empty().extend([
                        format!("v{}", project.api_version).as_str(),
                        "data",
                        "query",
                        project.dataset.as_str(),
                    ]);
                })
                .is_ok();
            if !segments_ok {
                tracing::error!(
                    api_host = %project.api_host,
                    "Sanity API host cannot carry a path; reads are disabled"
                );
                return None;
            }
            Some(Endpoint {
                query_url,
                read_token: project.read_token.clone(),
            })
        });

        Self {
            inner: Arc::new(SanityClientInner {
                client: reqwest::Client::new(),
                endpoint,
            }),
        }
    }

    /// Whether reads reach a project.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.endpoint.is_some()
    }

    /// Run a GROQ query and return the raw `result` value.
    async fn query(&self, query: &str, params: &[(&str, &str)]) -> Result<Value, SanityError> {
        let endpoint = self
            .inner
            .endpoint
            .as_ref()
            .ok_or(SanityError::NotConfigured)?;

        let mut url = endpoint.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query.trim());
            for (name, value) in params {
                // Parameter values are GROQ literals, so strings travel JSON-encoded
                pairs.append_pair(&format!("${name}"), &Value::from(*value).to_string());
            }
        }

        let mut request = self.inner.client.get(url);
        if let Some(token) = &endpoint.read_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SanityError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: QueryResponse = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }

    /// Fetch and decode a single document; `null` means no match.
    async fn fetch_one<T: DeserializeOwned>(
        &self,
        query: &str,
        slug: &Slug,
    ) -> Result<Option<T>, SanityError> {
        let result = self.query(query, &[("slug", slug.as_str())]).await?;
        if result.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(result)?))
    }

    /// Fetch a list, dropping elements that fail to decode.
    async fn fetch_list<T: DeserializeOwned>(&self, query: &str) -> Result<Vec<T>, SanityError> {
        let result = self.query(query, &[]).await?;
        Ok(lenient::collect_items(result))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its slug.
    ///
    /// Returns `None` for a blank slug (without querying), an unknown slug,
    /// or any failure.
    #[instrument(skip(self))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Option<Product> {
        let slug = parse_slug(slug)?;
        match self.fetch_one::<RawProduct>(queries::PRODUCT_BY_SLUG, &slug).await {
            Ok(raw) => raw.and_then(convert_product),
            Err(e) => {
                log_failure("get_product_by_slug", Some(&slug), &e);
                None
            }
        }
    }

    /// Most recently updated products for the home page.
    #[instrument(skip(self))]
    pub async fn get_featured_products(&self) -> Vec<ProductCard> {
        self.product_cards("get_featured_products", queries::FEATURED_PRODUCTS)
            .await
            .into_iter()
            .take(queries::FEATURED_PRODUCTS_LIMIT)
            .collect()
    }

    /// Every product with a slug, most recently updated first.
    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> Vec<ProductCard> {
        self.product_cards("get_all_products", queries::ALL_PRODUCTS)
            .await
    }

    async fn product_cards(&self, operation: &str, query: &str) -> Vec<ProductCard> {
        match self.fetch_list::<RawProductCard>(query).await {
            Ok(raw) => raw.into_iter().filter_map(convert_product_card).collect(),
            Err(e) => {
                log_failure(operation, None, &e);
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Post Methods
    // =========================================================================

    /// Get a post by its slug, with related products resolved.
    ///
    /// Returns `None` for a blank slug (without querying), an unknown slug,
    /// or any failure.
    #[instrument(skip(self))]
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        let slug = parse_slug(slug)?;
        match self.fetch_one::<RawPost>(queries::POST_BY_SLUG, &slug).await {
            Ok(raw) => raw.and_then(convert_post),
            Err(e) => {
                log_failure("get_post_by_slug", Some(&slug), &e);
                None
            }
        }
    }

    /// Most recently updated posts for the home page.
    #[instrument(skip(self))]
    pub async fn get_featured_posts(&self) -> Vec<PostCard> {
        self.post_cards("get_featured_posts", queries::FEATURED_POSTS)
            .await
            .into_iter()
            .take(queries::FEATURED_POSTS_LIMIT)
            .collect()
    }

    /// Every post with a slug, most recently updated first.
    #[instrument(skip(self))]
    pub async fn get_all_posts(&self) -> Vec<PostCard> {
        self.post_cards("get_all_posts", queries::ALL_POSTS).await
    }

    async fn post_cards(&self, operation: &str, query: &str) -> Vec<PostCard> {
        match self.fetch_list::<RawPostCard>(query).await {
            Ok(raw) => raw.into_iter().filter_map(convert_post_card).collect(),
            Err(e) => {
                log_failure(operation, None, &e);
                Vec::new()
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_slug(raw: &str) -> Option<Slug> {
    match Slug::parse(raw) {
        Ok(slug) => Some(slug),
        Err(e) => {
            tracing::debug!(slug = raw, error = %e, "Skipping lookup for unusable slug");
            None
        }
    }
}

fn log_failure(operation: &str, slug: Option<&Slug>, error: &SanityError) {
    let slug = slug.map(Slug::as_str);
    match error {
        SanityError::NotConfigured => {
            tracing::warn!(operation, slug, "Sanity is not configured, returning no content");
        }
        _ => {
            tracing::error!(operation, slug, error = %error, "Sanity query failed");
        }
    }
}

/// Pull a readable message out of an error body.
///
/// The query API reports either `{"error": {"description": ...}}` or
/// `{"error": ..., "message": ...}`; anything else is truncated raw text.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        value
            .pointer("/error/description")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    message.unwrap_or_else(|| body.chars().take(200).collect())
}
