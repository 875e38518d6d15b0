//! Sitemap and robots.txt.

use askama::Template;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::routes::content_path;
use crate::state::AppState;

/// A `<url>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

impl SitemapEntry {
    fn new(
        config: &StorefrontConfig,
        path: &str,
        lastmod: DateTime<Utc>,
        changefreq: &'static str,
        priority: &'static str,
    ) -> Self {
        Self {
            loc: config.absolute_url(path),
            lastmod: lastmod.to_rfc3339_opts(SecondsFormat::Secs, true),
            changefreq,
            priority,
        }
    }
}

/// Sitemap XML template.
#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub entries: Vec<SitemapEntry>,
}

/// Static pages with their change frequency and priority.
const STATIC_ROUTES: [(&str, &str, &str); 4] = [
    ("/", "weekly", "1.0"),
    ("/about", "monthly", "0.8"),
    ("/blog", "daily", "0.9"),
    ("/products", "weekly", "0.9"),
];

/// Build sitemap entries from content slugs and update times.
///
/// Documents without an update time use `now`.
#[must_use]
pub fn build_entries<'a>(
    config: &StorefrontConfig,
    now: DateTime<Utc>,
    posts: impl IntoIterator<Item = (&'a str, Option<DateTime<Utc>>)>,
    products: impl IntoIterator<Item = (&'a str, Option<DateTime<Utc>>)>,
) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = STATIC_ROUTES
        .iter()
        .map(|(path, changefreq, priority)| {
            SitemapEntry::new(config, path, now, changefreq, priority)
        })
        .collect();

    entries.extend(posts.into_iter().map(|(slug, updated_at)| {
        SitemapEntry::new(
            config,
            &content_path("blog", slug),
            updated_at.unwrap_or(now),
            "weekly",
            "0.8",
        )
    }));
    entries.extend(products.into_iter().map(|(slug, updated_at)| {
        SitemapEntry::new(
            config,
            &content_path("products", slug),
            updated_at.unwrap_or(now),
            "weekly",
            "0.8",
        )
    }));

    entries
}

/// Serve `/sitemap.xml`.
///
/// Posts and products are fetched concurrently. An unavailable content store
/// still yields the static pages.
///
/// # Errors
///
/// Returns `AppError::Template` if the XML fails to render.
#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let (posts, products) = tokio::join!(
        state.sanity().get_all_posts(),
        state.sanity().get_all_products(),
    );

    let entries = build_entries(
        state.config(),
        Utc::now(),
        posts.iter().map(|p| (p.slug.as_str(), p.updated_at)),
        products.iter().map(|p| (p.slug.as_str(), p.updated_at)),
    );
    let xml = SitemapTemplate { entries }.render()?;

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

/// Serve `/robots.txt`.
#[instrument(skip(state))]
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        state.config().absolute_url("/sitemap.xml")
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig::from_lookup(|key| {
            (key == "SITE_URL").then(|| "https://kiyone.tw/".to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_static_routes_only_when_store_is_empty() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let entries = build_entries(&config(), now, [], []);

        let locs: Vec<_> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            [
                "https://kiyone.tw/",
                "https://kiyone.tw/about",
                "https://kiyone.tw/blog",
                "https://kiyone.tw/products",
            ]
        );
        assert_eq!(entries[0].priority, "1.0");
        assert_eq!(entries[1].changefreq, "monthly");
        assert_eq!(entries[2].changefreq, "daily");
        assert_eq!(entries[0].lastmod, "2026-05-01T00:00:00Z");
    }

    #[test]
    fn test_content_entries_use_update_time() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap();
        let entries = build_entries(
            &config(),
            now,
            [("first-gift", Some(updated))],
            [("golden-spoon", None)],
        );

        assert_eq!(entries.len(), 6);
        assert_eq!(entries[4].loc, "https://kiyone.tw/blog/first-gift");
        assert_eq!(entries[4].lastmod, "2026-03-02T08:30:00Z");
        assert_eq!(entries[4].priority, "0.8");
        assert_eq!(entries[5].loc, "https://kiyone.tw/products/golden-spoon");
        assert_eq!(entries[5].lastmod, "2026-05-01T00:00:00Z");
    }

    #[test]
    fn test_sitemap_renders_xml() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let entries = build_entries(&config(), now, [("a&b c", None)], []);
        let xml = SitemapTemplate { entries }.render().unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://kiyone.tw/about</loc>"));
        assert!(xml.contains("<loc>https://kiyone.tw/blog/a%26b%20c</loc>"));
        assert!(!xml.contains("a&b"));
    }
}
