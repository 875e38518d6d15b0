//! Integration tests for rendered storefront pages.
//!
//! Requests go through the full router (middleware included) with
//! `tower::ServiceExt::oneshot`; content comes from a fake query API.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use kiyone_integration_tests::{
    Documents, FakeContentStore, post_doc, product_doc, test_app, unconfigured,
};
use serde_json::json;
use tower::ServiceExt;

struct Page {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: String,
}

async fn get(app: Router, uri: &str) -> Page {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");

    Page {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

impl Page {
    /// Body with `&` entities decoded, so attribute URLs read as written.
    fn unescaped(&self) -> String {
        self.body.replace("&#38;", "&").replace("&amp;", "&")
    }
}

fn header_value<'a>(page: &'a Page, name: &str) -> Option<&'a str> {
    page.headers.get(name).and_then(|v| v.to_str().ok())
}

fn catalog() -> Documents {
    let spoon = product_doc("p1", "golden-spoon", "金湯匙彌月禮盒", 1290);
    let mut preorder = product_doc("p2", "lotus-pin", "小蓮藕別針", 790);
    preorder["shopeeUrl"] = json!(null);
    preorder["price"] = json!(null);
    preorder["images"] = json!([]);

    Documents {
        posts: vec![
            post_doc("a1", "how-to-choose", "彌月禮怎麼挑", &[spoon.clone()]),
            post_doc("a2", "zodiac-guide", "十二生肖寓意", &[]),
        ],
        products: vec![spoon, preorder],
    }
}

// =============================================================================
// Home Page
// =============================================================================

#[tokio::test]
async fn test_home_lists_featured_content() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<title>溫暖祝福的第一份禮 | 輕奢彌月金飾</title>"));
    assert!(page.body.contains("彌月禮怎麼挑"));
    assert!(page.body.contains("推薦商品：金湯匙彌月禮盒"));
    assert!(page.body.contains("推薦商品：尚未設定"));
    assert!(page.body.contains("NT$1,290"));
    assert!(page.unescaped().contains(
        "https://cdn.sanity.io/images/testproj/production/p1-1200x1200.jpg?w=800&h=1000&fit=crop&auto=format"
    ));
    assert!(page.body.contains("前往蝦皮結帳 (享免運)"));
    assert!(page.body.contains("商品準備中"));
    assert!(page.body.contains("尚未設定價格"));
    assert!(!page.body.contains("尚未取得商品資料"));
}

#[tokio::test]
async fn test_home_without_content_store_shows_empty_states() {
    let page = get(test_app(unconfigured()), "/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("尚未取得文章資料"));
    assert!(page.body.contains("尚未取得商品資料"));
}

#[tokio::test]
async fn test_home_survives_store_failure() {
    let store = FakeContentStore::failing().await;
    let page = get(test_app(store.config()), "/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("尚未取得商品資料"));
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_index_lists_all_products() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/products").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("href=\"/products/golden-spoon\""));
    assert!(page.body.contains("href=\"/products/lotus-pin\""));
}

#[tokio::test]
async fn test_product_detail() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/products/golden-spoon").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<h1>金湯匙彌月禮盒</h1>"));
    assert!(page.body.contains("金湯匙彌月禮盒，NT$1,290，可選客製化款式，立即查看商品細節。"));
    assert!(page.body.contains("<h3>生肖</h3>"));
    assert!(page.body.contains("<li>鼠</li>"));
    assert!(page.body.contains("金湯匙彌月禮盒 以鍍金工藝打造。"));
    assert!(page.body.contains("href=\"https://shopee.tw/product/p1\""));
    assert!(page.body.contains("<link rel=\"canonical\" href=\"https://kiyone.tw/products/golden-spoon\">"));
    assert!(page.unescaped().contains("w=1200&h=630&fit=crop"));
}

#[tokio::test]
async fn test_product_without_checkout_link_is_not_purchasable() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/products/lotus-pin").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("商品準備中"));
    assert!(page.body.contains("尚未設定價格"));
    assert!(page.body.contains("商品圖片準備中"));
    assert!(!page.body.contains("前往蝦皮結帳"));
    assert!(!page.body.contains("og:image"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/products/missing").await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("找不到頁面"));
}

#[tokio::test]
async fn test_product_is_not_found_when_store_fails() {
    let store = FakeContentStore::failing().await;
    let page = get(test_app(store.config()), "/products/golden-spoon").await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Blog
// =============================================================================

#[tokio::test]
async fn test_blog_index_lists_posts() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/blog").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("href=\"/blog/how-to-choose\""));
    assert!(page.body.contains("href=\"/blog/zodiac-guide\""));
}

#[tokio::test]
async fn test_blog_post_renders_body_and_related_products() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/blog/how-to-choose").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<h1>彌月禮怎麼挑</h1>"));
    assert!(page.body.contains("<p>彌月禮挑選的三個重點。</p>"));
    assert!(page.body.contains("href=\"/products/golden-spoon\""));
    assert!(page.unescaped().contains(
        "<meta property=\"og:image\" content=\"https://cdn.sanity.io/images/testproj/production/a1-1200x1200.jpg?w=1280&h=720&fit=crop&auto=format\">"
    ));
}

#[tokio::test]
async fn test_blog_post_without_related_products() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/blog/zodiac-guide").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("這篇文章尚未設定推薦商品"));
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/blog/missing").await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_post_url_redirects() {
    let page = get(test_app(unconfigured()), "/posts/how-to-choose").await;

    assert_eq!(page.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(header_value(&page, "location"), Some("/blog/how-to-choose"));
}

#[tokio::test]
async fn test_legacy_post_url_encodes_slug() {
    let page = get(test_app(unconfigured()), "/posts/%E5%BD%8C%E6%9C%88%20%E7%A6%AE").await;

    assert_eq!(page.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        header_value(&page, "location"),
        Some("/blog/%E5%BD%8C%E6%9C%88%20%E7%A6%AE")
    );
}

#[tokio::test]
async fn test_links_encode_slugs() {
    let product = product_doc("p1", "gift set?", "禮盒組", 1590);
    let post = post_doc("a1", "tips#1", "送禮小技巧", &[product.clone()]);
    let store = FakeContentStore::start(Documents {
        products: vec![product],
        posts: vec![post],
    })
    .await;
    let app = test_app(store.config());

    let home = get(app.clone(), "/").await;
    assert!(home.body.contains("href=\"/products/gift%20set%3F\""));
    assert!(home.body.contains("href=\"/blog/tips%231\""));

    let sitemap = get(app.clone(), "/sitemap.xml").await;
    assert!(sitemap.body.contains("<loc>https://kiyone.tw/blog/tips%231</loc>"));
    assert!(sitemap.body.contains("<loc>https://kiyone.tw/products/gift%20set%3F</loc>"));

    let detail = get(app, "/products/gift%20set%3F").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("href=\"https://kiyone.tw/products/gift%20set%3F\""));
}

// =============================================================================
// Static Pages and SEO
// =============================================================================

#[tokio::test]
async fn test_about_page_renders_markdown() {
    let page = get(test_app(unconfigured()), "/about").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<title>品牌故事 | 輕奢彌月金飾</title>"));
    assert!(page.body.contains("止時 品牌故事"));
    assert!(page.body.contains("寓意對照"));
    assert!(page.body.contains("服務承諾"));
}

#[tokio::test]
async fn test_sitemap_lists_pages_and_content() {
    let store = FakeContentStore::start(catalog()).await;
    let page = get(test_app(store.config()), "/sitemap.xml").await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(
        header_value(&page, "content-type"),
        Some("application/xml; charset=utf-8")
    );
    assert!(page.body.starts_with("<?xml"));
    assert!(page.body.contains("<loc>https://kiyone.tw/</loc>"));
    assert!(page.body.contains("<loc>https://kiyone.tw/blog/how-to-choose</loc>"));
    assert!(page.body.contains("<lastmod>2026-03-02T08:30:00Z</lastmod>"));
    assert!(page.body.contains("<loc>https://kiyone.tw/products/lotus-pin</loc>"));
}

#[tokio::test]
async fn test_robots_points_to_sitemap() {
    let page = get(test_app(unconfigured()), "/robots.txt").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Sitemap: https://kiyone.tw/sitemap.xml"));
}

// =============================================================================
// Infrastructure
// =============================================================================

#[tokio::test]
async fn test_health() {
    let page = get(test_app(unconfigured()), "/health").await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let page = get(test_app(unconfigured()), "/no/such/page").await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("找不到頁面"));
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let page = get(test_app(unconfigured()), "/").await;

    assert_eq!(header_value(&page, "x-frame-options"), Some("DENY"));
    assert!(header_value(&page, "content-security-policy").is_some());
    assert_eq!(header_value(&page, "cache-control"), Some("no-cache"));
    assert!(header_value(&page, "x-request-id").is_some());
}

#[tokio::test]
async fn test_stylesheet_is_served_with_long_cache() {
    let page = get(test_app(unconfigured()), "/static/css/main.css").await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(
        page.headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("public, max-age=31536000, immutable")
    );
    assert!(page.body.contains("--gold"));
}

#[tokio::test]
async fn test_server_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind storefront");
    let addr = listener.local_addr().expect("local address");
    let app = test_app(unconfigured());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("storefront server");
    });

    let response = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("storefront reachable");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.expect("body"), "ok");
}
