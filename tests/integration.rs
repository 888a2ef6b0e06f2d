use serde_json::{json, Value};
use spin_sdk::http::{Method, Request, Response};
use std::collections::HashMap;
use std::sync::Mutex;

use uniq_blog::config::{LISTING_LIMIT, RELATED_LIMIT, RELATED_QUERY_LIMIT};
use uniq_blog::content::{listing_url, post_url, taxonomy_url, ContentClient, ListFilter, Transport};
use uniq_blog::handlers::dispatch;
use uniq_blog::models::models::LinkKind;
use uniq_blog::posts::assemble_detail;

const API: &str = "https://api.test/blog_api.php";
const BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Default)]
struct FakeApi {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn with(mut self, url: String, body: Value) -> Self {
        self.responses.insert(url, body);
        self
    }

    fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == url).count()
    }
}

impl Transport for FakeApi {
    async fn get_json(&self, url: &str) -> anyhow::Result<Value> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("connection refused: {}", url))
    }
}

fn tag_url(tag: &str) -> String {
    listing_url(API, 1, RELATED_QUERY_LIMIT, &ListFilter::Tag(tag.to_string()))
}

fn category_url(category: &str) -> String {
    listing_url(API, 1, RELATED_QUERY_LIMIT, &ListFilter::Category(category.to_string()))
}

fn summary(slug: &str) -> Value {
    json!({"slug": slug, "title": format!("Post {}", slug), "category": "Careers"})
}

fn rust_post() -> Value {
    json!({"data": {
        "id": 1,
        "slug": "rust-jobs",
        "title": "Rust jobs in 2025",
        "description": "Where the Rust jobs are.",
        "category": "Careers",
        "tags": ["rust", "backend"],
        "image": "rust.png",
        "schedule_timer": "2025-01-10 09:00:00",
        "content": [{"title": "Intro", "description": "", "sections": [{"heading": "Why", "paragraph": "See https://www.rust-lang.org"}]}],
        "table_data": {
            "columns": ["Title", "Description", "Link"],
            "rows": [
                ["Rust talk", "Conference", "https://www.youtube.com/watch?v=abc123&t=4"],
                ["Community", "Chat", "https://chat.whatsapp.com/xyz"],
                ["Source", "Code", "https://github.com/rust-lang/rust"],
                []
            ]
        }
    }})
}

/// API where every related query succeeds.
fn seeded_api() -> FakeApi {
    FakeApi::default()
        .with(post_url(API, "rust-jobs"), rust_post())
        .with(tag_url("rust"), json!({"data": [summary("rust-jobs"), summary("a"), summary("b")]}))
        .with(tag_url("backend"), json!({"data": [summary("b"), summary("c"), {"slug": "", "title": "No slug"}]}))
        .with(category_url("Careers"), json!({"data": [summary("d"), summary("a"), summary("e"), summary("f"), summary("g")]}))
}

fn get(uri: &str) -> Request {
    Request::builder().method(Method::Get).uri(uri).build()
}

fn body_text(resp: &Response) -> String {
    String::from_utf8(resp.body().to_vec()).unwrap()
}

#[tokio::test]
async fn detail_merges_related_posts_in_order() {
    let client = ContentClient::new(seeded_api(), API);

    let detail = assemble_detail(&client, "rust-jobs").await.unwrap().unwrap();
    let slugs: Vec<&str> = detail.related.iter().map(|p| p.slug.as_str()).collect();

    // Tag results first in tag order, then category; current post and repeats dropped.
    assert_eq!(slugs, vec!["a", "b", "c", "d", "e", "f"]);
    assert_eq!(detail.related.len(), RELATED_LIMIT);
}

#[tokio::test]
async fn detail_partitions_table_rows() {
    let client = ContentClient::new(seeded_api(), API);

    let detail = assemble_detail(&client, "rust-jobs").await.unwrap().unwrap();

    assert_eq!(detail.videos.len(), 1);
    assert_eq!(detail.videos[0].embed_url, "https://www.youtube.com/embed/abc123");
    let kinds: Vec<LinkKind> = detail.links.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LinkKind::Whatsapp, LinkKind::Github]);
    assert_eq!(detail.links[0].description.as_deref(), Some("Chat"));
}

#[tokio::test]
async fn unknown_slug_is_none() {
    let api = FakeApi::default().with(post_url(API, "missing"), json!({"data": null}));
    let client = ContentClient::new(api, API);

    assert!(assemble_detail(&client, "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn failing_tag_query_fails_the_detail() {
    let api = FakeApi::default()
        .with(post_url(API, "rust-jobs"), rust_post())
        .with(tag_url("rust"), json!({"data": [summary("a")]}))
        .with(category_url("Careers"), json!({"data": []}));
    let client = ContentClient::new(api, API);

    assert!(assemble_detail(&client, "rust-jobs").await.is_err());
}

#[tokio::test]
async fn detail_page_sets_viewed_cookie_when_arriving_from_related() {
    let client = ContentClient::new(seeded_api(), API);

    let resp = dispatch(&client, get("/blog/rust-jobs?via=related")).await;
    assert_eq!(*resp.status(), 200);
    let cookie = resp.header("Set-Cookie").and_then(|h| h.as_str()).unwrap_or_default();
    assert!(cookie.starts_with("viewed="));
    assert!(cookie.contains("rust-jobs"));

    let html = body_text(&resp);
    assert!(html.contains("Rust jobs in 2025"));
    assert!(html.contains("More in Careers"));
    assert!(html.contains("application/ld+json"));
}

#[tokio::test]
async fn direct_visit_leaves_cookie_alone() {
    let client = ContentClient::new(seeded_api(), API);

    let resp = dispatch(&client, get("/blog/rust-jobs")).await;
    assert_eq!(*resp.status(), 200);
    assert!(resp.header("Set-Cookie").is_none());
}

#[tokio::test]
async fn unknown_post_renders_not_found_page() {
    let api = FakeApi::default().with(post_url(API, "gone"), json!({"data": null}));
    let client = ContentClient::new(api, API);

    let resp = dispatch(&client, get("/blog/gone")).await;
    assert_eq!(*resp.status(), 404);
}

fn listing_api() -> FakeApi {
    FakeApi::default()
        .with(
            listing_url(API, 1, LISTING_LIMIT, &ListFilter::Latest),
            json!({"data": [
                {"slug": "css-grid", "title": "Mastering CSS Grid"},
                {"slug": "rust", "title": "Rust for beginners"},
                {"slug": "scss", "title": "SCSS tricks"}
            ]}),
        )
        .with(taxonomy_url(API, "categories"), json!({"data": ["Careers", "Frontend"]}))
        .with(taxonomy_url(API, "tags"), json!({"data": ["css", "rust"]}))
}

#[tokio::test]
async fn listing_search_filters_titles() {
    let client = ContentClient::new(listing_api(), API);

    let html = body_text(&dispatch(&client, get("/blogs?q=css")).await);

    assert!(html.contains(r#"data-title="Mastering CSS Grid">"#));
    assert!(html.contains(r#"data-title="SCSS tricks">"#));
    // Non-matches stay in the page for the in-page search, but start hidden.
    assert!(html.contains(r#"data-title="Rust for beginners" hidden>"#));
}

#[tokio::test]
async fn listing_fetches_are_cached_across_requests() {
    let client = ContentClient::new(listing_api(), API);

    for _ in 0..3 {
        assert_eq!(*dispatch(&client, get("/blogs")).await.status(), 200);
    }

    let latest = listing_url(API, 1, LISTING_LIMIT, &ListFilter::Latest);
    assert_eq!(client.transport().calls_to(&latest), 1);
    assert_eq!(client.transport().calls_to(&taxonomy_url(API, "tags")), 1);
}

#[tokio::test]
async fn listing_upstream_failure_is_500() {
    let client = ContentClient::new(FakeApi::default(), API);

    let resp = dispatch(&client, get("/blogs")).await;
    assert_eq!(*resp.status(), 500);
}

#[tokio::test]
async fn robots_and_shorts_need_no_api() {
    let client = ContentClient::new(FakeApi::default(), API);

    let robots = dispatch(&client, get("/robots.txt")).await;
    assert!(body_text(&robots).contains("Sitemap:"));

    let shorts = dispatch(&client, get("/api/shorts")).await;
    assert_eq!(*shorts.status(), 200);
    let items: Vec<Value> = serde_json::from_slice(shorts.body()).unwrap();
    assert!(!items.is_empty());
}

#[tokio::test]
async fn writes_are_rejected_as_bad_request() {
    let client = ContentClient::new(FakeApi::default(), API);

    let req = Request::builder().method(Method::Post).uri("/blogs").build();
    let resp = dispatch(&client, req).await;

    assert_eq!(*resp.status(), 400);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Unsupported method"));
    assert!(client.transport().calls.lock().unwrap().is_empty());
}

// Needs the native server running against a reachable content API.
#[ignore]
#[tokio::test]
async fn live_pages_respond() {
    let client = reqwest::Client::new();

    let robots = client
        .get(format!("{}/robots.txt", BASE_URL))
        .send()
        .await
        .expect("Failed to fetch robots.txt");
    assert_eq!(robots.status(), 200);

    let blogs = client
        .get(format!("{}/blogs", BASE_URL))
        .send()
        .await
        .expect("Failed to fetch listing");
    assert_eq!(blogs.status(), 200);
    let html = blogs.text().await.unwrap();
    assert!(html.contains("Latest Blogs"));
}
