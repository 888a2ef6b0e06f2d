//! Client for the remote blog content API.
//!
//! Four query shapes, each fronted by the response cache with its own
//! revalidation window:
//!
//! | call              | query                              | window |
//! |-------------------|------------------------------------|--------|
//! | `list_posts`      | `?page=&limit=[&category=|&tag=]`  | 300 s  |
//! | `get_post`        | `?slug=`                           | 600 s  |
//! | `list_categories` | `?list=categories`                 | 3600 s |
//! | `list_tags`       | `?list=tags`                       | 3600 s |

use anyhow::Context;
use log::{debug, info, warn};
use serde_json::Value;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::config::*;
use crate::core::cache::TtlCache;
use crate::models::models::Post;

/// Issues a GET and decodes the body as JSON.
pub trait Transport {
    fn get_json(&self, url: &str) -> impl Future<Output = anyhow::Result<Value>>;
}

#[cfg(target_arch = "wasm32")]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for SpinTransport {
    async fn get_json(&self, url: &str) -> anyhow::Result<Value> {
        use spin_sdk::http::{Request, Response};

        let request = Request::get(url).build();
        let response: Response = spin_sdk::http::send(request)
            .await
            .map_err(|e| anyhow::anyhow!("GET {} failed: {}", url, e))?;

        let status = *response.status();
        if !(200..300).contains(&status) {
            anyhow::bail!("content api returned {} for {}", status, url);
        }
        serde_json::from_slice(response.body()).with_context(|| format!("invalid JSON from {}", url))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Transport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> anyhow::Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("content api returned {} for {}", status.as_u16(), url);
        }
        response
            .json::<Value>()
            .await
            .with_context(|| format!("invalid JSON from {}", url))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListFilter {
    Latest,
    Category(String),
    Tag(String),
}

impl ListFilter {
    fn query_suffix(&self) -> String {
        match self {
            ListFilter::Latest => String::new(),
            ListFilter::Category(c) => format!("&category={}", urlencoding::encode(c)),
            ListFilter::Tag(t) => format!("&tag={}", urlencoding::encode(t)),
        }
    }
}

pub fn listing_url(base: &str, page: usize, limit: usize, filter: &ListFilter) -> String {
    format!("{}?page={}&limit={}{}", base, page, limit, filter.query_suffix())
}

pub fn post_url(base: &str, slug: &str) -> String {
    format!("{}?slug={}", base, urlencoding::encode(slug))
}

pub fn taxonomy_url(base: &str, list: &str) -> String {
    format!("{}?list={}", base, list)
}

pub struct ContentClient<T> {
    transport: T,
    base: String,
    cache: Mutex<TtlCache>,
}

impl<T: Transport> ContentClient<T> {
    pub fn new(transport: T, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into(),
            cache: Mutex::new(TtlCache::new(CACHE_MAX_ENTRIES)),
        }
    }

    /// Client against the configured API base.
    pub fn from_env(transport: T) -> Self {
        Self::new(transport, api_base())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn cache(&self) -> MutexGuard<'_, TtlCache> {
        // A panic mid-insert leaves the map consistent; keep serving from it.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn fetch(&self, url: String, window_secs: u64) -> anyhow::Result<Value> {
        let cached = self.cache().get(&url);
        if let Some(value) = cached {
            debug!("cache hit {}", url);
            return Ok(value);
        }

        info!("fetching {}", url);
        let value = self.transport.get_json(&url).await?;
        self.cache()
            .insert(url, value.clone(), Duration::from_secs(window_secs));
        Ok(value)
    }

    pub async fn list_posts(&self, page: usize, limit: usize, filter: &ListFilter) -> anyhow::Result<Vec<Post>> {
        let url = listing_url(&self.base, page, limit, filter);
        let body = self.fetch(url, LISTING_REVALIDATE_SECS).await?;
        Ok(posts_from_body(body))
    }

    pub async fn get_post(&self, slug: &str) -> anyhow::Result<Option<Post>> {
        let url = post_url(&self.base, slug);
        let body = self.fetch(url, POST_REVALIDATE_SECS).await?;
        Ok(post_from_body(body))
    }

    pub async fn list_categories(&self) -> anyhow::Result<Vec<String>> {
        let url = taxonomy_url(&self.base, "categories");
        let body = self.fetch(url, TAXONOMY_REVALIDATE_SECS).await?;
        Ok(strings_from_body(body))
    }

    pub async fn list_tags(&self) -> anyhow::Result<Vec<String>> {
        let url = taxonomy_url(&self.base, "tags");
        let body = self.fetch(url, TAXONOMY_REVALIDATE_SECS).await?;
        Ok(strings_from_body(body))
    }
}

fn take_data(body: Value, fallback: &str) -> Option<Value> {
    match body {
        Value::Object(mut map) => map
            .remove("data")
            .filter(|v| !v.is_null())
            .or_else(|| map.remove(fallback))
            .filter(|v| !v.is_null()),
        _ => None,
    }
}

/// `{ data: [...] }`, older endpoints `{ posts: [...] }`. Rows that do not
/// decode are skipped.
pub fn posts_from_body(body: Value) -> Vec<Post> {
    let Some(Value::Array(items)) = take_data(body, "posts") else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Post>(item) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("skipping malformed post in listing: {}", e);
                None
            }
        })
        .collect()
}

pub fn post_from_body(body: Value) -> Option<Post> {
    let data = take_data(body, "post")?;
    if !data.is_object() {
        return None;
    }
    match serde_json::from_value::<Post>(data) {
        Ok(post) => Some(post),
        Err(e) => {
            warn!("malformed post body: {}", e);
            None
        }
    }
}

pub fn strings_from_body(body: Value) -> Vec<String> {
    match take_data(body, "list") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    }
}
