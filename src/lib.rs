pub mod aside;
pub mod config;
pub mod content;
pub mod handlers;
pub mod listing;
pub mod posts;
pub mod seo;
pub mod shorts;
pub mod static_server;
pub mod templates;
pub mod viewed;

pub mod models {
    pub mod models;
}

pub mod core {
    pub mod cache;
    pub mod errors;
    pub mod helpers;
    pub mod query_params;
}

// === Component entrypoint ===
// Each instance serves one request, so the cache only dedupes fetches within it.
#[cfg(target_arch = "wasm32")]
#[spin_sdk::http_component]
async fn handle(req: spin_sdk::http::Request) -> anyhow::Result<impl spin_sdk::http::IntoResponse> {
    let client = content::ContentClient::from_env(content::SpinTransport);
    Ok(handlers::dispatch(&client, req).await)
}
