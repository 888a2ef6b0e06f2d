// === Content API ===
pub const DEFAULT_API_BASE: &str = "https://uniqjobs.co.in/blog_api.php";
pub const DEFAULT_IMAGE_BASE: &str = "https://uniqjobs.co.in/blog_images";
pub const DEFAULT_SITE_URL: &str = "https://www.uniqjobs.co.in";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:80";

// Revalidation windows, in seconds
pub const LISTING_REVALIDATE_SECS: u64 = 300;
pub const POST_REVALIDATE_SECS: u64 = 600;
pub const TAXONOMY_REVALIDATE_SECS: u64 = 3600;
pub const CACHE_MAX_ENTRIES: usize = 256;

// === Listing ===
pub const LISTING_PAGE: usize = 1;
pub const LISTING_LIMIT: usize = 50;
pub const INITIAL_VISIBLE: usize = 6;
pub const LOAD_MORE_STEP: usize = 4;
pub const SHIMMER_DELAY_MS: u64 = 1000;

// === Post detail ===
pub const RELATED_QUERY_LIMIT: usize = 10;
pub const RELATED_LIMIT: usize = 6;
pub const MAX_DESCRIPTION_LENGTH: usize = 160;
pub const VIEWED_TRAIL_CAP: usize = 10;
pub const VIEWED_COOKIE: &str = "viewed";
/// Encoded cookie value budget, kept under the 4096-byte browser limit.
pub const VIEWED_COOKIE_MAX_BYTES: usize = 3072;
pub const VIEWED_TITLE_MAX_CHARS: usize = 100;
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

// === Byline / structured data ===
pub const AUTHOR_NAME: &str = "Uniq Official";
pub const PUBLISHER_NAME: &str = "UniqJobs";

// === Shorts ===
pub const SHORTS_FILE: &str = "placed-candidate.json";
pub const SHORTS_IMAGE_BASE: &str = "/images/shorts/";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn api_base() -> String {
    env_or("BLOG_API_BASE", DEFAULT_API_BASE)
}

pub fn image_base() -> String {
    env_or("BLOG_IMAGE_BASE", DEFAULT_IMAGE_BASE)
        .trim_end_matches('/')
        .to_string()
}

pub fn site_url() -> String {
    env_or("BLOG_SITE_URL", DEFAULT_SITE_URL)
        .trim_end_matches('/')
        .to_string()
}

pub fn bind_addr() -> String {
    env_or("BLOG_BIND_ADDR", DEFAULT_BIND_ADDR)
}

pub fn sitemap_url() -> String {
    // The sitemap lives on the apex domain, not the www host.
    format!("{}/sitemap.xml", site_url().replace("://www.", "://"))
}
