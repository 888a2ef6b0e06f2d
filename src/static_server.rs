use spin_sdk::http::Response;
use rust_embed::RustEmbed;
use mime_guess::from_path;

use crate::core::errors::ApiError;

#[derive(RustEmbed)]
#[folder = "static"]
pub struct Assets;

// Templates are rendered, never served raw.
const PRIVATE_ASSETS: &[&str] = &["layout.html"];

pub fn serve_static(path: &str) -> anyhow::Result<Response> {
    let file_path = path.trim_start_matches('/');

    if file_path.is_empty() || PRIVATE_ASSETS.contains(&file_path) {
        return Ok(ApiError::NotFound("Page not found".to_string()).into());
    }

    let Some(file) = Assets::get(file_path) else {
        return Ok(ApiError::NotFound("Page not found".to_string()).into());
    };

    let mime = from_path(file_path).first_or_octet_stream();

    Ok(Response::builder()
        .status(200)
        .header("Content-Type", mime.as_ref())
        .header("Cache-Control", "public, max-age=3600")
        .body(file.data.to_vec())
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_stylesheet_with_mime() {
        let resp = serve_static("/blog.css").unwrap();
        assert_eq!(*resp.status(), 200);
        let content_type = resp.header("Content-Type").and_then(|h| h.as_str()).unwrap_or_default();
        assert!(content_type.starts_with("text/css"));
    }

    #[test]
    fn layout_and_unknown_files_are_404() {
        assert_eq!(*serve_static("/layout.html").unwrap().status(), 404);
        assert_eq!(*serve_static("/nope.png").unwrap().status(), 404);
    }
}
