use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::{json, Value};

use crate::config::*;
use crate::core::helpers::image_url;
use crate::models::models::Post;

/// Cut to [`MAX_DESCRIPTION_LENGTH`] characters and mark the cut with `...`.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_LENGTH {
        return description.to_string();
    }
    let cut: String = description.chars().take(MAX_DESCRIPTION_LENGTH).collect();
    format!("{}...", cut.trim_end())
}

pub fn post_url(slug: &str) -> String {
    format!("{}/blog/{}", site_url(), slug)
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub canonical: String,
    pub image: Option<String>,
    pub og_type: &'static str,
}

impl PageMeta {
    pub fn for_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: truncate_description(&post.description),
            keywords: (!post.tags.is_empty()).then(|| post.tags.join(", ")),
            canonical: post_url(&post.slug),
            image: image_url(&post.image),
            og_type: "article",
        }
    }

    pub fn for_listing(title: &str, path: &str) -> Self {
        Self {
            title: title.to_string(),
            description: "Career advice, interview preparation and technology articles from Uniq Jobs.".to_string(),
            keywords: None,
            canonical: format!("{}{}", site_url(), path),
            image: None,
            og_type: "website",
        }
    }

    /// `<head>` tags: title, description, canonical, Open Graph, Twitter card.
    pub fn render(&self) -> String {
        let attr = |s: &str| encode_double_quoted_attribute(s).to_string();
        let image = self.image.as_deref().unwrap_or_default();

        let mut tags = vec![
            format!("<title>{}</title>", encode_text(&self.title)),
            format!(r#"<meta name="description" content="{}">"#, attr(&self.description)),
        ];
        if let Some(keywords) = &self.keywords {
            tags.push(format!(r#"<meta name="keywords" content="{}">"#, attr(keywords)));
        }
        tags.extend([
            format!(r#"<link rel="canonical" href="{}">"#, attr(&self.canonical)),
            format!(r#"<meta property="og:title" content="{}">"#, attr(&self.title)),
            format!(r#"<meta property="og:description" content="{}">"#, attr(&self.description)),
            format!(r#"<meta property="og:url" content="{}">"#, attr(&self.canonical)),
            format!(r#"<meta property="og:type" content="{}">"#, self.og_type),
            format!(r#"<meta property="og:image" content="{}">"#, attr(image)),
            r#"<meta name="twitter:card" content="summary_large_image">"#.to_string(),
            format!(r#"<meta name="twitter:title" content="{}">"#, attr(&self.title)),
            format!(r#"<meta name="twitter:description" content="{}">"#, attr(&self.description)),
            format!(r#"<meta name="twitter:image" content="{}">"#, attr(image)),
        ]);
        tags.join("\n")
    }
}

pub fn article_ld(post: &Post) -> Value {
    let mut ld = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.title,
        "author": { "@type": "Person", "name": AUTHOR_NAME },
        "publisher": { "@type": "Organization", "name": PUBLISHER_NAME },
        "datePublished": post.schedule_timer,
        "dateModified": post.schedule_timer,
        "articleSection": post.category,
        "keywords": post.tags.join(", "),
        "mainEntityOfPage": post_url(&post.slug),
        "description": post.description,
        "url": post_url(&post.slug),
    });
    if let Some(image) = image_url(&post.image) {
        ld["image"] = json!([image]);
    }
    ld
}

pub fn breadcrumb_ld(post: &Post) -> Value {
    let site = site_url();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": [
            { "@type": "ListItem", "position": 1, "name": "Home", "item": format!("{}/", site) },
            { "@type": "ListItem", "position": 2, "name": "Blogs", "item": format!("{}/blogs", site) },
            { "@type": "ListItem", "position": 3, "name": post.title, "item": post_url(&post.slug) },
        ]
    })
}

/// Embed a JSON-LD block. `</` is escaped so titles cannot close the script.
pub fn ld_script(id: &str, value: &Value) -> String {
    let body = value.to_string().replace("</", "<\\/");
    format!(r#"<script id="{}" type="application/ld+json">{}</script>"#, id, body)
}

/// Blanket disallow, with the sitemap still advertised.
pub fn robots_txt() -> String {
    format!("User-Agent: *\nDisallow: /\n\nSitemap: {}\n", sitemap_url())
}
