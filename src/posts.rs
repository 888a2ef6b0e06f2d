use std::collections::HashSet;
use std::sync::OnceLock;

use ammonia::Builder;
use futures::future::try_join_all;
use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use log::info;
use regex::Regex;

use crate::config::*;
use crate::content::{ContentClient, ListFilter, Transport};
use crate::models::models::{LinkKind, LinkRow, Post, RelatedPost, TableData, VideoRow};

/// Everything the post page renders beyond the post itself.
#[derive(Clone, Debug)]
pub struct PostDetail {
    pub post: Post,
    pub related: Vec<RelatedPost>,
    pub links: Vec<LinkRow>,
    pub videos: Vec<VideoRow>,
}

/// Fetch a post and the data around it. `Ok(None)` when the slug is unknown.
pub async fn assemble_detail<T: Transport>(
    client: &ContentClient<T>,
    slug: &str,
) -> anyhow::Result<Option<PostDetail>> {
    let Some(post) = client.get_post(slug).await? else {
        info!("no post for slug {:?}", slug);
        return Ok(None);
    };

    let candidates = related_candidates(client, &post).await?;
    let related = collect_related(&post.slug, candidates);
    let (links, videos) = split_table_rows(&post.table_data);

    Ok(Some(PostDetail {
        post,
        related,
        links,
        videos,
    }))
}

/// One listing per tag, all in flight together, then one for the category.
/// Tag results come first, in tag order.
async fn related_candidates<T: Transport>(client: &ContentClient<T>, post: &Post) -> anyhow::Result<Vec<Post>> {
    let tag_queries = post.tags.iter().map(|tag| {
        let filter = ListFilter::Tag(tag.clone());
        async move { client.list_posts(1, RELATED_QUERY_LIMIT, &filter).await }
    });
    let by_tag = try_join_all(tag_queries).await?;

    let by_category = client
        .list_posts(1, RELATED_QUERY_LIMIT, &ListFilter::Category(post.category.clone()))
        .await?;

    Ok(by_tag.into_iter().flatten().chain(by_category).collect())
}

/// Drop slugless entries and the current post, keep the first occurrence of
/// each slug, then cap at [`RELATED_LIMIT`].
pub fn collect_related(current_slug: &str, candidates: Vec<Post>) -> Vec<RelatedPost> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|p| !p.slug.is_empty() && p.slug != current_slug)
        .filter(|p| seen.insert(p.slug.clone()))
        .filter(|p| !p.title.is_empty())
        .take(RELATED_LIMIT)
        .map(RelatedPost::from)
        .collect()
}

pub fn is_youtube(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

pub fn classify_link(url: &str) -> LinkKind {
    if url.is_empty() {
        LinkKind::Other
    } else if is_youtube(url) {
        LinkKind::Youtube
    } else if url.contains("wa.me") || url.contains("whatsapp.com") {
        LinkKind::Whatsapp
    } else if url.contains("github.be") || url.contains("github.com") {
        LinkKind::Github
    } else if url.starts_with("http") {
        LinkKind::Website
    } else {
        LinkKind::Other
    }
}

/// Player URL for a watch or short link; anything else is returned as is.
pub fn youtube_embed_url(url: &str) -> String {
    let id = if let Some((_, rest)) = url.split_once("watch?v=") {
        rest.split('&').next().unwrap_or_default()
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest.split('?').next().unwrap_or_default()
    } else {
        ""
    };

    if id.is_empty() {
        url.to_string()
    } else {
        format!("{}{}", YOUTUBE_EMBED_BASE, id)
    }
}

/// Rows are positional: title first, optional description second, link last.
pub fn split_table_rows(table: &TableData) -> (Vec<LinkRow>, Vec<VideoRow>) {
    let mut links = Vec::new();
    let mut videos = Vec::new();

    for row in table.rows.iter().filter(|r| !r.is_empty()) {
        let title = row[0].clone();
        let link = row[row.len() - 1].clone();

        if is_youtube(&link) {
            videos.push(VideoRow {
                title,
                embed_url: youtube_embed_url(&link),
                url: link,
            });
        } else {
            let description = if row.len() > 2 { Some(row[1].clone()) } else { None };
            links.push(LinkRow {
                title,
                description,
                kind: classify_link(&link),
                link,
            });
        }
    }

    (links, videos)
}

fn url_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("Regex should compile"))
}

/// Sanitize a CMS paragraph and turn bare URLs into links.
pub fn render_paragraph(text: &str) -> String {
    let clean = Builder::default()
        .link_rel(Some("noopener noreferrer"))
        .clean(text)
        .to_string();

    // Leave URLs that already sit inside an anchor alone.
    if clean.contains("<a ") {
        return clean;
    }

    url_regex()
        .replace_all(&clean, |caps: &regex::Captures| {
            // The match is already entity-encoded by the sanitizer.
            let url = &caps[0];
            let escaped_url = encode_double_quoted_attribute(&decode_html_entities(url)).into_owned();
            format!(r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#, escaped_url, url)
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, title: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn related_skips_current_and_duplicates() {
        let candidates = vec![
            post("a", "A"),
            post("current", "Me"),
            post("b", "B"),
            post("a", "A again"),
            post("", "No slug"),
            post("c", "C"),
        ];

        let related = collect_related("current", candidates);
        let slugs: Vec<_> = related.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
        assert_eq!(related[0].title, "A");
    }

    #[test]
    fn related_never_exceeds_limit() {
        let candidates = (0..20).map(|i| post(&format!("p{}", i), "T")).collect();
        assert_eq!(collect_related("x", candidates).len(), RELATED_LIMIT);
    }

    #[test]
    fn related_drops_untitled() {
        let related = collect_related("x", vec![post("a", ""), post("b", "B")]);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].slug, "b");
    }

    #[test]
    fn classify_links() {
        assert_eq!(classify_link(""), LinkKind::Other);
        assert_eq!(classify_link("https://youtu.be/x"), LinkKind::Youtube);
        assert_eq!(classify_link("https://wa.me/919999999999"), LinkKind::Whatsapp);
        assert_eq!(classify_link("https://chat.whatsapp.com/abc"), LinkKind::Whatsapp);
        assert_eq!(classify_link("https://github.com/rust-lang/rust"), LinkKind::Github);
        assert_eq!(classify_link("https://example.com/guide.pdf"), LinkKind::Website);
        assert_eq!(classify_link("mailto:jobs@example.com"), LinkKind::Other);
    }

    #[test]
    fn embed_urls() {
        assert_eq!(
            youtube_embed_url("https://www.youtube.com/watch?v=abc123&t=5"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            youtube_embed_url("https://m.youtube.com/watch?v=abc123"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(youtube_embed_url("https://youtu.be/abc123?t=5"), "https://www.youtube.com/embed/abc123");
        assert_eq!(
            youtube_embed_url("https://www.youtube.com/@uniqjobs"),
            "https://www.youtube.com/@uniqjobs"
        );
        assert_eq!(youtube_embed_url("https://youtu.be/"), "https://youtu.be/");
    }

    #[test]
    fn table_rows_partition() {
        let table = TableData {
            columns: vec!["Title".into(), "Notes".into(), "Link".into()],
            rows: vec![
                vec!["Intro video".into(), "watch first".into(), "https://youtu.be/abc".into()],
                vec!["Join group".into(), "".into(), "https://wa.me/123".into()],
                vec!["Repo".into(), "https://github.com/org/repo".into()],
                vec![],
            ],
        };

        let (links, videos) = split_table_rows(&table);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].embed_url, "https://www.youtube.com/embed/abc");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, LinkKind::Whatsapp);
        assert_eq!(links[0].description.as_deref(), Some(""));
        assert_eq!(links[1].kind, LinkKind::Github);
        assert_eq!(links[1].description, None);
        assert!(links.iter().all(|l| !is_youtube(&l.link)));
    }

    #[test]
    fn paragraph_is_sanitized_and_linked() {
        let html = render_paragraph("Apply at https://uniqjobs.co.in/apply <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<a href="https://uniqjobs.co.in/apply" target="_blank""#));
    }

    #[test]
    fn linked_query_string_is_escaped_once() {
        let html = render_paragraph("Apply https://x.com/jobs?a=1&b=2 now");
        assert!(html.contains(r#"<a href="https://x.com/jobs?a=1&amp;b=2" target="_blank""#));
        assert!(html.contains(">https://x.com/jobs?a=1&amp;b=2</a> now"));
        assert!(!html.contains("&amp;amp;"));
    }
}
