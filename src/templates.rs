use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::aside::tag_href;
use crate::config::{INITIAL_VISIBLE, LOAD_MORE_STEP, SHIMMER_DELAY_MS};
use crate::core::helpers::{image_url, time_ago};
use crate::listing::{ListingPage, ListingState};
use crate::models::models::{LinkKind, LinkRow, Post, RelatedPost, ShortItem, VideoRow};
use crate::posts::{render_paragraph, PostDetail};
use crate::seo::{article_ld, breadcrumb_ld, ld_script, PageMeta};
use crate::static_server::Assets;
use crate::viewed::ViewedTrail;

const LINK_ICON: &str = r##"<svg class="icon" fill="none" stroke="#2563eb" stroke-width="2" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" d="M10 13a5 5 0 007.54.54l1.42-1.42a5 5 0 00-7.07-7.07l-1.42 1.42M14 11a5 5 0 00-7.54-.54l-1.42 1.42a5 5 0 007.07 7.07l1.42-1.42"/></svg>"##;
const WHATSAPP_ICON: &str = r##"<svg class="icon" viewBox="0 0 32 32"><circle cx="16" cy="16" r="14" fill="#27B43E"/><path fill="#fff" d="M12.5 9.5c-.33-.67-.84-.61-1.36-.61-.92 0-2.36 1.1-2.36 3.16 0 1.68.74 3.53 3.24 6.29 2.41 2.66 5.59 4.04 8.22 3.99 2.63-.05 3.17-2.31 3.17-3.08 0-.34-.21-.51-.36-.55-.9-.43-2.55-1.23-2.93-1.38-.38-.15-.57.05-.7.16-.34.33-1.02 1.29-1.25 1.5-.23.22-.58.11-.72.03-.53-.21-1.97-.85-3.11-1.96-1.41-1.37-1.5-1.84-1.76-2.26-.21-.34-.06-.54.02-.63.31-.35.73-.9.92-1.16.19-.27.04-.68-.05-.93-.39-1.1-.71-2.02-.98-2.55z"/></svg>"##;
const GITHUB_ICON: &str = r#"<svg class="icon" viewBox="0 0 16 16" fill="currentColor"><path d="M8 0C3.58 0 0 3.58 0 8c0 3.54 2.29 6.53 5.47 7.59.4.07.55-.17.55-.38 0-.19-.01-.82-.01-1.49-2.01.37-2.53-.49-2.69-.94-.09-.23-.48-.94-.82-1.13-.28-.15-.68-.52-.01-.53.63-.01 1.08.58 1.23.82.72 1.21 1.87.87 2.33.66.07-.52.28-.87.51-1.07-1.78-.2-3.64-.89-3.64-3.95 0-.87.31-1.59.82-2.15-.08-.2-.36-1.02.08-2.12 0 0 .67-.21 2.2.82a7.46 7.46 0 0 1 4 0c1.53-1.04 2.2-.82 2.2-.82.44 1.1.16 1.92.08 2.12.51.56.82 1.27.82 2.15 0 3.07-1.87 3.75-3.65 3.95.29.25.54.73.54 1.48 0 1.07-.01 1.93-.01 2.2 0 .21.15.46.55.38A8.01 8.01 0 0 0 16 8c0-4.42-3.58-8-8-8z"/></svg>"#;

/// Wrap a page body in the shared layout.
pub fn render_layout(head: &str, body: &str) -> anyhow::Result<String> {
    let template = Assets::get("layout.html")
        .ok_or_else(|| anyhow::anyhow!("Layout template not found"))?
        .data
        .to_vec();

    let html = String::from_utf8(template)?;

    // Body first: PAGE_HEAD then stays the first occurrence of its marker.
    Ok(html.replacen("PAGE_BODY", body, 1).replacen("PAGE_HEAD", head, 1))
}

pub fn render_error_page(status: u16, message: &str) -> String {
    let body = format!(
        r#"<main class="listing"><h1>{}</h1><p>{}</p><p><a class="back" href="/blogs">Back to Blogs</a></p></main>"#,
        status,
        text(message)
    );
    let head = format!("<title>{} | Uniq Jobs</title>", status);
    render_layout(&head, &body).unwrap_or_else(|_| format!("<!DOCTYPE html><html><body>{}</body></html>", body))
}

pub fn render_not_found_page() -> String {
    render_error_page(404, "Blog not found.")
}

pub fn breadcrumbs(items: &[(&str, Option<&str>)]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|(label, href)| match href {
            Some(href) => format!(r#"<a href="{}">{}</a>"#, attr(href), text(label)),
            None => format!("<span>{}</span>", text(label)),
        })
        .collect();
    format!(r#"<nav class="crumbs">{}</nav>"#, parts.join(" / "))
}

fn cover(image: &str, alt: &str, class: &str) -> String {
    match image_url(image) {
        Some(src) => format!(r#"<img class="{}" src="{}" alt="{}" loading="lazy">"#, class, attr(&src), attr(alt)),
        None => r#"<div class="no-image">No Image</div>"#.to_string(),
    }
}

fn byline(schedule_timer: &str, now: DateTime<Utc>) -> String {
    format!(
        r#"<p class="byline">Published By <strong>Uniq Official</strong> &middot; {}</p>"#,
        text(&time_ago(schedule_timer, now))
    )
}

pub fn blog_card(post: &Post, now: DateTime<Utc>) -> String {
    listing_card(post, true, now)
}

fn listing_card(post: &Post, shown: bool, now: DateTime<Utc>) -> String {
    let href = format!("/blog/{}", urlencoding::encode(&post.slug));
    let title = if post.title.is_empty() { "Untitled Blog" } else { post.title.as_str() };
    format!(
        r#"<article class="card" data-title="{}"{}><a href="{href}">{}</a><div class="card-body"><a class="card-title" href="{href}">{}</a>{}</div></article>"#,
        attr(&post.title),
        if shown { "" } else { " hidden" },
        cover(&post.image, title, ""),
        text(title),
        byline(&post.schedule_timer, now),
        href = attr(&href)
    )
}

fn aside_card(post: &RelatedPost, now: DateTime<Utc>) -> String {
    let href = format!("/blog/{}?via=related", urlencoding::encode(&post.slug));
    format!(
        r#"<article class="aside-card"><a href="{href}">{}</a><div><a class="card-title" href="{href}">{}</a>{}</div></article>"#,
        cover(&post.image, &post.title, ""),
        text(&post.title),
        byline(&post.schedule_timer, now),
        href = attr(&href)
    )
}

/// Everything a listing page needs besides the posts.
pub struct ListingView<'a> {
    pub meta: PageMeta,
    pub aside: String,
    pub crumb: &'a str,
    /// Path plus the filter parameter, e.g. `/blogs/tags/?tag=rust`.
    pub base_href: String,
    pub state: &'a ListingState,
}

fn with_query(base: &str, query: &str) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, sep, query)
}

pub fn render_listing_page(view: &ListingView, page: &ListingPage, now: DateTime<Utc>) -> anyhow::Result<String> {
    let cards: String = page.cards.iter().map(|c| listing_card(c.post, c.shown, now)).collect();
    let shimmer: String = (0..page.shown.min(INITIAL_VISIBLE))
        .map(|_| r#"<div class="shimmer-card"></div>"#)
        .collect();

    let empty = format!(
        r#"<p class="empty" data-empty{}>No blogs found matching your search.</p>"#,
        if page.matched == 0 { "" } else { " hidden" }
    );

    // Always present so the in-page search can bring it back.
    let next = with_query(&view.base_href, &view.state.load_more().query_string());
    let more = format!(
        r#"<div class="more" data-more{}><a href="{}">Learn More</a></div>"#,
        if page.has_more { "" } else { " hidden" },
        attr(&next)
    );

    // Hidden inputs keep the active filter when the search form submits.
    let (action, hidden) = match view.base_href.split_once('?') {
        Some((path, query)) => {
            let inputs: String = query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| {
                    let value = urlencoding::decode(v).map(|s| s.into_owned()).unwrap_or_default();
                    format!(r#"<input type="hidden" name="{}" value="{}">"#, attr(k), attr(&value))
                })
                .collect();
            (path.to_string(), inputs)
        }
        None => (view.base_href.clone(), String::new()),
    };

    let body = format!(
        r#"<aside>{aside}</aside>
<main class="listing is-loading" data-shimmer-ms="{delay}" data-visible="{visible}" data-step="{step}">
<div class="listing-bar">{crumbs}<form class="search" action="{action}" method="get">{hidden}<input type="text" name="q" value="{q}" placeholder="Search for blog" data-search></form></div>
<div class="cards shimmer">{shimmer}</div>
<div class="cards cards-live">{cards}</div>
{empty}
{more}
</main>"#,
        aside = view.aside,
        delay = SHIMMER_DELAY_MS,
        visible = view.state.visible,
        step = LOAD_MORE_STEP,
        crumbs = breadcrumbs(&[("Home", Some("/")), ("Blogs", Some("/blogs")), (view.crumb, None)]),
        action = attr(&action),
        hidden = hidden,
        q = attr(&view.state.search),
        shimmer = shimmer,
        cards = cards,
        empty = empty,
        more = more,
    );

    render_layout(&view.meta.render(), &body)
}

fn link_icon(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Whatsapp => WHATSAPP_ICON,
        LinkKind::Github => GITHUB_ICON,
        _ => LINK_ICON,
    }
}

/// Title, optional description, link. Headers come from the table's first,
/// second and last columns.
fn links_table(columns: &[String], rows: &[LinkRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let with_description = rows.iter().any(|r| r.description.is_some());
    let label = |col: Option<&String>, fallback: &'static str| -> String {
        text(col.map(String::as_str).unwrap_or(fallback)).into_owned()
    };

    let mut head = format!("<th>{}</th>", label(columns.first(), "Title"));
    if with_description {
        head.push_str(&format!("<th>{}</th>", label(columns.get(1).filter(|_| columns.len() > 2), "Description")));
    }
    head.push_str(&format!("<th>{}</th>", label(columns.last().filter(|_| columns.len() > 1), "Link")));

    let body: String = rows
        .iter()
        .map(|row| {
            let description = if with_description {
                format!("<td>{}</td>", text(row.description.as_deref().unwrap_or_default()))
            } else {
                String::new()
            };
            format!(
                r#"<tr><td>{}</td>{}<td><a href="{}" target="_blank" rel="noopener noreferrer" data-kind="{}">{}</a></td></tr>"#,
                text(&row.title),
                description,
                attr(&row.link),
                row.kind.as_str(),
                link_icon(row.kind)
            )
        })
        .collect();
    format!(r#"<table class="links"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>"#, head, body)
}

fn video_grid(videos: &[VideoRow]) -> String {
    if videos.is_empty() {
        return String::new();
    }
    let frames: String = videos
        .iter()
        .map(|v| {
            format!(
                r#"<div><h3>{}</h3><iframe src="{}" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe><a href="{}" target="_blank" rel="noopener noreferrer">Watch on YouTube</a></div>"#,
                text(&v.title),
                attr(&v.embed_url),
                attr(&v.url)
            )
        })
        .collect();
    format!(r#"<section><h2>Youtube Video's</h2><div class="videos">{}</div></section>"#, frames)
}

fn content_blocks(post: &Post) -> String {
    post.content
        .iter()
        .map(|block| {
            let sections: String = block
                .sections
                .iter()
                .enumerate()
                .map(|(i, s)| format!("<h3>{}. {}</h3><p>{}</p>", i + 1, text(&s.heading), render_paragraph(&s.paragraph)))
                .collect();
            format!("<div><h2>{}</h2><p>{}</p>{}</div>", text(&block.title), text(&block.description), sections)
        })
        .collect()
}

fn tag_chips(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: String = tags
        .iter()
        .map(|t| format!(r#"<li><a href="{}">#{}</a></li>"#, attr(&tag_href(t)), text(t)))
        .collect();
    format!(r#"<section><h2>Tags In</h2><ul class="tags">{}</ul></section>"#, items)
}

fn sidebar(detail: &PostDetail, trail: &ViewedTrail, now: DateTime<Utc>) -> String {
    let mut html = String::new();
    if !detail.related.is_empty() {
        html.push_str(&format!("<h2>More in {}</h2>", text(&detail.post.category)));
        html.extend(detail.related.iter().map(|p| aside_card(p, now)));
    }
    if !trail.entries().is_empty() {
        html.push_str("<h3>Previously Viewed</h3>");
        html.extend(trail.entries().iter().map(|p| aside_card(p, now)));
    }
    html
}

pub fn render_detail_page(detail: &PostDetail, trail: &ViewedTrail, now: DateTime<Utc>) -> anyhow::Result<String> {
    let post = &detail.post;
    let meta = PageMeta::for_post(post);

    let head = format!(
        "{}\n{}\n{}",
        meta.render(),
        ld_script("ld-post", &article_ld(post)),
        ld_script("ld-breadcrumbs", &breadcrumb_ld(post))
    );

    let body = format!(
        r#"<div class="detail">
<main class="detail-main">
{crumbs}
<div class="detail-head"><p><a class="back" href="/blogs">Back</a> Published By <strong>Uniq Official</strong></p><span>{ago}</span></div>
<h1>{title}</h1>
{cover}
<p>{description}</p>
{content}
{links}
{videos}
{tags}
<p class="more"><a href="/blogs">Back to Blogs</a></p>
</main>
<aside class="detail-side">{side}</aside>
</div>"#,
        crumbs = breadcrumbs(&[("Home", Some("/")), ("Blogs", Some("/blogs")), (post.title.as_str(), None)]),
        ago = text(&time_ago(&post.schedule_timer, now)),
        title = text(&post.title),
        cover = cover(&post.image, &post.title, "cover"),
        description = text(&post.description),
        content = content_blocks(post),
        links = links_table(&post.table_data.columns, &detail.links),
        videos = video_grid(&detail.videos),
        tags = tag_chips(&post.tags),
        side = sidebar(detail, trail, now),
    );

    render_layout(&head, &body)
}

pub fn render_shorts_page(items: &[ShortItem]) -> anyhow::Result<String> {
    let cards: String = items
        .iter()
        .map(|s| {
            format!(
                r#"<figure class="short"><a href="https://www.youtube.com/shorts/{}" target="_blank" rel="noopener noreferrer"><img src="{}" alt="{}" loading="lazy"></a><figcaption><strong>{}</strong><br>{} &middot; {}</figcaption></figure>"#,
                urlencoding::encode(&s.id),
                attr(&s.thumb),
                attr(&s.title),
                text(&s.name),
                text(&s.role),
                text(&s.salary)
            )
        })
        .collect();

    let meta = PageMeta::for_listing("Placed Candidates | Uniq Jobs", "/shorts");
    let body = format!(r#"<main><h1 class="aside-title">Placed Candidates</h1><div class="shorts">{}</div></main>"#, cards);
    render_layout(&meta.render(), &body)
}
