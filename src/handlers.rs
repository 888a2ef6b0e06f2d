use log::{error, info};
use spin_sdk::http::{Method, Request, Response};

use crate::aside::{category_href, render_aside, tag_href, AsideSelection};
use crate::config::*;
use crate::content::{ContentClient, ListFilter, Transport};
use crate::core::errors::ApiError;
use crate::core::helpers::{html_response, json_response, now, text_response};
use crate::core::query_params::{get_string, parse_query_params};
use crate::listing::{paginate, ListingState};
use crate::models::models::RelatedPost;
use crate::posts::assemble_detail;
use crate::seo::{robots_txt, PageMeta};
use crate::shorts::load_shorts;
use crate::static_server::serve_static;
use crate::templates::{render_detail_page, render_listing_page, render_not_found_page, render_shorts_page, ListingView};
use crate::viewed::ViewedTrail;

/// Route a request. Failures become error pages (or JSON under `/api`).
pub async fn dispatch<T: Transport>(client: &ContentClient<T>, req: Request) -> Response {
    let path = req.path().to_string();

    if !matches!(req.method(), Method::Get | Method::Head) {
        return ApiError::BadRequest(format!("Unsupported method {:?}", req.method())).into_json_response();
    }

    let result = match path.as_str() {
        "/" | "/blogs" | "/blogs/" => blogs_index(client, &req).await,
        "/blogs/category" | "/blogs/category/" => blogs_by_category(client, &req).await,
        "/blogs/tags" | "/blogs/tags/" => blogs_by_tag(client, &req).await,
        p if p.starts_with("/blog/") => blog_detail(client, &req, &p["/blog/".len()..]).await,
        "/shorts" => shorts_page(),
        "/api/shorts" => shorts_json(),
        "/robots.txt" => Ok(text_response(robots_txt())),
        p => serve_static(p),
    };

    match result {
        Ok(resp) => resp,
        Err(e) => {
            error!("GET {} failed: {:#}", path, e);
            let api = ApiError::from(e);
            if path.starts_with("/api/") {
                api.into_json_response()
            } else {
                api.into_page_response()
            }
        }
    }
}

pub async fn blogs_index<T: Transport>(client: &ContentClient<T>, req: &Request) -> anyhow::Result<Response> {
    render_listing(client, req, ListFilter::Latest).await
}

pub async fn blogs_by_category<T: Transport>(client: &ContentClient<T>, req: &Request) -> anyhow::Result<Response> {
    let params = parse_query_params(&req.uri());
    let filter = match get_string(&params, "category", None) {
        Some(category) => ListFilter::Category(category),
        None => ListFilter::Latest,
    };
    render_listing(client, req, filter).await
}

pub async fn blogs_by_tag<T: Transport>(client: &ContentClient<T>, req: &Request) -> anyhow::Result<Response> {
    let params = parse_query_params(&req.uri());
    let filter = match get_string(&params, "tag", None) {
        Some(tag) => ListFilter::Tag(tag),
        None => ListFilter::Latest,
    };
    render_listing(client, req, filter).await
}

async fn render_listing<T: Transport>(
    client: &ContentClient<T>,
    req: &Request,
    filter: ListFilter,
) -> anyhow::Result<Response> {
    let params = parse_query_params(&req.uri());
    let state = ListingState::from_params(&params);
    let selection = AsideSelection::from_params(&params);

    let posts = client.list_posts(LISTING_PAGE, LISTING_LIMIT, &filter).await?;
    let categories = client.list_categories().await?;
    let tags = client.list_tags().await?;

    let (crumb, base_href, path) = match &filter {
        ListFilter::Latest => ("Latest Blogs".to_string(), "/blogs".to_string(), "/blogs".to_string()),
        ListFilter::Category(c) => (c.clone(), category_href(c), category_href(c)),
        ListFilter::Tag(t) => (format!("#{}", t), tag_href(t), tag_href(t)),
    };

    let view = ListingView {
        meta: PageMeta::for_listing(&format!("{} | Uniq Jobs Blog", crumb), &path),
        aside: render_aside(&categories, &tags, &selection),
        crumb: &crumb,
        base_href,
        state: &state,
    };
    let page = paginate(&posts, &state);
    info!("listing {:?}: {} posts, {} matched", filter, posts.len(), page.matched);

    Ok(html_response(200, render_listing_page(&view, &page, now())?))
}

pub async fn blog_detail<T: Transport>(client: &ContentClient<T>, req: &Request, raw_slug: &str) -> anyhow::Result<Response> {
    let slug = urlencoding::decode(raw_slug.trim_end_matches('/'))
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw_slug.to_string());
    if slug.is_empty() {
        return Ok(html_response(404, render_not_found_page()));
    }

    let Some(detail) = assemble_detail(client, &slug).await? else {
        return Ok(html_response(404, render_not_found_page()));
    };

    let params = parse_query_params(&req.uri());
    let mut trail = ViewedTrail::from_request(req);
    let via_related = params.get("via").map(|v| v == "related").unwrap_or(false);
    let trail_changed = via_related && trail.push(RelatedPost::from(&detail.post));

    let html = render_detail_page(&detail, &trail, now())?;

    let mut builder = Response::builder();
    builder
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8");
    if trail_changed {
        builder.header("Set-Cookie", trail.set_cookie_header());
    }
    Ok(builder.body(html.into_bytes()).build())
}

pub fn shorts_page() -> anyhow::Result<Response> {
    let items = load_shorts()?;
    Ok(html_response(200, render_shorts_page(&items)?))
}

pub fn shorts_json() -> anyhow::Result<Response> {
    let items = load_shorts()?;
    json_response(&items)
}
