use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use spin_sdk::http::{Request, Response};

use crate::config::image_base;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn html_response(status: u16, html: String) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(html.into_bytes())
        .build()
}

pub fn json_response<T: serde::Serialize>(value: &T) -> anyhow::Result<Response> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .body(serde_json::to_vec(value)?)
        .build())
}

pub fn text_response(body: String) -> Response {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(body.into_bytes())
        .build()
}

/// Resolve a post image filename against the image host.
pub fn image_url(filename: &str) -> Option<String> {
    if filename.is_empty() {
        return None;
    }
    Some(format!("{}/{}", image_base(), urlencoding::encode(filename)))
}

/// Read a single cookie value from the request.
pub fn cookie(req: &Request, name: &str) -> Option<String> {
    let header = req.header("Cookie").and_then(|h| h.as_str())?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Parse the API's publish timestamps: RFC 3339, or MySQL's `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// "5 minutes ago" style label. Unparseable input comes back verbatim.
pub fn time_ago(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    let units = [
        (365 * 24 * 3600, "year"),
        (30 * 24 * 3600, "month"),
        (7 * 24 * 3600, "week"),
        (24 * 3600, "day"),
        (3600, "hour"),
        (60, "minute"),
    ];
    for (size, name) in units {
        let n = secs / size;
        if n >= 1 {
            let plural = if n == 1 { "" } else { "s" };
            return format!("{} {}{} ago", n, name, plural);
        }
    }
    "just now".to_string()
}
