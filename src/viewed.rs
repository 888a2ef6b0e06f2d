use log::debug;
use serde::Serialize;
use spin_sdk::http::Request;

use crate::config::{VIEWED_COOKIE, VIEWED_COOKIE_MAX_BYTES, VIEWED_TITLE_MAX_CHARS, VIEWED_TRAIL_CAP};
use crate::core::helpers::cookie;
use crate::models::models::RelatedPost;

// Cookie form of an entry. Reads back as a `RelatedPost` with the rest defaulted.
#[derive(Serialize)]
struct StoredEntry<'a> {
    slug: &'a str,
    title: &'a str,
}

/// Related posts the visitor clicked through during this browser session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewedTrail {
    entries: Vec<RelatedPost>,
}

impl ViewedTrail {
    pub fn entries(&self) -> &[RelatedPost] {
        &self.entries
    }

    /// Append unless the slug is already there; the oldest entry falls off past the cap.
    /// Only slug and a shortened title are kept, and older entries also go
    /// when the encoded cookie would outgrow [`VIEWED_COOKIE_MAX_BYTES`].
    pub fn push(&mut self, post: RelatedPost) -> bool {
        if post.slug.is_empty() || self.entries.iter().any(|p| p.slug == post.slug) {
            return false;
        }
        self.entries.push(RelatedPost {
            title: post.title.chars().take(VIEWED_TITLE_MAX_CHARS).collect(),
            slug: post.slug,
            ..Default::default()
        });
        if self.entries.len() > VIEWED_TRAIL_CAP {
            let overflow = self.entries.len() - VIEWED_TRAIL_CAP;
            self.entries.drain(..overflow);
        }
        while self.entries.len() > 1 && self.encode().len() > VIEWED_COOKIE_MAX_BYTES {
            self.entries.remove(0);
        }
        true
    }

    /// Decode the cookie value. A damaged cookie is an empty trail.
    pub fn decode(raw: &str) -> Self {
        let json = urlencoding::decode(raw).map(|s| s.into_owned()).unwrap_or_default();
        match serde_json::from_str::<Vec<RelatedPost>>(&json) {
            Ok(mut entries) => {
                entries.truncate(VIEWED_TRAIL_CAP);
                Self { entries }
            }
            Err(e) => {
                debug!("ignoring unreadable {} cookie: {}", VIEWED_COOKIE, e);
                Self::default()
            }
        }
    }

    pub fn from_request(req: &Request) -> Self {
        cookie(req, VIEWED_COOKIE)
            .map(|raw| Self::decode(&raw))
            .unwrap_or_default()
    }

    pub fn encode(&self) -> String {
        let stored: Vec<StoredEntry> = self
            .entries
            .iter()
            .map(|p| StoredEntry {
                slug: &p.slug,
                title: &p.title,
            })
            .collect();
        let json = serde_json::to_string(&stored).unwrap_or_else(|_| "[]".to_string());
        urlencoding::encode(&json).into_owned()
    }

    /// Session cookie (no Max-Age) scoped to the post pages.
    pub fn set_cookie_header(&self) -> String {
        format!("{}={}; Path=/blog; SameSite=Lax", VIEWED_COOKIE, self.encode())
    }
}
