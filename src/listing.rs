use std::collections::HashMap;

use crate::config::{INITIAL_VISIBLE, LOAD_MORE_STEP};
use crate::core::query_params::{get_int, get_string};
use crate::models::models::Post;

/// Case-insensitive title containment. A blank term matches everything.
pub fn matches_search(post: &Post, term: &str) -> bool {
    term.trim().is_empty() || post.title.to_lowercase().contains(&term.to_lowercase())
}

/// Search term and how many cards are revealed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingState {
    pub search: String,
    pub visible: usize,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            search: String::new(),
            visible: INITIAL_VISIBLE,
        }
    }
}

impl ListingState {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            search: get_string(params, "q", None).unwrap_or_default(),
            visible: get_int(params, "show", INITIAL_VISIBLE),
        }
    }

    pub fn load_more(&self) -> Self {
        Self {
            search: self.search.clone(),
            visible: self.visible + LOAD_MORE_STEP,
        }
    }

    pub fn query_string(&self) -> String {
        let mut parts = Vec::new();
        if !self.search.trim().is_empty() {
            parts.push(format!("q={}", urlencoding::encode(&self.search)));
        }
        if self.visible != INITIAL_VISIBLE {
            parts.push(format!("show={}", self.visible));
        }
        parts.join("&")
    }
}

/// A fetched post and whether it is revealed on first paint.
pub struct ListingCard<'a> {
    pub post: &'a Post,
    pub shown: bool,
}

/// One rendered listing page. Every fetched post gets a card so the
/// in-page search can work over the whole list; only the first
/// `visible` matches start out shown.
pub struct ListingPage<'a> {
    pub cards: Vec<ListingCard<'a>>,
    pub shown: usize,
    pub matched: usize,
    pub has_more: bool,
}

impl ListingPage<'_> {
    pub fn shown_posts(&self) -> impl Iterator<Item = &Post> {
        self.cards.iter().filter(|c| c.shown).map(|c| c.post)
    }
}

pub fn paginate<'a>(posts: &'a [Post], state: &ListingState) -> ListingPage<'a> {
    let mut matched = 0;
    let cards: Vec<ListingCard> = posts
        .iter()
        .map(|post| {
            let hit = matches_search(post, &state.search);
            let shown = hit && matched < state.visible;
            if hit {
                matched += 1;
            }
            ListingCard { post, shown }
        })
        .collect();

    ListingPage {
        shown: cards.iter().filter(|c| c.shown).count(),
        has_more: state.visible < matched,
        cards,
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query_params::parse_query_params;

    fn titled(titles: &[&str]) -> Vec<Post> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| Post {
                slug: format!("post-{}", i),
                title: t.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let posts = titled(&["Intro to React", "Advanced CSS"]);
        for term in ["css", "CSS", "cSs"] {
            let hits: Vec<_> = posts.iter().filter(|p| matches_search(p, term)).collect();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].title, "Advanced CSS");
        }
    }

    #[test]
    fn blank_search_keeps_everything() {
        let posts = titled(&["Intro to React", "Advanced CSS"]);
        assert!(posts.iter().all(|p| matches_search(p, "")));
        assert!(posts.iter().all(|p| matches_search(p, "   ")));
    }

    #[test]
    fn reveals_six_then_four_more() {
        let posts = titled(&["a"; 13]);
        let state = ListingState::default();

        let page = paginate(&posts, &state);
        assert_eq!(page.shown, 6);
        assert_eq!(page.cards.len(), 13);
        assert!(page.has_more);

        let state = state.load_more();
        assert_eq!(paginate(&posts, &state).shown, 10);

        let state = state.load_more();
        let page = paginate(&posts, &state);
        assert_eq!(page.shown, 13);
        assert!(!page.has_more);
    }

    #[test]
    fn search_reaches_past_the_first_cards() {
        let mut titles = vec!["React hooks"; 7];
        titles.push("Advanced CSS");
        let posts = titled(&titles);

        let page = paginate(&posts, &ListingState::default());
        assert!(page.shown_posts().all(|p| p.title == "React hooks"));
        assert!(page.cards.iter().any(|c| c.post.title == "Advanced CSS" && !c.shown));

        let state = ListingState {
            search: "css".into(),
            ..Default::default()
        };
        let page = paginate(&posts, &state);
        assert_eq!(page.matched, 1);
        let shown: Vec<_> = page.shown_posts().map(|p| p.slug.as_str()).collect();
        assert_eq!(shown, vec!["post-7"]);
        assert_eq!(page.cards.len(), 8);
        assert!(!page.has_more);
    }

    #[test]
    fn state_round_trips_through_query() {
        let state = ListingState {
            search: "data science".into(),
            visible: 10,
        };
        let params = parse_query_params(&format!("/blogs?{}", state.query_string()));
        assert_eq!(ListingState::from_params(&params), state);
        assert_eq!(ListingState::default().query_string(), "");
    }
}
