use std::collections::HashMap;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::core::query_params::get_string;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsideTab {
    Categories,
    Tags,
}

impl AsideTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            AsideTab::Categories => "categories",
            AsideTab::Tags => "tags",
        }
    }
}

/// Which strip is open and which button is highlighted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsideSelection {
    pub tab: AsideTab,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl AsideSelection {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let category = get_string(params, "category", None);
        let tag = get_string(params, "tag", None);
        let tab = match params.get("tab").map(String::as_str) {
            Some("tags") => AsideTab::Tags,
            Some("categories") => AsideTab::Categories,
            _ if tag.is_some() => AsideTab::Tags,
            _ => AsideTab::Categories,
        };
        Self { tab, category, tag }
    }
}

pub fn category_href(category: &str) -> String {
    format!("/blogs/category/?category={}", urlencoding::encode(category))
}

pub fn tag_href(tag: &str) -> String {
    format!("/blogs/tags/?tag={}", urlencoding::encode(tag))
}

fn strip_button(href: &str, label: &str, active: bool) -> String {
    let class = if active { "chip chip-active" } else { "chip" };
    format!(
        r#"<a class="{}" href="{}">{}</a>"#,
        class,
        encode_double_quoted_attribute(href),
        encode_text(label)
    )
}

fn strip(id: &str, buttons: Vec<String>) -> String {
    format!(
        r#"<div class="strip" data-strip="{id}">
  <button class="strip-arrow strip-left" data-scroll="-200" hidden>&lsaquo;</button>
  <div class="strip-track" id="{id}">{}</div>
  <button class="strip-arrow strip-right" data-scroll="200" hidden>&rsaquo;</button>
</div>"#,
        buttons.join(""),
        id = id
    )
}

/// Sidebar markup: tab headers plus the open strip.
pub fn render_aside(categories: &[String], tags: &[String], selection: &AsideSelection) -> String {
    let tabs: String = [AsideTab::Categories, AsideTab::Tags]
        .iter()
        .map(|tab| {
            let class = if *tab == selection.tab { "tab tab-active" } else { "tab" };
            format!(r#"<a class="{}" href="/blogs?tab={}">{}</a>"#, class, tab.as_str(), tab.as_str())
        })
        .collect();

    let body = match selection.tab {
        AsideTab::Categories => {
            let mut buttons = vec![strip_button("/blogs", "Latest Blogs", selection.category.is_none())];
            buttons.extend(categories.iter().map(|c| {
                strip_button(&category_href(c), c, selection.category.as_deref() == Some(c.as_str()))
            }));
            strip("category-strip", buttons)
        }
        AsideTab::Tags => {
            let mut buttons = vec![strip_button("/blogs", "Latest Blogs", selection.tag.is_none())];
            buttons.extend(tags.iter().map(|t| {
                strip_button(&tag_href(t), &format!("#{}", t), selection.tag.as_deref() == Some(t.as_str()))
            }));
            strip("tag-strip", buttons)
        }
    };

    format!(
        r#"<div class="aside"><h1 class="aside-title">IT Blogs &amp; Technology</h1><nav class="tabs">{}</nav>{}</div>"#,
        tabs, body
    )
}
