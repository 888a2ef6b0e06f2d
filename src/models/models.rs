use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Section {
    #[serde(default, deserialize_with = "null_as_default")]
    pub heading: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paragraph: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ContentBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TableData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "null_cells")]
    pub rows: Vec<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Post {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentBlock>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub table_data: TableData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule_timer: String,
}

/// Sidebar projection of a [`Post`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RelatedPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub schedule_timer: String,
    #[serde(default)]
    pub category: String,
}

impl From<&Post> for RelatedPost {
    fn from(post: &Post) -> Self {
        RelatedPost {
            slug: post.slug.clone(),
            title: post.title.clone(),
            image: post.image.clone(),
            schedule_timer: post.schedule_timer.clone(),
            category: post.category.clone(),
        }
    }
}

/// Display item for the short-video carousel.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShortItem {
    pub id: String,
    pub name: String,
    pub role: String,
    pub salary: String,
    pub title: String,
    pub thumb: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Youtube,
    Whatsapp,
    Github,
    Website,
    Other,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Youtube => "youtube",
            LinkKind::Whatsapp => "whatsapp",
            LinkKind::Github => "github",
            LinkKind::Website => "website",
            LinkKind::Other => "other",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinkRow {
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub kind: LinkKind,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VideoRow {
    pub title: String,
    pub url: String,
    pub embed_url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Blank cells come back as null.
fn null_cells<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Option<Vec<Option<String>>>>>::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.unwrap_or_default().into_iter().map(Option::unwrap_or_default).collect())
        .collect())
}

// The API hands ids out as numbers, older rows as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}
