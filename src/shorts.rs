use anyhow::Context;
use serde::Deserialize;

use crate::config::{SHORTS_FILE, SHORTS_IMAGE_BASE};
use crate::models::models::ShortItem;
use crate::static_server::Assets;

/// One placed candidate as stored in the bundled file. Every field is required.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PlacedCandidate {
    name: String,
    #[allow(dead_code)]
    company: String,
    position: String,
    package: String,
    photo: String,
    short_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PlacedCandidates {
    placed_candidates: Vec<PlacedCandidate>,
}

fn thumb_path(photo: &str) -> String {
    if photo.starts_with('/') {
        photo.to_string()
    } else {
        format!("{}{}", SHORTS_IMAGE_BASE, photo)
    }
}

/// Validate and reshape a placed-candidates document. Any invalid record
/// fails the whole load.
pub fn parse_shorts(raw: &str) -> anyhow::Result<Vec<ShortItem>> {
    let root: PlacedCandidates =
        serde_json::from_str(raw).context("placed candidates document does not match schema")?;

    Ok(root
        .placed_candidates
        .into_iter()
        .map(|p| ShortItem {
            title: format!("{} | {} | uniq jobs", p.name, p.position),
            thumb: thumb_path(&p.photo),
            id: p.short_id,
            name: p.name,
            role: p.position,
            salary: p.package,
        })
        .collect())
}

/// Load the bundled short-video file.
pub fn load_shorts() -> anyhow::Result<Vec<ShortItem>> {
    let file = Assets::get(SHORTS_FILE).ok_or_else(|| anyhow::anyhow!("{} is not bundled", SHORTS_FILE))?;
    let raw = std::str::from_utf8(&file.data).context("placed candidates file is not UTF-8")?;
    parse_shorts(raw)
}
