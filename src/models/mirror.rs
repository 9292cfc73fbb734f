//! Wire types for the mirror's JSON endpoints.
//!
//! The mirror is loose about scalar types: years, ids and the pagination
//! flag show up as strings on some deployments and as numbers on others.
//! The deserializers below accept both.

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use super::query::MediaType;

fn scalar_to_string<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected string or number, got {other}"))),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value).map(Option::unwrap_or_default)
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value)
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s.trim() == "1",
        _ => false,
    })
}

/// Parses a year-like label such as `"2019"`.
#[must_use]
pub fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,

    #[serde(rename = "searchResult", default)]
    pub search_result: Option<Vec<SearchCandidate>>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchCandidate {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(rename = "t", default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(rename = "y", default, deserialize_with = "lenient_opt_string")]
    pub year: Option<String>,
}

impl SearchCandidate {
    /// The candidate's own year label, if the search row carried a non-empty one.
    #[must_use]
    pub fn year_label(&self) -> Option<&str> {
        self.year.as_deref().filter(|y| !y.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaMeta {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub year: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "lenient_opt_string")]
    pub type_tag: Option<String>,

    #[serde(default)]
    pub season: Option<Vec<SeasonEntry>>,
}

impl MediaMeta {
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.year.as_deref().and_then(parse_year)
    }

    #[must_use]
    pub fn is_media_type(&self, media_type: MediaType) -> bool {
        self.type_tag.as_deref() == Some(media_type.mirror_tag())
    }

    #[must_use]
    pub fn seasons(&self) -> &[SeasonEntry] {
        self.season.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeasonEntry {
    /// Season number label, e.g. `"1"`.
    #[serde(rename = "s", deserialize_with = "lenient_string")]
    pub number: String,

    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(rename = "ep", default, deserialize_with = "lenient_opt_string")]
    pub episode_label: Option<String>,
}

impl SeasonEntry {
    #[must_use]
    pub fn season_number(&self) -> Option<u32> {
        self.number.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EpisodePage {
    #[serde(default)]
    pub episodes: Option<Vec<EpisodeEntry>>,

    #[serde(rename = "nextPageShow", default, deserialize_with = "lenient_flag")]
    pub next_page_show: bool,
}

impl EpisodePage {
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_page_show
    }

    #[must_use]
    pub fn into_episodes(self) -> Vec<EpisodeEntry> {
        self.episodes.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    /// Season label in `S<n>` form.
    #[serde(rename = "s", default, deserialize_with = "lenient_string")]
    pub season_label: String,

    /// Episode label in `E<n>` form.
    #[serde(rename = "ep", default, deserialize_with = "lenient_string")]
    pub episode_label: String,
}

impl EpisodeEntry {
    #[must_use]
    pub fn is_episode(&self, season: u32, episode: u32) -> bool {
        self.season_label == format!("S{season}") && self.episode_label == format!("E{episode}")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub sources: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub file: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
}
