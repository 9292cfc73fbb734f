use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query title cannot be empty")]
    EmptyTitle,

    #[error("Show queries need both a season and an episode number")]
    MissingEpisode,

    #[error("Movie queries cannot carry season or episode numbers")]
    UnexpectedEpisode,

    #[error("Invalid query payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
}

impl MediaType {
    /// Type tag used by the mirror's metadata endpoint (`m` or `t`).
    #[must_use]
    pub const fn mirror_tag(self) -> &'static str {
        match self {
            Self::Movie => "m",
            Self::Show => "t",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Show => write!(f, "show"),
        }
    }
}

/// A single resolution request.
///
/// `season` and `episode` are set exactly when `media_type` is
/// [`MediaType::Show`]; [`Query::validate`] enforces this for values that
/// did not come from the constructors (payloads, CLI input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub title: String,

    pub release_year: i32,

    #[serde(rename = "type")]
    pub media_type: MediaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

impl Query {
    pub fn movie(title: impl Into<String>, release_year: i32) -> Self {
        Self {
            title: title.into(),
            release_year,
            media_type: MediaType::Movie,
            season: None,
            episode: None,
            tmdb_id: None,
            imdb_id: None,
        }
    }

    pub fn show(title: impl Into<String>, release_year: i32, season: u32, episode: u32) -> Self {
        Self {
            title: title.into(),
            release_year,
            media_type: MediaType::Show,
            season: Some(season),
            episode: Some(episode),
            tmdb_id: None,
            imdb_id: None,
        }
    }

    #[must_use]
    pub fn with_tmdb_id(mut self, id: impl Into<String>) -> Self {
        self.tmdb_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_imdb_id(mut self, id: impl Into<String>) -> Self {
        self.imdb_id = Some(id.into());
        self
    }

    /// Season and episode to resolve, for show queries.
    #[must_use]
    pub const fn episode_target(&self) -> Option<(u32, u32)> {
        match (self.media_type, self.season, self.episode) {
            (MediaType::Show, Some(season), Some(episode)) => Some((season, episode)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.title.trim().is_empty() {
            return Err(QueryError::EmptyTitle);
        }

        match self.media_type {
            MediaType::Show if self.season.is_none() || self.episode.is_none() => {
                Err(QueryError::MissingEpisode)
            }
            MediaType::Movie if self.season.is_some() || self.episode.is_some() => {
                Err(QueryError::UnexpectedEpisode)
            }
            _ => Ok(()),
        }
    }

    /// Serializes the query into the JSON payload carried by embed links.
    pub fn to_payload(&self) -> Result<String, QueryError> {
        serde_json::to_string(self).map_err(|e| QueryError::Payload(e.to_string()))
    }

    /// Parses and validates an embed link payload.
    pub fn from_payload(payload: &str) -> Result<Self, QueryError> {
        let query: Self =
            serde_json::from_str(payload).map_err(|e| QueryError::Payload(e.to_string()))?;
        query.validate()?;
        Ok(query)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.release_year)?;
        if let Some((season, episode)) = self.episode_target() {
            write!(f, " S{season:02}E{episode:02}")?;
        }
        Ok(())
    }
}
