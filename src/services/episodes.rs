use tracing::{debug, info};

use crate::clients::MirrorClient;
use crate::constants::mirror::FIRST_FOLLOW_UP_PAGE;
use crate::models::mirror::{EpisodeEntry, MediaMeta};
use crate::services::embed_service::EmbedError;

/// Season id for `season` in the series metadata.
#[must_use]
pub fn find_season_id(meta: &MediaMeta, season: u32) -> Option<&str> {
    meta.seasons()
        .iter()
        .find(|s| s.season_number() == Some(season))
        .map(|s| s.id.as_str())
}

#[must_use]
pub fn find_episode_id(episodes: &[EpisodeEntry], season: u32, episode: u32) -> Option<&str> {
    episodes
        .iter()
        .find(|e| e.is_episode(season, episode))
        .map(|e| e.id.as_str())
}

/// Fetches a season's full episode listing.
///
/// The first request is unpaged; while the response says more pages exist,
/// pages 2, 3, ... are requested and appended in fetch order.
pub async fn collect_episodes(
    client: &MirrorClient<'_>,
    series_id: &str,
    season_id: &str,
) -> Result<Vec<EpisodeEntry>, EmbedError> {
    let first = client.episodes(season_id, series_id, None).await?;
    let mut more = first.has_more();
    let mut episodes = first.into_episodes();
    let mut page = FIRST_FOLLOW_UP_PAGE;

    while more {
        let next = client.episodes(season_id, series_id, Some(page)).await?;
        more = next.has_more();
        episodes.extend(next.into_episodes());
        page += 1;
    }

    debug!(
        series_id,
        season_id,
        pages = page - FIRST_FOLLOW_UP_PAGE + 1,
        episodes = episodes.len(),
        "Collected episode listing"
    );

    Ok(episodes)
}

/// Resolves the mirror id of a specific episode of `series_id`.
pub async fn resolve_episode(
    client: &MirrorClient<'_>,
    series_id: &str,
    meta: &MediaMeta,
    season: u32,
    episode: u32,
) -> Result<String, EmbedError> {
    let season_id =
        find_season_id(meta, season).ok_or_else(|| EmbedError::not_found("Season not available"))?;

    let episodes = collect_episodes(client, series_id, season_id).await?;

    let episode_id = find_episode_id(&episodes, season, episode)
        .ok_or_else(|| EmbedError::not_found("Episode not available"))?;

    info!(series_id, season, episode, episode_id, "Resolved episode");
    Ok(episode_id.to_string())
}
