use tracing::{debug, info};

use crate::clients::MirrorClient;
use crate::config::StatusCheck;
use crate::models::Query;
use crate::models::mirror::{MediaMeta, SearchCandidate, SearchResponse, parse_year};
use crate::parser::compare_title;
use crate::services::embed_service::EmbedError;

/// The first search candidate that satisfied the match predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedItem {
    pub id: String,

    /// Metadata fetched while matching, reused for episode resolution.
    pub meta: Option<MediaMeta>,
}

/// Applies the provider's status check and extracts the result rows.
pub fn accepted_candidates(
    status_check: StatusCheck,
    response: SearchResponse,
) -> Result<Vec<SearchCandidate>, EmbedError> {
    let error_text = || {
        response
            .error
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "No search results found".to_string())
    };

    if !status_check.accepts(&response) {
        return Err(EmbedError::NotFound(error_text()));
    }

    let message = error_text();
    response
        .search_result
        .ok_or(EmbedError::NotFound(message))
}

/// Searches the mirror for `query.title` and returns the first candidate
/// whose title matches and whose year or type agrees with the query.
///
/// Candidates are evaluated strictly in response order, one metadata fetch
/// at a time. Metadata is only requested when the title already matches and
/// the candidate's own year does not settle the year check.
pub async fn find_match(
    client: &MirrorClient<'_>,
    query: &Query,
) -> Result<MatchedItem, EmbedError> {
    let response = client.search(&query.title).await?;
    let candidates = accepted_candidates(client.provider().status_check, response)?;

    debug!(
        provider = %client.provider().id,
        candidates = candidates.len(),
        "Search returned candidates"
    );

    for candidate in candidates {
        if !compare_title(&candidate.title, &query.title) {
            continue;
        }

        let mut meta = None;
        let year_matches = match candidate.year_label() {
            Some(label) => parse_year(label) == Some(query.release_year),
            None => {
                let fetched = client.meta(&candidate.id).await?;
                let matches = fetched.release_year() == Some(query.release_year);
                meta = Some(fetched);
                matches
            }
        };

        if year_matches {
            info!(id = %candidate.id, title = %candidate.title, "Matched by year");
            return Ok(MatchedItem {
                id: candidate.id,
                meta,
            });
        }

        let meta = match meta {
            Some(meta) => meta,
            None => client.meta(&candidate.id).await?,
        };

        if meta.is_media_type(query.media_type) {
            info!(id = %candidate.id, title = %candidate.title, "Matched by type");
            return Ok(MatchedItem {
                id: candidate.id,
                meta: Some(meta),
            });
        }

        debug!(id = %candidate.id, "Title matched but year and type did not");
    }

    Err(EmbedError::not_found("No watchable item found"))
}
