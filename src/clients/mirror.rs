use anyhow::Result;
use tracing::debug;

use super::cookie::make_cookie_header;
use super::fetcher::{FetchRequest, Fetcher, fetch_json};
use crate::config::ProviderConfig;
use crate::constants::mirror::{
    EPISODES_PATH, HASH_COOKIE, HD_COOKIE, META_PATH, PLAYLIST_PATH, SEARCH_PATH,
};
use crate::models::mirror::{EpisodePage, MediaMeta, PlaylistItem, SearchResponse};
use crate::services::session::SessionToken;

/// Mirror endpoints for one provider, bound to one session token.
pub struct MirrorClient<'a> {
    fetcher: &'a dyn Fetcher,
    provider: &'a ProviderConfig,
    cookie: String,
}

impl<'a> MirrorClient<'a> {
    #[must_use]
    pub fn new(
        fetcher: &'a dyn Fetcher,
        provider: &'a ProviderConfig,
        token: &SessionToken,
    ) -> Self {
        Self {
            fetcher,
            provider,
            cookie: make_cookie_header(&[(HASH_COOKIE, token.as_str()), HD_COOKIE]),
        }
    }

    #[must_use]
    pub const fn provider(&self) -> &ProviderConfig {
        self.provider
    }

    fn request(&self, path: &str) -> FetchRequest {
        FetchRequest::new(path)
            .base_url(&self.provider.api_base_url)
            .header("cookie", &self.cookie)
    }

    pub async fn search(&self, title: &str) -> Result<SearchResponse> {
        debug!(provider = %self.provider.id, title, "Searching mirror");
        fetch_json(self.fetcher, self.request(SEARCH_PATH).query("s", title)).await
    }

    pub async fn meta(&self, id: &str) -> Result<MediaMeta> {
        debug!(provider = %self.provider.id, id, "Fetching metadata");
        fetch_json(self.fetcher, self.request(META_PATH).query("id", id)).await
    }

    /// Fetches one page of a season's episode listing. `None` requests the
    /// unpaged first listing.
    pub async fn episodes(
        &self,
        season_id: &str,
        series_id: &str,
        page: Option<u32>,
    ) -> Result<EpisodePage> {
        let mut request = self
            .request(EPISODES_PATH)
            .query("s", season_id)
            .query("series", series_id);

        if let Some(page) = page {
            request = request.query("page", page.to_string());
        }

        debug!(provider = %self.provider.id, season_id, ?page, "Fetching episodes");
        fetch_json(self.fetcher, request).await
    }

    pub async fn playlist(&self, id: &str) -> Result<Vec<PlaylistItem>> {
        debug!(provider = %self.provider.id, id, "Fetching playlist");
        fetch_json(self.fetcher, self.request(PLAYLIST_PATH).query("id", id)).await
    }
}
