use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{Instrument, info, info_span, warn};

use crate::clients::{Fetcher, MirrorClient};
use crate::config::{Config, ProgressConfig, ProviderConfig};
use crate::models::{Query, StreamDescriptor};
use crate::services::embed_service::{BOUNDARY_MESSAGE, Embed, EmbedError};
use crate::services::progress::{ProgressGuard, ProgressSink, ResolutionState};
use crate::services::{episodes, playlist, search, session};

/// Resolution pipeline for one configured mirror provider.
pub struct MirrorEmbed {
    provider: ProviderConfig,
    bootstrap_url: String,
    proxy_url: String,
    progress: ProgressConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl MirrorEmbed {
    #[must_use]
    pub fn new(provider: ProviderConfig, config: &Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            provider,
            bootstrap_url: config.session.bootstrap_url.clone(),
            proxy_url: config.proxy.url.clone(),
            progress: config.progress.clone(),
            fetcher,
        }
    }

    #[must_use]
    pub const fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Runs the pipeline without progress or error normalization.
    ///
    /// Inner error kinds are preserved here; [`Embed::resolve`] is the
    /// boundary that collapses them.
    pub async fn scrape(&self, query: &Query) -> Result<StreamDescriptor, EmbedError> {
        query.validate()?;

        let token = session::fetch_session_token(self.fetcher.as_ref(), &self.bootstrap_url).await?;
        let client = MirrorClient::new(self.fetcher.as_ref(), &self.provider, &token);

        let matched = search::find_match(&client, query).await?;
        let mut id = matched.id;

        if let Some((season, episode)) = query.episode_target() {
            let meta = match matched.meta {
                Some(meta) => meta,
                None => client.meta(&id).await?,
            };
            id = episodes::resolve_episode(&client, &id, &meta, season, episode).await?;
        }

        playlist::resolve_stream(&client, &id, &self.proxy_url).await
    }

    /// Boundary adapter: drives progress for `work` and reports every
    /// failure outward as `NotFound`, logging the inner kind.
    async fn guarded<F>(
        &self,
        progress: Arc<dyn ProgressSink>,
        work: F,
    ) -> Result<StreamDescriptor, EmbedError>
    where
        F: Future<Output = Result<StreamDescriptor, EmbedError>> + Send,
    {
        let started = Instant::now();
        let guard = ProgressGuard::start(progress, &self.progress);

        let result = work.await;
        let elapsed = started.elapsed();

        let (outcome, state) = match &result {
            Ok(_) => ("success", ResolutionState::Completed),
            Err(_) => ("failure", ResolutionState::Failed),
        };
        guard.finish(state);

        let labels = [
            ("provider", self.provider.id.clone()),
            ("outcome", outcome.to_string()),
        ];
        metrics::counter!("mirrarr_resolutions_total", &labels).increment(1);
        metrics::histogram!("mirrarr_resolution_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        match result {
            Ok(stream) => {
                info!(
                    duration_ms = elapsed.as_millis(),
                    playlist = %stream.playlist,
                    "Resolution succeeded"
                );
                Ok(stream)
            }
            Err(err) => {
                warn!(
                    duration_ms = elapsed.as_millis(),
                    kind = err.kind(),
                    error = %err,
                    "Resolution failed"
                );
                Err(EmbedError::not_found(BOUNDARY_MESSAGE))
            }
        }
    }
}

#[async_trait]
impl Embed for MirrorEmbed {
    fn id(&self) -> &str {
        &self.provider.id
    }

    fn display_name(&self) -> String {
        self.provider.display_name()
    }

    fn rank(&self) -> i32 {
        self.provider.rank
    }

    fn is_enabled(&self) -> bool {
        self.provider.enabled
    }

    async fn resolve(
        &self,
        query: &Query,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<StreamDescriptor, EmbedError> {
        let span = info_span!("resolve", provider = %self.provider.id, query = %query);
        self.guarded(progress, self.scrape(query)).instrument(span).await
    }

    async fn resolve_link(
        &self,
        payload: &str,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<StreamDescriptor, EmbedError> {
        let span = info_span!("resolve_link", provider = %self.provider.id);
        let work = async {
            let query = Query::from_payload(payload)?;
            self.scrape(&query).await
        };
        self.guarded(progress, work).instrument(span).await
    }
}
