use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::Fetcher;
use crate::config::Config;
use crate::models::{Query, StreamDescriptor};
use crate::services::embed_service::{Embed, EmbedError};
use crate::services::embed_service_impl::MirrorEmbed;
use crate::services::progress::ProgressSink;
use crate::services::source::EmbedLink;

/// Embeds known to the host, ordered by rank (highest first).
#[derive(Clone, Default)]
pub struct EmbedRegistry {
    embeds: Vec<Arc<dyn Embed>>,
}

impl EmbedRegistry {
    #[must_use]
    pub fn new(mut embeds: Vec<Arc<dyn Embed>>) -> Self {
        embeds.sort_by(|a, b| b.rank().cmp(&a.rank()));
        Self { embeds }
    }

    /// One [`MirrorEmbed`] per configured provider.
    #[must_use]
    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetcher>) -> Self {
        let embeds = config
            .providers
            .iter()
            .map(|provider| {
                Arc::new(MirrorEmbed::new(
                    provider.clone(),
                    config,
                    Arc::clone(&fetcher),
                )) as Arc<dyn Embed>
            })
            .collect();
        Self::new(embeds)
    }

    #[must_use]
    pub fn embeds(&self) -> &[Arc<dyn Embed>] {
        &self.embeds
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Arc<dyn Embed>> {
        self.embeds.iter().filter(|embed| embed.is_enabled())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Embed>> {
        self.embeds.iter().find(|embed| embed.id() == id)
    }

    /// Resolves `query` against one embed by id.
    pub async fn resolve(
        &self,
        id: &str,
        query: &Query,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<StreamDescriptor, EmbedError> {
        let embed = self
            .get(id)
            .ok_or_else(|| EmbedError::not_found(format!("Unknown embed '{id}'")))?;
        embed.resolve(query, progress).await
    }

    /// Tries each link in order and returns the first stream that resolves.
    ///
    /// Links naming an unknown or disabled embed are skipped.
    pub async fn resolve_links(
        &self,
        links: &[EmbedLink],
        progress: Arc<dyn ProgressSink>,
    ) -> Result<(String, StreamDescriptor), EmbedError> {
        for link in links {
            let Some(embed) = self.get(&link.embed_id).filter(|e| e.is_enabled()) else {
                warn!(embed = %link.embed_id, "Skipping link for unavailable embed");
                continue;
            };

            match embed.resolve_link(&link.url, Arc::clone(&progress)).await {
                Ok(stream) => return Ok((link.embed_id.clone(), stream)),
                Err(err) => debug!(embed = %link.embed_id, error = %err, "Embed link failed"),
            }
        }

        Err(EmbedError::not_found("No embed produced a stream"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NoProgress;
    use async_trait::async_trait;

    struct FixedEmbed {
        id: &'static str,
        rank: i32,
        enabled: bool,
        playlist: Option<&'static str>,
    }

    #[async_trait]
    impl Embed for FixedEmbed {
        fn id(&self) -> &str {
            self.id
        }

        fn display_name(&self) -> String {
            self.id.to_string()
        }

        fn rank(&self) -> i32 {
            self.rank
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn resolve(
            &self,
            _query: &Query,
            _progress: Arc<dyn ProgressSink>,
        ) -> Result<StreamDescriptor, EmbedError> {
            self.playlist
                .map(StreamDescriptor::hls)
                .ok_or_else(|| EmbedError::not_found("nothing"))
        }
    }

    fn embed(
        id: &'static str,
        rank: i32,
        enabled: bool,
        playlist: Option<&'static str>,
    ) -> Arc<dyn Embed> {
        Arc::new(FixedEmbed {
            id,
            rank,
            enabled,
            playlist,
        })
    }

    fn link(embed_id: &str) -> EmbedLink {
        EmbedLink {
            embed_id: embed_id.to_string(),
            url: Query::movie("Heat", 1995).to_payload().unwrap(),
        }
    }

    #[test]
    fn test_sorted_by_rank() {
        let registry = EmbedRegistry::new(vec![
            embed("low", 1, true, None),
            embed("high", 10, true, None),
        ]);
        let ids: Vec<_> = registry.embeds().iter().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["high", "low"]);
    }

    #[test]
    fn test_from_config_registers_every_provider() {
        let config = Config::default();
        let fetcher: Arc<dyn Fetcher> =
            Arc::new(crate::clients::ReqwestFetcher::new(&config.http));
        let registry = EmbedRegistry::from_config(&config, fetcher);
        assert_eq!(registry.embeds().len(), config.providers.len());
        assert_eq!(registry.embeds()[0].id(), "netmirror");
    }

    #[tokio::test]
    async fn test_resolve_links_first_success_wins() {
        let registry = EmbedRegistry::new(vec![
            embed("broken", 10, true, None),
            embed("off", 9, false, Some("off.m3u8")),
            embed("good", 1, true, Some("good.m3u8")),
        ]);
        let links = vec![link("missing"), link("broken"), link("off"), link("good")];

        let (id, stream) = registry
            .resolve_links(&links, Arc::new(NoProgress))
            .await
            .unwrap();
        assert_eq!(id, "good");
        assert_eq!(stream.playlist, "good.m3u8");
    }

    #[tokio::test]
    async fn test_resolve_links_exhausted() {
        let registry = EmbedRegistry::new(vec![embed("broken", 10, true, None)]);
        let err = registry
            .resolve_links(&[link("broken")], Arc::new(NoProgress))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
