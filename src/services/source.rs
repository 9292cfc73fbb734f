use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, SourceConfig};
use crate::models::{Query, StreamFlag};
use crate::services::embed_service::EmbedError;

/// One embed the host should try, with the serialized query it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedLink {
    pub embed_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOutput {
    pub embeds: Vec<EmbedLink>,
}

/// Source entry that fans a query out to every enabled mirror embed.
#[derive(Debug, Clone)]
pub struct MirrorSource {
    config: SourceConfig,
    embed_ids: Vec<String>,
}

impl MirrorSource {
    #[must_use]
    pub fn new(config: SourceConfig, embed_ids: Vec<String>) -> Self {
        Self { config, embed_ids }
    }

    /// Links every enabled provider, highest rank first.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let embed_ids = config
            .enabled_providers()
            .into_iter()
            .map(|p| p.id.clone())
            .collect();
        Self::new(config.source.clone(), embed_ids)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.config.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub const fn rank(&self) -> i32 {
        self.config.rank
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    #[must_use]
    pub fn flags(&self) -> BTreeSet<StreamFlag> {
        BTreeSet::from([StreamFlag::CorsAllowed])
    }

    #[must_use]
    pub fn embed_ids(&self) -> &[String] {
        &self.embed_ids
    }

    /// Produces one link per embed, each carrying `query` as its payload.
    pub fn scrape(&self, query: &Query) -> Result<SourceOutput, EmbedError> {
        query.validate()?;
        let payload = query.to_payload()?;

        let embeds = self
            .embed_ids
            .iter()
            .map(|id| EmbedLink {
                embed_id: id.clone(),
                url: payload.clone(),
            })
            .collect::<Vec<_>>();

        debug!(source = %self.config.id, links = embeds.len(), "Source scraped");
        Ok(SourceOutput { embeds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_link_per_enabled_provider() {
        let mut config = Config::default();
        config.providers[1].enabled = false;

        let source = MirrorSource::from_config(&config);
        let output = source.scrape(&Query::movie("Heat", 1995)).unwrap();

        assert_eq!(output.embeds.len(), 1);
        assert_eq!(output.embeds[0].embed_id, "netmirror");
    }

    #[test]
    fn test_payload_round_trips() {
        let source = MirrorSource::from_config(&Config::default());
        let query = Query::show("The Office", 2005, 2, 3).with_tmdb_id("2316");

        let output = source.scrape(&query).unwrap();
        for link in &output.embeds {
            assert_eq!(Query::from_payload(&link.url).unwrap(), query);
        }
    }

    #[test]
    fn test_invalid_query_rejected() {
        let source = MirrorSource::from_config(&Config::default());
        let err = source.scrape(&Query::movie("  ", 1995)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_source_metadata() {
        let source = MirrorSource::from_config(&Config::default());
        assert_eq!(source.id(), "whvxMirrors");
        assert_eq!(source.rank(), 550);
        assert!(source.flags().contains(&StreamFlag::CorsAllowed));
        assert_eq!(source.embed_ids(), ["netmirror", "primemirror"]);
    }
}
