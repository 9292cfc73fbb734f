//! Embed contract and the error type shared by every resolution stage.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::models::{Query, QueryError, StreamDescriptor};
use crate::services::progress::ProgressSink;

/// Message carried by every error that leaves an embed.
pub const BOUNDARY_MESSAGE: &str = "Failed to search";

/// Resolution errors.
///
/// Stages use both kinds internally. At the embed boundary every error is
/// reported outward as [`EmbedError::NotFound`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// The item, or something needed to reach it (session token, search
    /// result, season, episode), could not be located.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The item was located but no playable manifest could be derived.
    #[error("Resolution failed: {0}")]
    Failed(String),
}

impl EmbedError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<anyhow::Error> for EmbedError {
    fn from(err: anyhow::Error) -> Self {
        Self::NotFound(format!("{err:#}"))
    }
}

impl From<QueryError> for EmbedError {
    fn from(err: QueryError) -> Self {
        Self::NotFound(err.to_string())
    }
}

/// A single provider's resolution pipeline.
///
/// # Examples
///
/// ```rust,ignore
/// use mirrarr::models::Query;
/// use mirrarr::services::{Embed, NoProgress};
/// use std::sync::Arc;
///
/// async fn example(embed: Arc<dyn Embed>) {
///     let query = Query::movie("Heat", 1995);
///     let stream = embed.resolve(&query, Arc::new(NoProgress)).await;
/// }
/// ```
#[async_trait::async_trait]
pub trait Embed: Send + Sync {
    fn id(&self) -> &str;

    fn display_name(&self) -> String;

    /// Higher ranks are tried first.
    fn rank(&self) -> i32;

    fn is_enabled(&self) -> bool;

    /// Resolves a query to a stream, reporting progress to `progress`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::NotFound`] on any failure.
    async fn resolve(
        &self,
        query: &Query,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<StreamDescriptor, EmbedError>;

    /// Resolves an embed link payload (a serialized [`Query`]).
    async fn resolve_link(
        &self,
        payload: &str,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<StreamDescriptor, EmbedError> {
        let query = Query::from_payload(payload).map_err(|err| {
            warn!(embed = %self.id(), error = %err, "Rejected embed payload");
            EmbedError::not_found(BOUNDARY_MESSAGE)
        })?;
        self.resolve(&query, progress).await
    }
}
