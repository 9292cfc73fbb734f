use std::fmt;

use tracing::debug;

use crate::clients::{FetchRequest, Fetcher};
use crate::services::embed_service::EmbedError;

/// Opaque per-resolution credential required by the mirror.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token. Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// Fetches and percent-decodes a fresh session token from `bootstrap_url`.
pub async fn fetch_session_token(
    fetcher: &dyn Fetcher,
    bootstrap_url: &str,
) -> Result<SessionToken, EmbedError> {
    let raw = fetcher
        .fetch(FetchRequest::new(bootstrap_url))
        .await
        .map_err(|e| EmbedError::not_found(format!("Session bootstrap failed: {e:#}")))?;

    let decoded = urlencoding::decode(raw.trim())
        .map_err(|_| EmbedError::not_found("Session token is not valid UTF-8"))?;

    let token =
        SessionToken::new(decoded.trim()).ok_or_else(|| EmbedError::not_found("No hash found"))?;
    debug!(token = ?token, "Session token acquired");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_rejected() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("  \n").is_none());
        assert_eq!(SessionToken::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_debug_hides_value() {
        let token = SessionToken::new("secret-hash").unwrap();
        let shown = format!("{token:?}");
        assert!(!shown.contains("secret"));
        assert_eq!(shown, "SessionToken(<11 chars>)");
    }
}
