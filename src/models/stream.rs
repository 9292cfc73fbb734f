use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::constants::stream::PRIMARY_STREAM_ID;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamFlag {
    /// The manifest can be fetched cross-origin.
    CorsAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Hls,
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hls => write!(f, "hls"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub language: String,
    pub url: String,
    pub format: String,
}

/// Normalized result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    pub id: String,

    /// Absolute manifest URL, routed through the streaming proxy.
    pub playlist: String,

    #[serde(rename = "type")]
    pub stream_type: StreamType,

    pub flags: BTreeSet<StreamFlag>,

    pub captions: Vec<Caption>,
}

impl StreamDescriptor {
    /// Primary HLS stream with CORS allowed and no captions.
    pub fn hls(playlist: impl Into<String>) -> Self {
        Self {
            id: PRIMARY_STREAM_ID.to_string(),
            playlist: playlist.into(),
            stream_type: StreamType::Hls,
            flags: BTreeSet::from([StreamFlag::CorsAllowed]),
            captions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hls_descriptor_serialization() {
        let stream = StreamDescriptor::hls("https://proxy.example/m3u8-proxy?url=x");
        let json = serde_json::to_value(&stream).unwrap();

        assert_eq!(json["id"], "primary");
        assert_eq!(json["type"], "hls");
        assert_eq!(json["flags"], serde_json::json!(["cors-allowed"]));
        assert_eq!(json["captions"], serde_json::json!([]));
    }
}
