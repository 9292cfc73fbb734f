use anyhow::{Context, Result};
use tracing::{debug, info};
use url::Url;

use crate::clients::{MirrorClient, make_cookie_header};
use crate::constants::mirror::HD_COOKIE;
use crate::constants::stream::PREFERRED_LABELS;
use crate::models::StreamDescriptor;
use crate::models::mirror::PlaylistEntry;
use crate::services::embed_service::EmbedError;

fn non_empty_file(entry: &PlaylistEntry) -> Option<&str> {
    let file = entry.file.trim();
    (!file.is_empty()).then_some(file)
}

/// Picks the file to stream: the first non-empty file among entries labelled
/// "Auto", then "Full HD", then the first entry regardless of label.
#[must_use]
pub fn select_file(entries: &[PlaylistEntry]) -> Option<&str> {
    PREFERRED_LABELS
        .iter()
        .find_map(|label| {
            entries
                .iter()
                .find(|entry| entry.label == *label)
                .and_then(non_empty_file)
        })
        .or_else(|| entries.first().and_then(non_empty_file))
}

/// Wraps a playlist file behind the HLS proxy.
///
/// The proxy receives the absolute file URL on the provider site and the
/// headers it must forward (`referer`, `cookie`) as a JSON object.
pub fn build_manifest_url(proxy_url: &str, site_base_url: &str, file: &str) -> Result<String> {
    let target = if file.starts_with("http://") || file.starts_with("https://") {
        file.to_string()
    } else {
        format!(
            "{}/{}",
            site_base_url.trim_end_matches('/'),
            file.trim_start_matches('/')
        )
    };

    let headers = serde_json::json!({
        "referer": site_base_url,
        "cookie": make_cookie_header(&[HD_COOKIE]),
    });

    let mut url = Url::parse(proxy_url).context("Invalid proxy URL")?;
    url.query_pairs_mut()
        .append_pair("url", &target)
        .append_pair("headers", &headers.to_string());

    Ok(url.into())
}

/// Fetches the playlist for `id` and turns the selected file into a stream.
///
/// An empty playlist is reported as [`EmbedError::Failed`]: the item exists,
/// it just has nothing playable.
pub async fn resolve_stream(
    client: &MirrorClient<'_>,
    id: &str,
    proxy_url: &str,
) -> Result<StreamDescriptor, EmbedError> {
    let playlist = client.playlist(id).await?;

    let entries = playlist
        .first()
        .map(|item| item.sources.as_slice())
        .unwrap_or_default();

    debug!(id, sources = entries.len(), "Playlist fetched");

    let file =
        select_file(entries).ok_or_else(|| EmbedError::failed("Failed to fetch playlist"))?;

    let manifest = build_manifest_url(proxy_url, &client.provider().base_url, file)
        .map_err(|e| EmbedError::failed(format!("{e:#}")))?;

    info!(id, file, "Selected playlist source");
    Ok(StreamDescriptor::hls(manifest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(file: &str, label: &str) -> PlaylistEntry {
        PlaylistEntry {
            file: file.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_auto_wins_regardless_of_position() {
        let entries = vec![
            entry("/sd.m3u8", "SD"),
            entry("/fhd.m3u8", "Full HD"),
            entry("/auto.m3u8", "Auto"),
        ];
        assert_eq!(select_file(&entries), Some("/auto.m3u8"));
    }

    #[test]
    fn test_full_hd_without_auto() {
        let entries = vec![entry("/sd.m3u8", "SD"), entry("/fhd.m3u8", "Full HD")];
        assert_eq!(select_file(&entries), Some("/fhd.m3u8"));
    }

    #[test]
    fn test_first_entry_fallback() {
        let entries = vec![entry("/sd.m3u8", "SD")];
        assert_eq!(select_file(&entries), Some("/sd.m3u8"));
    }

    #[test]
    fn test_empty_auto_file_falls_through() {
        let entries = vec![entry("/sd.m3u8", "SD"), entry("", "Auto")];
        assert_eq!(select_file(&entries), Some("/sd.m3u8"));
    }

    #[test]
    fn test_nothing_selectable() {
        assert_eq!(select_file(&[]), None);
        assert_eq!(select_file(&[entry("", "SD")]), None);
    }

    #[test]
    fn test_build_manifest_url() {
        let url = build_manifest_url(
            "https://proxy.example/m3u8-proxy",
            "https://mirror.example",
            "/hls/123.m3u8?in=abc",
        )
        .unwrap();

        let parsed = Url::parse(&url).unwrap();
        let pairs: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();

        assert!(url.starts_with("https://proxy.example/m3u8-proxy?url="));
        assert_eq!(pairs["url"], "https://mirror.example/hls/123.m3u8?in=abc");

        let headers: serde_json::Value = serde_json::from_str(&pairs["headers"]).unwrap();
        assert_eq!(headers["referer"], "https://mirror.example");
        assert_eq!(headers["cookie"], "hd=on");
    }

    #[test]
    fn test_build_manifest_url_keeps_absolute_files() {
        let url = build_manifest_url(
            "https://proxy.example/m3u8-proxy",
            "https://mirror.example",
            "https://cdn.example/x.m3u8",
        )
        .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let target = parsed
            .query_pairs()
            .find(|(k, _)| k == "url")
            .map(|(_, v)| v.into_owned());
        assert_eq!(target.as_deref(), Some("https://cdn.example/x.m3u8"));
    }
}
