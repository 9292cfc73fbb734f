use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use crate::models::{Query, StreamDescriptor};
use crate::services::{EmbedRegistry, MirrorSource, ProgressSink};

fn progress_printer() -> Arc<dyn ProgressSink> {
    Arc::new(|percent: u8| {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\rResolving... {percent:>3}%");
        if percent >= 100 {
            let _ = writeln!(stderr);
        }
    })
}

pub async fn cmd_resolve(
    registry: &EmbedRegistry,
    source: &MirrorSource,
    query: &Query,
    provider: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    println!("Resolving: {query}");

    let (embed_id, stream) = if let Some(id) = provider {
        let stream = registry.resolve(id, query, progress_printer()).await?;
        (id.to_string(), stream)
    } else {
        let output = source.scrape(query)?;
        registry
            .resolve_links(&output.embeds, progress_printer())
            .await?
    };

    if json {
        let rendered =
            serde_json::to_string_pretty(&stream).context("Failed to serialize stream")?;
        println!("{rendered}");
    } else {
        print_stream(&embed_id, &stream);
    }

    Ok(())
}

fn print_stream(embed_id: &str, stream: &StreamDescriptor) {
    println!();
    println!("✓ Resolved via {embed_id}");
    println!("  Type:     {}", stream.stream_type);
    println!("  Playlist: {}", stream.playlist);
    if !stream.captions.is_empty() {
        println!("  Captions: {}", stream.captions.len());
    }
}
