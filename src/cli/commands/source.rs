use crate::models::Query;
use crate::services::MirrorSource;

pub fn cmd_source(source: &MirrorSource, query: &Query) -> anyhow::Result<()> {
    if !source.is_enabled() {
        println!("Source '{}' is disabled.", source.id());
        return Ok(());
    }

    let output = source.scrape(query)?;

    println!("{} [{}] rank {}", source.name(), source.id(), source.rank());
    println!("{:-<50}", "");

    for link in &output.embeds {
        println!("{:<16} {}", link.embed_id, link.url);
    }

    Ok(())
}
