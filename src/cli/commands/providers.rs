//! List providers command handler

use crate::services::EmbedRegistry;

pub fn cmd_providers(registry: &EmbedRegistry) {
    if registry.embeds().is_empty() {
        println!("No providers configured.");
        return;
    }

    println!("Providers ({} total)", registry.embeds().len());
    println!("{:-<50}", "");

    for embed in registry.embeds() {
        let status = if embed.is_enabled() { "✓" } else { "✗" };
        println!(
            "{} {:<16} rank {:>4}  {}",
            status,
            embed.id(),
            embed.rank(),
            embed.display_name()
        );
    }
}
