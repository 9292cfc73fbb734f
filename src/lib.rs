pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod models;
pub mod parser;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use cli::{Cli, Commands};
use clients::{Fetcher, ReqwestFetcher};
pub use config::Config;
use config::{GeneralConfig, LogFormat};
use services::{EmbedRegistry, MirrorSource};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Loads the config from `path` when given, otherwise from the default
/// search locations.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `general.log_level`.
pub fn init_tracing(general: &GeneralConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match general.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

pub async fn run(args: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config.general);

    let Some(command) = args.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if !matches!(command, Commands::Init) {
        config.validate()?;
    }

    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(&config.http));
    let registry = EmbedRegistry::from_config(&config, fetcher);
    let source = MirrorSource::from_config(&config);

    debug!(
        providers = registry.embeds().len(),
        source = %source.id(),
        "Registry initialized"
    );

    match command {
        Commands::Resolve {
            query,
            provider,
            json,
        } => {
            let query = query.into_query()?;
            info!(query = %query, "Resolving");
            cli::cmd_resolve(&registry, &source, &query, provider.as_deref(), json).await
        }

        Commands::Providers => {
            cli::cmd_providers(&registry);
            Ok(())
        }

        Commands::Source { query } => cli::cmd_source(&source, &query.into_query()?),

        Commands::Init => cli::cmd_init(),
    }
}
