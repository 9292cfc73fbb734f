//! CLI module - Command-line interface for Mirrarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::{MediaType, Query};

/// Mirrarr - Mirror stream resolver
/// Resolves movies and episodes to playable HLS manifests
#[derive(Parser)]
#[command(name = "mirrarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to the usual search locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a title to a stream
    #[command(alias = "r")]
    Resolve {
        #[command(flatten)]
        query: QueryArgs,

        /// Only try this provider
        #[arg(long, short)]
        provider: Option<String>,

        /// Print the stream as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured providers in rank order
    #[command(alias = "ls")]
    Providers,

    /// Print the embed links the source emits for a title
    Source {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Title to look up
    #[arg(required = true)]
    pub title: Vec<String>,

    /// Release year
    #[arg(long, short)]
    pub year: i32,

    /// Treat the title as a show (implied by --season/--episode)
    #[arg(long)]
    pub show: bool,

    #[arg(long, short)]
    pub season: Option<u32>,

    #[arg(long, short)]
    pub episode: Option<u32>,

    #[arg(long = "tmdb")]
    pub tmdb_id: Option<String>,

    #[arg(long = "imdb")]
    pub imdb_id: Option<String>,
}

impl QueryArgs {
    /// Builds and validates the query described by the arguments.
    pub fn into_query(self) -> anyhow::Result<Query> {
        let media_type = if self.show || self.season.is_some() || self.episode.is_some() {
            MediaType::Show
        } else {
            MediaType::Movie
        };

        let query = Query {
            title: self.title.join(" "),
            release_year: self.year,
            media_type,
            season: self.season,
            episode: self.episode,
            tmdb_id: self.tmdb_id,
            imdb_id: self.imdb_id,
        };
        query.validate()?;
        Ok(query)
    }
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_resolve_movie() {
        let cli = parse(&["mirrarr", "resolve", "Heat", "--year", "1995", "--json"]);
        let Some(Commands::Resolve { query, json, .. }) = cli.command else {
            panic!("expected resolve");
        };
        assert!(json);
        assert_eq!(query.into_query().unwrap(), Query::movie("Heat", 1995));
    }

    #[test]
    fn test_resolve_show_from_episode_flags() {
        let cli = parse(&[
            "mirrarr", "resolve", "The", "Office", "-y", "2005", "-s", "2", "-e", "3",
        ]);
        let Some(Commands::Resolve { query, .. }) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(
            query.into_query().unwrap(),
            Query::show("The Office", 2005, 2, 3)
        );
    }

    #[test]
    fn test_show_without_episode_rejected() {
        let cli = parse(&["mirrarr", "source", "Dark", "--year", "2017", "--show"]);
        let Some(Commands::Source { query }) = cli.command else {
            panic!("expected source");
        };
        assert!(query.into_query().is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = parse(&["mirrarr", "providers", "--config", "/tmp/m.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
        assert!(matches!(cli.command, Some(Commands::Providers)));
    }
}
