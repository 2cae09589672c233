use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kinsearch")]
#[command(author, version, about = "Historical person lookup against archival search backends")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered providers
    Providers,

    /// Search for people by name
    Search {
        /// Free-text name query
        #[arg(required = true)]
        query: String,

        /// Provider id, or "auto" for the best available remote provider
        #[arg(short, long)]
        provider: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search with structured constraints
    Refine {
        /// Name to search for
        #[arg(long, required = true)]
        name: String,

        /// Required birth year
        #[arg(long)]
        born: Option<i32>,

        /// Required death year
        #[arg(long)]
        died: Option<i32>,

        /// Required place (substring, case-insensitive)
        #[arg(long)]
        place: Option<String>,

        /// Provider id, or "auto"
        #[arg(short, long)]
        provider: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search, then fetch supplementary metadata for every candidate
    Enrich {
        /// Free-text name query
        #[arg(required = true)]
        query: String,

        /// Provider id, or "auto"
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
