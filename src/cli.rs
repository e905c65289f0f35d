//! CLI definitions for sqlctx.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// sqlctx CLI.
#[derive(Parser)]
#[command(name = "sqlctx")]
#[command(about = "Hybrid retrieval of SQL examples and schema context")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP server in foreground (default)
    Serve {
        /// Server host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one retrieval and print the result as JSON
    Search {
        /// Natural-language question
        query: String,

        /// Domain whose configuration applies (detected when omitted)
        #[arg(short, long)]
        domain: Option<String>,

        #[arg(long)]
        max_logics: Option<usize>,

        #[arg(long)]
        max_schemas: Option<usize>,

        #[arg(long)]
        logic_threshold: Option<f32>,

        #[arg(long)]
        schema_threshold: Option<f32>,
    },

    /// List configured domains
    Domains,

    /// Validate the configuration file and catalog
    CheckConfig,
}
