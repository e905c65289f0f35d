//! sqlctx - hybrid retrieval of SQL examples and schema context.
//!
//! Main entry point for the sqlctx CLI and server.

mod cli;
mod commands;
mod server;

use clap::Parser;

use sqlctx_config::ConfigLoader;
use sqlctx_core::RetrievalRequest;

use crate::cli::{Cli, Commands};
use crate::commands::{cmd_check_config, cmd_domains, cmd_search};
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Validation reports on the raw file and needs no logging.
    if let Some(Commands::CheckConfig) = cli.command {
        return cmd_check_config(&cli.config);
    }

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;

    match cli.command {
        None => run_server(config, &cli.config, None, None).await,
        Some(Commands::Serve { host, port }) => run_server(config, &cli.config, host, port).await,
        Some(Commands::Search {
            query,
            domain,
            max_logics,
            max_schemas,
            logic_threshold,
            schema_threshold,
        }) => {
            let request = RetrievalRequest {
                query,
                domain,
                max_logics,
                max_schemas,
                logic_threshold,
                schema_threshold,
            };
            cmd_search(&config, request).await
        }
        Some(Commands::Domains) => cmd_domains(&config),
        Some(Commands::CheckConfig) => cmd_check_config(&cli.config),
    }
}
