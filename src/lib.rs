pub mod cli;
mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod services;

use cli::{Cli, Commands};
use commands::{indexing_commands, search_commands};
use error::AppError;
use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let filter = if verbose { "sfzf=debug" } else { "sfzf=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command. The index is opened and closed inside the command.
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Index(args) => {
            let config = args.config(cli.db)?;
            indexing_commands::run_index(&config, args.json)?;
        }
        Commands::Search(args) => {
            let db_path = config::resolve_db_path(cli.db, std::env::var(config::DB_PATH_ENV).ok());
            search_commands::run_search(&db_path, &args)?;
        }
    }
    Ok(())
}
