//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use tokenvault_core::config::AppConfig;
use tokenvault_core::error::AppError;
use tokenvault_database::DatabasePool;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            let version = tokenvault_database::migration::run_migrations(pool.pool()).await?;
            output::print_success(&format!("Schema is at version {version}."));
        }
    }

    Ok(())
}
