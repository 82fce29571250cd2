//! Configuration check commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use tokenvault_core::config::AppConfig;
use tokenvault_core::error::AppError;
use tokenvault_database::DatabasePool;
use tokenvault_database::connection::mask_password;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Validate signing secrets and, optionally, database connectivity
    Check {
        /// Also connect to the database
        #[arg(long)]
        database: bool,
    },
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Check { database } => {
            let tokenizer = super::build_tokenizer(config)?;

            if *database {
                let pool = DatabasePool::connect(&config.database).await?;
                pool.health_check().await?;
            }

            match format {
                OutputFormat::Json => output::print_json(&serde_json::json!({
                    "valid": true,
                    "tokenizer": format!("{tokenizer:?}"),
                    "database": mask_password(&config.database.url),
                    "database_checked": database,
                }))?,
                OutputFormat::Text => {
                    output::print_success("Configuration is valid");
                    output::print_kv("Tokenizer", &format!("{tokenizer:?}"));
                    output::print_kv("Database", &mask_password(&config.database.url));
                    if *database {
                        output::print_kv("Database schema", "ready");
                    }
                }
            }
        }
    }

    Ok(())
}
