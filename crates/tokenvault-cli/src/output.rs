//! Plain and JSON output formatting for CLI commands.

use serde::Serialize;

use tokenvault_core::error::AppError;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable key/value lines
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Print a serializable item as pretty JSON
pub fn print_json<T: Serialize>(item: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(item)?;
    println!("{}", json);
    Ok(())
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<20} {}", format!("{}:", key), value);
}
