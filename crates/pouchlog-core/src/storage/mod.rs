mod settings;
pub mod database;

pub use database::Database;
pub use settings::{NotificationSettings, Settings, UnitLabels};

use std::path::PathBuf;

/// Returns `~/.config/pouchlog[-dev]/` based on POUCHLOG_ENV.
///
/// Set POUCHLOG_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POUCHLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pouchlog-dev")
    } else {
        base_dir.join("pouchlog")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
