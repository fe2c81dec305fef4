use clap::Subcommand;
use pouchlog_core::{Settings, SharedStore};
use serde_json::json;

use super::open_tracker;

#[derive(Subcommand)]
pub enum LimitAction {
    /// Set the daily limit (and optionally the approach threshold)
    Set {
        limit: i64,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Enable limit tracking
    Enable,
    /// Disable limit tracking
    Disable,
    /// Current count classified against the limit
    Status,
}

pub fn run(action: LimitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load_or_default();

    match action {
        LimitAction::Set { limit, threshold } => {
            settings.limit.daily_limit = limit;
            if let Some(threshold) = threshold {
                settings.limit.approach_threshold = threshold.clamp(0.0, 1.0);
            }
            save_and_sync(&settings)?;
            println!("Daily limit set to {limit}");
        }
        LimitAction::Enable => {
            settings.limit.enabled = true;
            save_and_sync(&settings)?;
            println!("Daily limit enabled");
        }
        LimitAction::Disable => {
            settings.limit.enabled = false;
            save_and_sync(&settings)?;
            println!("Daily limit disabled");
        }
        LimitAction::Status => {
            let tracker = open_tracker(&settings)?;
            let count = tracker.today_count()?;
            let limits = settings.limit_config();
            let out = json!({
                "count": count,
                "limit": limits.limit,
                "enabled": limits.enabled,
                "threshold": limits.approach_threshold,
                "status": limits.status(count),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

/// Limit changes must reach the widget store as well as the TOML file.
fn save_and_sync(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    settings.save()?;
    SharedStore::open_default()?.sync_settings(settings)?;
    Ok(())
}
