use clap::Subcommand;
use pouchlog_core::Settings;
use serde_json::json;

use super::open_tracker;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's count and limit status
    Today,
    /// All-time total
    All,
    /// Per-day counts, oldest first
    Series {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Mean daily count over a window
    Average {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let tracker = open_tracker(&settings)?;

    match action {
        StatsAction::Today => {
            let count = tracker.today_count()?;
            let limits = settings.limit_config();
            let out = json!({
                "count": count,
                "status": limits.status(count),
                "progress": limits.progress_fraction(count),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::All => {
            let out = json!({ "total": tracker.all_time_total()? });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Series { days } => {
            let series = tracker.daily_series(days)?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        StatsAction::Average { days } => {
            let out = json!({ "days": days, "average": tracker.average(days)? });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
