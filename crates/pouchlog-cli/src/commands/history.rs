use chrono::{Duration, Utc};
use pouchlog_core::Settings;

use super::open_tracker;

pub fn run(days: u32) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let tracker = open_tracker(&settings)?;

    let cutoff = Utc::now() - Duration::days(i64::from(days));
    let groups = tracker.grouped_history(cutoff)?;
    println!("{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}
