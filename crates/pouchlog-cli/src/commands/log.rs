use pouchlog_core::Settings;

use super::open_tracker;

pub fn run(quantity: i64, source: &str, note: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let mut tracker = open_tracker(&settings)?;

    let entry = tracker.log(quantity, source, note, &settings.limit_config())?;
    let today = tracker.today_count()?;
    println!(
        "Logged {} {} ({} today)",
        entry.quantity,
        settings.unit_label(entry.quantity),
        today
    );
    Ok(())
}

pub fn run_undo() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let mut tracker = open_tracker(&settings)?;

    // the undo token lives in process memory, so a fresh CLI invocation has
    // nothing to undo
    if tracker.undo_last()? {
        println!("Removed last log ({} today)", tracker.today_count()?);
    } else {
        println!("Nothing to undo (no log in this session within the last 30 seconds)");
    }
    Ok(())
}
