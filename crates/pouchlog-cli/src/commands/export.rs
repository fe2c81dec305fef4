use pouchlog_core::Settings;

use super::open_tracker;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let tracker = open_tracker(&settings)?;
    print!("{}", tracker.export_csv()?);
    Ok(())
}
