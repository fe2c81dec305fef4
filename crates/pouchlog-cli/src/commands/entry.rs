use chrono::{DateTime, Utc};
use clap::Subcommand;
use pouchlog_core::Settings;
use uuid::Uuid;

use super::open_tracker;

#[derive(Subcommand)]
pub enum EntryAction {
    /// List every entry, newest first
    List,
    /// Delete an entry by id
    Delete { id: Uuid },
    /// Move an entry to a new timestamp (RFC 3339)
    Retime { id: Uuid, timestamp: DateTime<Utc> },
}

pub fn run(action: EntryAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let mut tracker = open_tracker(&settings)?;

    match action {
        EntryAction::List => {
            let entries = tracker.all_entries()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        EntryAction::Delete { id } => {
            if tracker.delete_entry(&id)? {
                println!("Deleted {id}");
            } else {
                println!("No entry with id {id}");
            }
        }
        EntryAction::Retime { id, timestamp } => {
            if tracker.retime_entry(&id, timestamp)? {
                println!("Moved {id} to {timestamp}");
            } else {
                println!("No entry with id {id}");
            }
        }
    }
    Ok(())
}
