use clap::Subcommand;
use chrono::Utc;
use pouchlog_core::{Settings, SharedStore};

use super::open_tracker;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Fold queued widget logs into the event store
    Merge,
    /// Recompute today's count into the widget store
    Push,
    /// Queue a pending log the way the widget process does
    Queue {
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        #[arg(long, default_value = "widget")]
        source: String,
    },
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();

    match action {
        SyncAction::Merge => {
            let store = SharedStore::open_default()?;
            let mut tracker = open_tracker(&settings)?;
            let outcome = tracker.merge_pending(&store)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        SyncAction::Push => {
            let tracker = open_tracker(&settings)?;
            tracker.refresh_projection()?;
            SharedStore::open_default()?.sync_settings(&settings)?;
            println!("Projection refreshed");
        }
        SyncAction::Queue { quantity, source } => {
            let store = SharedStore::open_default()?;
            let epoch = Utc::now().timestamp() as f64;
            store.queue_pending(epoch, quantity, &source)?;
            println!("Queued {quantity} from {source}");
        }
    }
    Ok(())
}
