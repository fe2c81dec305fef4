use clap::Subcommand;
use pouchlog_core::{sync_daily_summary, Settings, SharedStore};

use crate::notifier::ConsoleNotifier;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print current settings
    Show,
    /// Mark onboarding as completed
    Onboarded,
    /// Set the unit labels shown in output and the widget
    Units { singular: String, plural: String },
    /// Set the nicotine strength per unit in mg
    Strength { mg: u32 },
    /// Recurring daily summary notification
    Summary {
        #[command(subcommand)]
        action: SummaryAction,
    },
}

#[derive(Subcommand)]
pub enum SummaryAction {
    /// Enable the summary at the given local time
    On {
        #[arg(long, default_value_t = 20)]
        hour: u32,
        #[arg(long, default_value_t = 0)]
        minute: u32,
    },
    /// Disable the summary
    Off,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load_or_default();

    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Onboarded => {
            settings.has_completed_onboarding = true;
            settings.save()?;
            println!("Onboarding marked complete");
        }
        ConfigAction::Units { singular, plural } => {
            settings.units.singular = singular;
            settings.units.plural = plural;
            settings.save()?;
            SharedStore::open_default()?.sync_settings(&settings)?;
            println!("Unit labels updated");
        }
        ConfigAction::Strength { mg } => {
            settings.strength_mg = Some(mg);
            settings.save()?;
            println!("Strength set to {mg} mg");
        }
        ConfigAction::Summary { action } => {
            match action {
                SummaryAction::On { hour, minute } => {
                    if hour > 23 || minute > 59 {
                        return Err(format!("invalid time {hour:02}:{minute:02}").into());
                    }
                    settings.notifications.enabled = true;
                    settings.notifications.daily_summary_enabled = true;
                    settings.notifications.daily_summary_hour = hour;
                    settings.notifications.daily_summary_minute = minute;
                }
                SummaryAction::Off => {
                    settings.notifications.daily_summary_enabled = false;
                    println!("Daily summary disabled");
                }
            }
            settings.save()?;
            let notifier = ConsoleNotifier::new(settings.notifications.clone());
            sync_daily_summary(&notifier, &settings.notifications);
        }
    }
    Ok(())
}
