use clap::{Parser, Subcommand};

mod commands;
mod notifier;

#[derive(Parser)]
#[command(name = "pouchlog-cli", version, about = "Pouchlog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a pouch
    Log {
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        #[arg(long, default_value = "cli")]
        source: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Undo the most recent log of this session (30-second window)
    Undo,
    /// Aggregated statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// History grouped by day, most recent first
    History {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Export full history as CSV to stdout
    Export,
    /// Daily limit configuration
    Limit {
        #[command(subcommand)]
        action: commands::limit::LimitAction,
    },
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Widget shared-store synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Entry maintenance
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Log {
            quantity,
            source,
            note,
        } => commands::log::run(quantity, &source, note.as_deref()),
        Commands::Undo => commands::log::run_undo(),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::History { days } => commands::history::run(days),
        Commands::Export => commands::export::run(),
        Commands::Limit { action } => commands::limit::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Sync { action } => commands::sync::run(action),
        Commands::Entry { action } => commands::entry::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
