use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "listing-watch")]
#[command(about = "Harvests adoptable dogs and job postings and notifies you about new matches")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (extension optional)
    #[arg(short, long, global = true, default_value = "config/default")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one harvest cycle
    Run {
        /// Print notifications instead of sending them and leave the store untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// List listings already notified
    Notified {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show how an age or weight text is parsed
    Parse {
        /// Text as written on the listing, e.g. "2 years 6 months"
        text: String,

        /// Parse as a weight instead of an age
        #[arg(short, long)]
        weight: bool,
    },

    /// Validate configuration and create the identity store
    Init,

    /// Forget every notified listing
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
