use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sports_planner::{commands, config, web};

/// Sports slot planner: place games on grounds and catch double-booked players.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log placement and validation details
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report overlapping slots and double-booked players
    ///
    /// Examples:
    ///   check                       report on schedule.toml
    ///   check -c week.toml --strict  fail when anything clashes
    Check {
        /// Path to schedule file
        #[arg(short = 'c', long, default_value = "schedule.toml")]
        config: PathBuf,

        /// Exit with an error when any clash or conflict is found
        #[arg(long)]
        strict: bool,
    },

    /// List scheduled slots per day and ground
    Slots {
        /// Path to schedule file
        #[arg(short = 'c', long, default_value = "schedule.toml")]
        config: PathBuf,

        /// Only show this day
        #[arg(short = 'd', long)]
        day: Option<u8>,
    },

    /// Show where a new slot would go on a ground (first free gap)
    Place {
        /// Path to schedule file
        #[arg(short = 'c', long, default_value = "schedule.toml")]
        config: PathBuf,

        /// Day number, starting at 1
        #[arg(short = 'd', long)]
        day: u8,

        /// Ground number, starting at 1
        #[arg(short = 'g', long)]
        ground: u32,

        /// Slot length in minutes (defaults to the timeline's default duration)
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Start the planning dashboard and JSON API
    Serve {
        /// Path to schedule file
        #[arg(short = 'c', long, default_value = "schedule.toml")]
        config: PathBuf,

        /// Listen address (e.g. "0.0.0.0:3000")
        #[arg(short = 'a', long, default_value = "127.0.0.1:3010")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Check { config, strict } => commands::run_check(config, *strict)?,
        Command::Slots { config, day } => commands::run_slots(config, *day)?,
        Command::Place {
            config,
            day,
            ground,
            duration,
        } => commands::run_place(config, *day, *ground, *duration)?,
        Command::Serve { config, addr } => {
            let cfg = config::load_config(config)?;
            web::serve(cfg, addr).await?;
        }
    }

    Ok(())
}
