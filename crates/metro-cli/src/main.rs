//! metro-sim - procedural subway soundscape player.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metro-sim")]
#[command(author, version, about = "Procedural metro soundscape simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ride the line in real time until the budget runs out or Ctrl+C
    Run(commands::run::RunArgs),

    /// Play every sound event once, station to station
    Demo(commands::demo::DemoArgs),

    /// Print the event schedule for a seed without playing it
    Plan(commands::plan::PlanArgs),

    /// List audio output devices
    Devices,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `plan` output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Demo(args) => commands::demo::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Devices => commands::devices::run(),
    }
}
