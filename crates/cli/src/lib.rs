pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "demandlens",
    about = "Demandlens forecast insight CLI",
    long_about = "Run the forecast insight pipeline over a saved prediction feed, inspect per-store averages, and review effective configuration.",
    after_help = "Examples:\n  demandlens insights --input feed.json --store \"Store 1\"\n  demandlens averages --input feed.json --store \"Store 1\"\n  demandlens config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Generate ordered business insights from a prediction feed file")]
    Insights {
        #[arg(long, help = "Path to a prediction feed JSON file")]
        input: PathBuf,
        #[arg(long, help = "Store to scope aggregation and recommendations to")]
        store: Option<String>,
        #[arg(long, help = "Item to generate recommendations for")]
        item: Option<String>,
        #[arg(long, help = "Seed for the synthetic history perturbation (deterministic output)")]
        seed: Option<u64>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Compute per-item average daily demand for one store")]
    Averages {
        #[arg(long, help = "Path to a prediction feed JSON file")]
        input: PathBuf,
        #[arg(long, help = "Store to aggregate")]
        store: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Insights { input, store, item, seed, json } => {
            commands::insights::run(&input, store, item, seed, json)
        }
        Command::Averages { input, store } => commands::averages::run(&input, &store),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
