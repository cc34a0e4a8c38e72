use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cykel-engine", version, about = "Cycle prediction and phase lookup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the next period and fertile window
    Predict(commands::EngineArgs),
    /// Show the current cycle phase
    Phase(commands::EngineArgs),
    /// Summary statistics over the whole history
    Stats(commands::HistoryArgs),
}

fn main() {
    // Warnings by default; RUST_LOG overrides.
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Predict(args) => commands::predict(args),
        Commands::Phase(args) => commands::phase(args),
        Commands::Stats(args) => commands::stats(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
