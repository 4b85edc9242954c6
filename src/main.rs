// ===== demofit/src/main.rs =====
use clap::{Parser, Subcommand};
use demofit::loader;
use std::path::Path;
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dataset root: nation.json plus <STATE>/counties/<fips>.json files
    #[arg(global = true, short, long, default_value = "data")]
    data: String,

    /// Checkpoint path for the best result
    #[arg(global = true, short, long, default_value = "results/best.json")]
    out: String,

    /// Optional CSV score trace, appended on every improvement
    #[arg(global = true, long)]
    trace: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the descriptor search
    Search(cmd::search::SearchArgs),
    /// Re-score a saved checkpoint against the dataset
    Score(cmd::score::ScoreArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    info!("Loading dataset from {}", cli.data);
    let dataset = loader::load_dataset(Path::new(&cli.data)).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });
    info!(
        "Loaded {} counties across {} demographic categories",
        dataset.counties.len(),
        dataset.demographic_names.len()
    );

    let result = match cli.command {
        Commands::Search(args) => cmd::search::run(
            args,
            &dataset,
            Path::new(&cli.out),
            cli.trace.as_deref().map(Path::new),
        ),
        Commands::Score(args) => cmd::score::run(args, &dataset, Path::new(&cli.out)),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
