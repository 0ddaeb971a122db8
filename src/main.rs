use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use healthlog::commands::{self, Context};
use healthlog::config::DATA_DIR_ENV;
use healthlog::models::{Category, Metric};

#[derive(Parser)]
#[command(name = "healthlog")]
#[command(version, about = "Personal health metrics from lab panels and fitness reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the persisted health data
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from a file and add them to the store
    Ingest {
        /// labs (.csv, .xlsx), dexa (.pdf) or vo2max (.pdf)
        category: String,
        /// File to ingest
        file: PathBuf,
    },
    /// Show stored records
    Show {
        /// Limit output to one category
        category: Option<Category>,
    },
    /// Latest value and trend for every metric
    Summary,
    /// Percent change between the last two records of one metric
    Trend {
        /// Category holding the metric
        category: Category,
        /// Metric field name, e.g. ldl or restingHR
        field: Metric,
    },
    /// Write all stored data to a dated JSON file
    Export {
        /// Output directory (defaults to <data-dir>/exports)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    healthlog::init_tracing();
    let cli = Cli::parse();

    let result = Context::new(cli.data_dir, cli.json).and_then(|ctx| match cli.command {
        Commands::Ingest { category, file } => commands::import::ingest(&ctx, &category, &file),
        Commands::Show { category } => commands::report::show(&ctx, category),
        Commands::Summary => commands::report::summary(&ctx),
        Commands::Trend { category, field } => commands::report::trend(&ctx, category, field),
        Commands::Export { output } => commands::export::export(&ctx, output),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
