mod plan;
mod search;

use clap::{Args, Parser, Subcommand};
use placegrid_core::ViewportBounds;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placegrid")]
#[command(about = "Viewport place search over a grid of nearby searches")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search a viewport and print the ranked places
    Search {
        #[command(flatten)]
        bounds: BoundsArgs,
        /// Place type to include (repeatable, e.g. --type cafe --type bar)
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,
        /// Drop places rated below this value
        #[arg(long)]
        min_rating: Option<f64>,
        /// Maximum number of places to print
        #[arg(long, default_value = "30")]
        limit: usize,
        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show how a viewport would be divided into grid cells
    Plan {
        #[command(flatten)]
        bounds: BoundsArgs,
        /// Preferred cell edge in degrees
        #[arg(long, default_value = "0.005")]
        cell_size: f64,
        /// Soft ceiling on the number of cells
        #[arg(long, default_value = "25")]
        max_cells: usize,
    },
}

#[derive(Debug, Clone, Copy, Args)]
struct BoundsArgs {
    #[arg(long, allow_hyphen_values = true)]
    north: f64,
    #[arg(long, allow_hyphen_values = true)]
    south: f64,
    #[arg(long, allow_hyphen_values = true)]
    east: f64,
    #[arg(long, allow_hyphen_values = true)]
    west: f64,
}

impl From<BoundsArgs> for ViewportBounds {
    fn from(args: BoundsArgs) -> Self {
        ViewportBounds::new(args.north, args.south, args.east, args.west)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            bounds,
            types,
            min_rating,
            limit,
            json,
        } => {
            let config = placegrid_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            search::run_search(&config, bounds.into(), types, min_rating, limit, json).await
        }
        Commands::Plan {
            bounds,
            cell_size,
            max_cells,
        } => {
            init_tracing("info")?;
            plan::run_plan(&bounds.into(), cell_size, max_cells)
        }
    }
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
