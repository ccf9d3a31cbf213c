//! Trellis CLI entry point

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trellis_core::Point;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Hierarchical graph reconciliation and edge routing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file (router and layout settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one graph snapshot against another and print the partitions
    Diff {
        /// Previously rendered snapshot (JSON)
        previous: PathBuf,
        /// Incoming snapshot (JSON)
        current: PathBuf,
    },
    /// Run one render pass per snapshot, in order, and print every pass
    Render {
        /// Snapshots (JSON), rendered sequentially
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,

        /// Layout applied before each pass
        #[arg(short, long, value_enum, default_value = "stack")]
        layout: LayoutKind,
    },
    /// Route between two points, optionally around the nodes of a graph
    Route {
        /// Start point as `x,y`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Point,

        /// Goal point as `x,y`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,

        /// Graph snapshot (JSON) whose node rects are obstacles
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
    /// Simplify a polyline read from a JSON array of points
    Simplify {
        /// File containing `[{"x": .., "y": ..}, ...]`
        points: PathBuf,

        /// Tolerance in canvas units (defaults to the configured value)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },
    /// Show version
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LayoutKind {
    /// Row packing with containers grown around their children
    Stack,
    /// Keep the geometry stored in the snapshot
    Passthrough,
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{raw}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate `{v}`: {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("trellis={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Diff { previous, current } => commands::diff(&previous, &current),
        Commands::Render { snapshots, layout } => {
            commands::render(&snapshots, layout, config).await
        }
        Commands::Route { from, to, graph } => {
            commands::route(from, to, graph.as_deref(), &config)
        }
        Commands::Simplify { points, tolerance } => {
            commands::simplify(&points, tolerance.unwrap_or(config.router.tolerance))
        }
        Commands::Version => {
            println!("Trellis v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
