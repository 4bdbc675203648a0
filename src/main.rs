use anyhow::Result;
use clap::Parser;
use cytoseed_core::config::LayoutConfig;
use cytoseed_lib::report::CellReport;
use cytoseed_lib::{init_logging, AppConfig, CellFactory, Metrics, SimEnvironment};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Noise seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Layout to seed, overriding the kind in the config file
    #[arg(short, long, value_enum)]
    layout: Option<Layout>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Layout {
    Single,
    Grid2d,
    Grid3d,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(layout) = args.layout {
        config.layout = match (layout, &config.layout) {
            (Layout::Single, LayoutConfig::Single { .. })
            | (Layout::Grid2d, LayoutConfig::Grid2d(_))
            | (Layout::Grid3d, LayoutConfig::Grid3d(_)) => config.layout.clone(),
            (Layout::Single, _) => LayoutConfig::Single {
                position: Default::default(),
            },
            (Layout::Grid2d, _) => LayoutConfig::Grid2d(Default::default()),
            (Layout::Grid3d, _) => LayoutConfig::Grid3d(Default::default()),
        };
    }

    let mut env = SimEnvironment::new(&config)?;
    let metrics = Arc::new(Metrics::new());
    let factory = CellFactory::from_config(&config.cell).with_metrics(Arc::clone(&metrics));

    let cells = match &config.layout {
        LayoutConfig::Single { position } => vec![factory.create_cell(&mut env, *position)?],
        LayoutConfig::Grid2d(grid) => factory.create_2d_grid(&mut env, grid)?,
        LayoutConfig::Grid3d(grid) => factory.create_3d_grid(&mut env, grid)?,
    };
    metrics.log_summary();

    let report = CellReport::collect(&env, &cells)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
