//! masonry-sim - Entry Point

use clap::Parser;
use masonry_virt::config::ColumnCount;
use masonry_virt::simulation::{self, Script};
use std::path::PathBuf;
use tracing::info;

/// masonry-sim - run a scripted masonry session headlessly
#[derive(Parser, Debug)]
#[command(name = "masonry-sim")]
#[command(version)]
#[command(about = "Lay out items headlessly, replay scroll steps and print the result as JSON")]
pub struct Args {
    /// JSON file with an array of {"id", "height"} items
    pub items: PathBuf,

    /// Container width in px
    #[arg(short, long, default_value_t = 1200.0)]
    pub width: f64,

    /// Viewport height in px
    #[arg(long, default_value_t = 800.0)]
    pub viewport_height: f64,

    /// Scroll offset to visit (repeatable, visited in order)
    #[arg(short, long = "scroll", value_name = "TOP")]
    pub scroll: Vec<f64>,

    /// Enable scroll virtualization
    #[arg(long)]
    pub virtualize: bool,

    /// Fixed column count (overrides breakpoints)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub columns: Option<u32>,

    /// Gap between items in px
    #[arg(short, long)]
    pub gap: Option<f64>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = masonry_virt::config::load_config_with_precedence(args.config.clone())?;
        let merged = masonry_virt::config::merge_config(config_file);
        let with_env = masonry_virt::config::apply_env_overrides(merged);

        let columns_override = args.columns.map(ColumnCount::new).transpose()?;
        let virtualize_override = if args.virtualize { Some(true) } else { None };

        masonry_virt::config::apply_cli_overrides(
            with_env,
            columns_override,
            args.gap,
            virtualize_override,
        )
    };

    masonry_virt::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let items = simulation::load_items(&args.items)?;
    let script = Script {
        items,
        container_width: args.width,
        viewport_height: args.viewport_height,
        scroll_steps: args.scroll,
    };
    let report = simulation::run(script, config.options)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
