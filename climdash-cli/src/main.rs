//! Climate dashboard renderer
//!
//! Reads the three JSON snapshots written by the data fetcher and emits
//! render-ready chart specifications and KPI tiles.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p climdash-cli -- --data-dir data render --output out/
//! cargo run -p climdash-cli -- --config climdash.toml summary
//! ```

use clap::{Parser, Subcommand};
use climdash_core::config::DashboardConfig;
use climdash_core::dashboard::{build_view, load_snapshot, render, DashboardView, PanelStatus};
use climdash_core::surface::JsonSurface;
use log::{error, info};
use std::fs;
use std::path::PathBuf;

/// Climate dashboard chart and KPI generator
#[derive(Parser, Debug)]
#[command(name = "climdash")]
#[command(about = "Build chart specifications and KPI tiles from climate data snapshots")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the snapshot files (overrides the configuration)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Number of most recent years to overlay (overrides the configuration)
    #[arg(short, long)]
    years: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one chart JSON file per indicator plus `view.json`
    Render {
        /// Output directory
        #[arg(short, long, default_value = "out")]
        output: PathBuf,
    },
    /// Print the KPI tiles and data freshness
    Summary {
        /// Print the full view as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &args.config {
        Some(path) => match DashboardConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => DashboardConfig::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(years) = args.years {
        config.years_displayed = years;
    }

    let snapshot = load_snapshot(&config.data_dir);
    let view = build_view(&snapshot, &config);

    match args.command {
        Command::Render { output } => {
            if let Err(e) = fs::create_dir_all(&output) {
                error!("Failed to create output directory: {}", e);
                std::process::exit(1);
            }
            let mut surface = JsonSurface::new(&output);
            let applied = render(&view, &mut surface);

            let view_path = output.join("view.json");
            let json = match serde_json::to_string_pretty(&view) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialise view: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = fs::write(&view_path, format!("{}\n", json)) {
                error!("Failed to write {}: {}", view_path.display(), e);
                std::process::exit(1);
            }

            info!("Wrote {}", view_path.display());
            println!(
                "Rendered {} of {} charts to {}",
                applied,
                view.panels.len(),
                output.display()
            );
        }
        Command::Summary { json: true } => match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialise view: {}", e);
                std::process::exit(1);
            }
        },
        Command::Summary { json: false } => print!("{}", summary_text(&view)),
    }
}

/// One line per indicator, then the freshness line.
fn summary_text(view: &DashboardView) -> String {
    let mut out = String::new();
    for panel in &view.panels {
        let line = match &panel.status {
            PanelStatus::Ready { stat, .. } => format!(
                "{:<12} {:>16}  {:>7}  {:?}{}",
                panel.indicator.to_string(),
                stat.value_text,
                stat.delta_text,
                stat.classification,
                stat.period
                    .as_ref()
                    .map(|p| format!(" ({})", p))
                    .unwrap_or_default()
            ),
            PanelStatus::Unavailable { reason } => {
                format!("{:<12} {}", panel.indicator.to_string(), reason)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    match view.last_updated {
        Some(ts) => out.push_str(&format!(
            "Last updated: {}\n",
            ts.format("%Y-%m-%d %H:%M UTC")
        )),
        None => out.push_str("Last updated: --\n"),
    }
    out
}
