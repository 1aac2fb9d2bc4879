mod app;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bibnet::config::NetworkConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON object of entries keyed by id.
    entries: PathBuf,

    /// JSON file with network and tag cloud settings.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    min_keyword_frequency: Option<usize>,

    #[arg(long)]
    min_edge_weight: Option<f64>,

    /// Start with the keyword network hidden.
    #[arg(long)]
    hide_network: bool,
}

impl Args {
    fn network_config(&self) -> Result<NetworkConfig> {
        let mut config = match &self.config {
            Some(path) => NetworkConfig::load(path)?,
            None => NetworkConfig::default(),
        };

        if let Some(frequency) = self.min_keyword_frequency {
            config.min_keyword_frequency = Some(frequency);
        }
        if let Some(weight) = self.min_edge_weight {
            config.min_edge_weight = weight;
        }
        config.hidden |= self.hide_network;

        config
            .validate()
            .context("invalid settings after applying command line flags")?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bibnet=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let config = match args.network_config() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("{error:#}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(entries = %args.entries.display(), "starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "bibnet",
        options,
        Box::new(move |cc| Ok(Box::new(app::BibApp::new(cc, args.entries, config)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "window closed with an error");
            ExitCode::FAILURE
        }
    }
}
