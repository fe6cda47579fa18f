mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use app::RustySherdsApp;
use clap::Parser;
use config::{Cli, DashboardConfig};
use data::loader::DatasetLoader;
use eframe::egui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = DashboardConfig::resolve(&cli).context("resolving configuration")?;
    log::info!(
        "Data directory {}, call-outs {:?}",
        config.data_dir.display(),
        config.annotated_samples
    );

    // Built once; every consumer shares the same cached dataset.
    let loader = Arc::new(DatasetLoader::new(
        config.data_dir.clone(),
        config.annotated_samples.clone(),
    ));

    if cli.summary {
        let summary = report::Summary {
            data_dir: loader.data_dir(),
            dataset: loader.load(),
        };
        print!("{summary}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Sherds – Ceramic Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(RustySherdsApp::new(loader)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
