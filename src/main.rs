mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod view;

use anyhow::{Context, Result};
use app::LaunchDashApp;
use clap::Parser;
use config::{Cli, DashConfig};
use data::loader::load_file;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DashConfig::load(&cli)?;
    log::debug!("{config:?}");

    // The dashboard cannot start without a valid dataset.
    let dataset = load_file(&config.dataset)
        .with_context(|| format!("loading dataset {}", config.dataset.display()))?;
    let state = AppState::new(dataset, config.dataset.clone(), config.slider_step);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
