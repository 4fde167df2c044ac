mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod present;
mod state;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use app::CountyExplorerApp;
use config::Config;
use data::filter::{eligible_count, evaluate, ThresholdSet};
use data::store::Store;
use eframe::egui;

fn main() -> ExitCode {
    env_logger::init();
    let config = Config::from_env_and_args();

    let store = match Store::load(&config.records, &config.boundaries) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to load county data: {:#}", anyhow::Error::new(e));
            return ExitCode::FAILURE;
        }
    };

    if config.headless {
        let thresholds = ThresholdSet::default();
        let evaluation = evaluate(store.records(), &thresholds);
        let (no_shape, no_record) = store.unmatched();
        println!(
            "{} counties, {} outlines ({no_shape} without outline, {no_record} without record); {} match {thresholds:?}",
            store.len(),
            store.boundaries().len(),
            eligible_count(&evaluation)
        );
        return ExitCode::SUCCESS;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Where to buy a house?",
        options,
        Box::new(move |_cc| Ok(Box::new(CountyExplorerApp::new(store)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI error: {e}");
            ExitCode::FAILURE
        }
    }
}
