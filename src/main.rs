use anyhow::anyhow;
use clap::Parser;
use eframe::egui;

use patient_lens::app::{PatientLensApp, TITLE};
use patient_lens::config::Config;
use patient_lens::data::cache::DatasetCache;
use patient_lens::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();

    // A dataset that cannot be loaded halts startup.
    let state = AppState::open(DatasetCache::new(&config.data), config.patient.as_deref())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(PatientLensApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}
