use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot};

pub const TITLE: &str = "Patient Data Visualization with Enhanced Details";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PatientLensApp {
    pub state: AppState,
}

impl PatientLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PatientLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: selection, plots, fields ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &mut self.state);
                });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading(TITLE);
    ui.add_space(4.0);
    panels::patient_selector(ui, state);
    ui.separator();

    if let Some(err) = &state.error {
        ui.label(RichText::new(format!("Error: {err}")).color(Color32::RED));
        return;
    }

    if let Some(distributions) = state.distributions() {
        plot::distribution_row(ui, distributions);
        ui.separator();
    }

    let Some(view) = &state.view else {
        return;
    };
    panels::key_measurements(ui, view);
    ui.separator();
    panels::field_panels(ui, view);
}
