use eframe::egui::{self, Color32, RichText, Ui};

use crate::color;
use crate::data::cache::DatasetCache;
use crate::encode::fields::FieldDisplaySpec;
use crate::encode::view::PatientView;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} patients loaded from {}",
            state.patient_ids.len(),
            state.session.source().display()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Patient selector
// ---------------------------------------------------------------------------

pub fn patient_selector(ui: &mut Ui, state: &mut AppState) {
    let mut picked: Option<String> = None;
    let mut cleared = false;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Select Patient ID:");
        let current = state.selected.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("patient_id")
            .selected_text(&current)
            .width(200.0)
            .show_ui(ui, |ui: &mut Ui| {
                for id in &state.patient_ids {
                    if ui.selectable_label(current == *id, id).clicked() {
                        picked = Some(id.clone());
                    }
                }
            });
        if state.selected.is_some() && ui.small_button("Clear").clicked() {
            cleared = true;
        }
    });

    if let Some(id) = picked {
        state.select_patient(&id);
    } else if cleared {
        state.clear_selection();
    }
}

// ---------------------------------------------------------------------------
// Patient details
// ---------------------------------------------------------------------------

pub fn key_measurements(ui: &mut Ui, view: &PatientView) {
    ui.heading("Key Measurements");
    for m in &view.key_measurements {
        ui.label(RichText::new(m.label()).strong());
    }
    ui.add_space(4.0);
    ui.label(view.hospitalization_label());
}

/// PMS fields on the left, GIS fields on the right.
pub fn field_panels(ui: &mut Ui, view: &PatientView) {
    ui.columns(2, |cols: &mut [Ui]| {
        field_list(&mut cols[0], "PMS Information", &view.pms);
        field_list(&mut cols[1], "GIS Marker Information", &view.gis);
    });
}

fn field_list(ui: &mut Ui, heading: &str, fields: &[FieldDisplaySpec]) {
    ui.heading(heading);
    for spec in fields {
        ui.label(
            RichText::new(spec.label())
                .color(color::style_color(spec.style.color))
                .size(spec.style.size as f32),
        );
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open patient table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.switch_session(DatasetCache::new(path));
    }
}
