use crate::data::model::{PatientRecord, PatientTable};
use crate::error::Result;

use super::distribution::{compute_distributions, DistributionSummary};
use super::fields::{
    compute_field_displays, hospitalization_status, FieldDisplaySpec, GIS_FIELDS, PMS_FIELDS,
};

/// Composite scores shown in the key-measurement block, in display order.
pub const KEY_MEASUREMENTS: [&str; 3] = ["Qn", "Q_GIS", "Qn_PMS"];

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMeasurement {
    pub name: &'static str,
    pub value: Option<f64>,
}

impl KeyMeasurement {
    pub fn label(&self) -> String {
        match self.value {
            Some(v) => format!("{}: {v:.2}", self.name),
            None => format!("{}: n/a", self.name),
        }
    }
}

pub fn key_measurements(row: &PatientRecord) -> Result<Vec<KeyMeasurement>> {
    KEY_MEASUREMENTS
        .iter()
        .map(|&name| {
            Ok(KeyMeasurement {
                name,
                value: row.numeric(name)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// PatientView – everything rendered for one selection
// ---------------------------------------------------------------------------

/// All derived display data for one patient. Built in one go so a failure
/// anywhere leaves nothing half-rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientView {
    pub patient_id: String,
    pub distributions: [DistributionSummary; 3],
    pub key_measurements: Vec<KeyMeasurement>,
    pub hospitalization: &'static str,
    pub pms: Vec<FieldDisplaySpec>,
    pub gis: Vec<FieldDisplaySpec>,
}

impl PatientView {
    pub fn build(table: &PatientTable, patient_id: &str) -> Result<Self> {
        let row = table.row(patient_id)?;
        Ok(PatientView {
            patient_id: row.patient_id().to_string(),
            distributions: compute_distributions(table, Some(row))?,
            key_measurements: key_measurements(row)?,
            hospitalization: hospitalization_status(row)?,
            pms: compute_field_displays(row, &PMS_FIELDS)?,
            gis: compute_field_displays(row, &GIS_FIELDS)?,
        })
    }

    pub fn hospitalization_label(&self) -> String {
        format!("Hospitalized: {}", self.hospitalization)
    }
}
