use std::fmt;

use crate::data::model::{FieldValue, PatientRecord};
use crate::error::Result;

/// Clinical fields, in display order.
pub const PMS_FIELDS: [&str; 15] = [
    "assigned_sex",
    "age_group_new",
    "Sitting Sys_encoded",
    "Sitting Dia_encoded",
    "Haemoglobin_encoded",
    "eGFR_encoded",
    "Triglyceride_encoded",
    "Chol/HDL Ratio_encoded",
    "mmol_encoded",
    "Ferritin_encoded",
    "LDL Cholesterol_encoded",
    "Uric Acid_encoded",
    "Albumin/Creatinine Ratio_encoded",
    "BMI_encoded",
    "cms_encoded",
];

/// Geospatial marker fields, in display order.
pub const GIS_FIELDS: [&str; 11] = [
    "harvested_dist",
    "urban_park_dist",
    "exotic_frst_dist",
    "exotic_grass_dist",
    "exotic_shrub_dist",
    "crop_dist",
    "indg_frst_dist",
    "broadleaf_dist",
    "tree_count",
    "solar_watts_mean",
    "wetness_index_mean",
];

pub const IMPORTANCE_PREFIX: &str = "imp_";
pub const HOSPITALIZED: &str = "Hospitalized";

/// Text size per unit of `|importance|`.
pub const SIZE_SCALE: f64 = 200.0;
/// Text size of a zero-importance field.
pub const SIZE_FLOOR: f64 = 10.0;
/// Text size of a field without an importance column.
pub const DEFAULT_SIZE: f64 = 12.0;

// ---------------------------------------------------------------------------
// Style value object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleColor {
    /// Negative importance.
    Green,
    /// Zero or positive importance.
    Red,
    /// No importance score.
    Black,
}

impl StyleColor {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleColor::Green => "green",
            StyleColor::Red => "red",
            StyleColor::Black => "black",
        }
    }
}

impl fmt::Display for StyleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour and text size handed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStyle {
    pub color: StyleColor,
    pub size: f64,
}

impl FieldStyle {
    /// Linear encoding of a signed importance score.
    pub fn from_importance(importance: Option<f64>) -> Self {
        match importance {
            Some(imp) => FieldStyle {
                color: if imp < 0.0 {
                    StyleColor::Green
                } else {
                    StyleColor::Red
                },
                size: imp.abs() * SIZE_SCALE + SIZE_FLOOR,
            },
            None => FieldStyle {
                color: StyleColor::Black,
                size: DEFAULT_SIZE,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Per-field display
// ---------------------------------------------------------------------------

/// Everything needed to draw one line of a field panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDisplaySpec {
    pub field: String,
    pub value: FieldValue,
    pub importance: Option<f64>,
    pub style: FieldStyle,
}

impl FieldDisplaySpec {
    pub fn label(&self) -> String {
        format!("{}: {}", self.field, self.value)
    }
}

pub fn importance_field(field: &str) -> String {
    format!("{IMPORTANCE_PREFIX}{field}")
}

/// Display attributes for `field` of `row`.
///
/// A field without an `imp_` column, or with a null importance cell, is
/// drawn in the default style.
pub fn compute_field_display(row: &PatientRecord, field: &str) -> Result<FieldDisplaySpec> {
    let value = row.field(field)?.clone();
    let importance = row.optional_numeric(&importance_field(field))?;
    Ok(FieldDisplaySpec {
        field: field.to_string(),
        value,
        importance,
        style: FieldStyle::from_importance(importance),
    })
}

/// Display specs for a fixed list of fields, stopping at the first failure.
pub fn compute_field_displays(row: &PatientRecord, fields: &[&str]) -> Result<Vec<FieldDisplaySpec>> {
    fields
        .iter()
        .map(|field| compute_field_display(row, field))
        .collect()
}

// ---------------------------------------------------------------------------
// Hospitalization status
// ---------------------------------------------------------------------------

pub const NEVER_HOSPITALIZED: &str = "Never hospitalized";
pub const HOSPITALIZED_AT_LEAST_ONCE: &str = "Hospitalized at least once";

pub fn hospitalization_status(row: &PatientRecord) -> Result<&'static str> {
    let never = row
        .field(HOSPITALIZED)?
        .as_f64()
        .is_some_and(|v| v == 0.0);
    Ok(if never {
        NEVER_HOSPITALIZED
    } else {
        HOSPITALIZED_AT_LEAST_ONCE
    })
}
