use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::{DashboardError, Result};

/// Column holding the unique row key.
pub const PATIENT_ID: &str = "patient_id";

// ---------------------------------------------------------------------------
// FieldValue – a single cell of the patient table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the Pandas dtypes found in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Empty cell or NaN.
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            // Debug keeps the trailing `.0` of whole floats.
            FieldValue::Float(v) => write!(f, "{v:?}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Interpret the value as an `f64`. Booleans count as 0 / 1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

// ---------------------------------------------------------------------------
// PatientRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single patient row: `patient_id` plus every other column by name.
#[derive(Debug, Clone)]
pub struct PatientRecord {
    patient_id: String,
    fields: BTreeMap<String, FieldValue>,
}

impl PatientRecord {
    /// Build a record from its cells. Returns `None` when the row has no
    /// usable `patient_id`.
    pub fn new(fields: BTreeMap<String, FieldValue>) -> Option<Self> {
        let patient_id = match fields.get(PATIENT_ID)? {
            FieldValue::Null => return None,
            v => v.to_string(),
        };
        Some(PatientRecord { patient_id, fields })
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Raw lookup; `None` if the row lacks the column.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Lookup that treats a missing column as a contract violation.
    pub fn field(&self, field: &str) -> Result<&FieldValue> {
        self.fields
            .get(field)
            .ok_or_else(|| DashboardError::FieldNotFound {
                patient_id: self.patient_id.clone(),
                field: field.to_string(),
            })
    }

    /// Numeric value of `field`. Null cells yield `Ok(None)`.
    pub fn numeric(&self, field: &str) -> Result<Option<f64>> {
        let value = self.field(field)?;
        self.numeric_value(field, value)
    }

    fn numeric_value(&self, field: &str, value: &FieldValue) -> Result<Option<f64>> {
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_f64()
            .map(Some)
            .ok_or_else(|| DashboardError::NotNumeric {
                patient_id: self.patient_id.clone(),
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    /// Numeric value of an optional column: `Ok(None)` when the column is
    /// absent from the row or the cell is null.
    pub fn optional_numeric(&self, field: &str) -> Result<Option<f64>> {
        match self.fields.get(field) {
            Some(value) => self.numeric_value(field, value),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// PatientTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable patient table shared by every query of a session.
#[derive(Debug, Clone)]
pub struct PatientTable {
    records: Vec<PatientRecord>,
    /// Column names in source order (first appearance).
    column_names: Vec<String>,
}

impl PatientTable {
    pub fn new(column_names: Vec<String>, records: Vec<PatientRecord>) -> Self {
        PatientTable {
            records,
            column_names,
        }
    }

    /// Build a table deriving the column list from the records themselves.
    pub fn from_records(records: Vec<PatientRecord>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut column_names = Vec::new();
        for rec in &records {
            for col in rec.fields.keys() {
                if seen.insert(col.as_str()) {
                    column_names.push(col.clone());
                }
            }
        }
        PatientTable::new(column_names, records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// Unique patient ids in row order; the first occurrence of a duplicate
    /// keeps its position.
    pub fn list_patient_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(PatientRecord::patient_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Ids that appear on more than one row.
    pub fn duplicate_patient_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.records
            .iter()
            .map(PatientRecord::patient_id)
            .filter(|id| !seen.insert(*id) && reported.insert(*id))
            .collect()
    }

    /// First row whose id equals `patient_id`.
    pub fn row(&self, patient_id: &str) -> Result<&PatientRecord> {
        self.records
            .iter()
            .find(|r| r.patient_id == patient_id)
            .ok_or_else(|| DashboardError::PatientNotFound(patient_id.to_string()))
    }

    /// All non-null numeric values of a column, in row order. Every row
    /// must carry the column; a row without it is `FieldNotFound`.
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        if !self.has_column(name) {
            return Err(DashboardError::ColumnNotFound(name.to_string()));
        }
        let mut values = Vec::with_capacity(self.records.len());
        for rec in &self.records {
            if let Some(v) = rec.numeric(name)? {
                values.push(v);
            }
        }
        Ok(values)
    }
}
