use thiserror::Error;

// ---------------------------------------------------------------------------
// Dashboard error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced to the operator.
///
/// `DataLoad` is fatal at startup. The remaining variants are data-contract
/// violations shown in the UI's error state for the current selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("could not load dataset from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("patient '{0}' not found")]
    PatientNotFound(String),

    #[error("field '{field}' missing for patient '{patient_id}'")]
    FieldNotFound { patient_id: String, field: String },

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("'{field}' of patient '{patient_id}' is not numeric: {value}")]
    NotNumeric {
        patient_id: String,
        field: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
