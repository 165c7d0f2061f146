use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{DashboardError, Result};

use super::loader::load_file;
use super::model::PatientTable;

// ---------------------------------------------------------------------------
// Session-scoped dataset cache
// ---------------------------------------------------------------------------

/// Owns one data source for the lifetime of a session.
///
/// The source is read on the first call to [`DatasetCache::table`]; every
/// later call hands out the same `Arc` without touching the file again.
#[derive(Debug)]
pub struct DatasetCache {
    source: PathBuf,
    table: OnceCell<Arc<PatientTable>>,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        DatasetCache {
            source: source.into(),
            table: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// The session's table, loading it on first use.
    pub fn table(&self) -> Result<Arc<PatientTable>> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        let table = load_file(&self.source).map_err(|e| DashboardError::DataLoad {
            path: self.source.display().to_string(),
            reason: format!("{e:#}"),
        })?;

        log::info!(
            "Loaded {} patients with {} columns from {}",
            table.len(),
            table.column_names().len(),
            self.source.display()
        );
        let duplicates = table.duplicate_patient_ids();
        if !duplicates.is_empty() {
            log::warn!(
                "{} patient ids appear more than once, first row wins: {:?}",
                duplicates.len(),
                duplicates
            );
        }

        Ok(Arc::clone(self.table.get_or_init(|| Arc::new(table))))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn table_is_read_once_per_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "patient_id,Qn\nP1,1.0\nP2,2.0").unwrap();
        drop(file);

        let cache = DatasetCache::new(&path);
        assert!(!cache.is_loaded());
        let first = cache.table().unwrap();
        assert!(cache.is_loaded());

        // The source disappearing must not matter once cached.
        std::fs::remove_file(&path).unwrap();
        let second = cache.table().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.list_patient_ids(), vec!["P1", "P2"]);
    }

    #[test]
    fn unreadable_source_is_a_data_load_error() {
        let cache = DatasetCache::new("/no/such/dir/patients.csv");
        match cache.table() {
            Err(DashboardError::DataLoad { path, reason }) => {
                assert!(path.ends_with("patients.csv"));
                assert!(reason.contains("opening CSV"));
            }
            other => panic!("expected DataLoad, got {other:?}"),
        }
        assert!(!cache.is_loaded());
    }
}
