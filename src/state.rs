use std::sync::Arc;

use crate::data::cache::DatasetCache;
use crate::data::model::PatientTable;
use crate::encode::distribution::{compute_distributions, DistributionSummary};
use crate::encode::view::PatientView;
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Session owning the data source.
    pub session: DatasetCache,

    /// The session's table (shared, read-only).
    pub table: Arc<PatientTable>,

    /// Options of the patient selector, in row order.
    pub patient_ids: Vec<String>,

    /// Currently selected patient id.
    pub selected: Option<String>,

    /// Derived display data for `selected` (None when nothing is selected
    /// or the selection failed).
    pub view: Option<PatientView>,

    /// Population histograms without a marker, shown when `view` is None.
    pub population: Option<[DistributionSummary; 3]>,

    /// Data-contract violation for the current selection.
    pub error: Option<DashboardError>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start a session: load the source and select `initial` (or the first
    /// patient).
    pub fn open(session: DatasetCache, initial: Option<&str>) -> Result<Self> {
        let table = session.table()?;
        let patient_ids: Vec<String> = table
            .list_patient_ids()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut state = AppState {
            session,
            table,
            patient_ids,
            selected: None,
            view: None,
            population: None,
            error: None,
            status_message: None,
        };

        let first = initial
            .map(str::to_string)
            .or_else(|| state.patient_ids.first().cloned());
        match first {
            Some(id) => state.select_patient(&id),
            None => state.clear_selection(),
        }
        Ok(state)
    }

    /// Replace the current session with one reading `session`'s source.
    /// The current session is kept if the new source fails to load.
    pub fn switch_session(&mut self, session: DatasetCache) {
        let source = session.source().display().to_string();
        match AppState::open(session, None) {
            Ok(next) => *self = next,
            Err(e) => {
                log::error!("Failed to open {source}: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute every derived value for `patient_id`.
    pub fn select_patient(&mut self, patient_id: &str) {
        log::debug!("Selecting patient {patient_id}");
        self.selected = Some(patient_id.to_string());
        match PatientView::build(&self.table, patient_id) {
            Ok(view) => {
                self.view = Some(view);
                self.error = None;
            }
            Err(e) => {
                log::error!("Cannot display patient {patient_id}: {e}");
                self.view = None;
                self.error = Some(e);
            }
        }
        self.population = None;
    }

    /// Drop the selection and show the bare population distributions.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.view = None;
        match compute_distributions(&self.table, None) {
            Ok(dists) => {
                self.population = Some(dists);
                self.error = None;
            }
            Err(e) => {
                log::error!("Cannot summarise population: {e}");
                self.population = None;
                self.error = Some(e);
            }
        }
    }

    /// Distributions to draw: the selection's if any, else the population's.
    pub fn distributions(&self) -> Option<&[DistributionSummary; 3]> {
        self.view
            .as_ref()
            .map(|v| &v.distributions)
            .or(self.population.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::fields::{importance_field, GIS_FIELDS, HOSPITALIZED, PMS_FIELDS};

    /// Write a complete patient CSV with `ids` and return its session.
    fn session(dir: &tempfile::TempDir, ids: &[&str]) -> DatasetCache {
        let path = dir.path().join("patients.csv");
        let mut writer = csv::Writer::from_path(&path).unwrap();

        let mut header = vec![
            "patient_id".to_string(),
            "Q_GIS".into(),
            "Qn".into(),
            "Qn_PMS".into(),
            HOSPITALIZED.into(),
        ];
        for field in PMS_FIELDS.iter().chain(GIS_FIELDS.iter()) {
            header.push(field.to_string());
            header.push(importance_field(field));
        }
        writer.write_record(&header).unwrap();

        for (i, id) in ids.iter().enumerate() {
            let mut row = vec![
                id.to_string(),
                format!("{}", i as f64 * 0.5),
                format!("{}", i as f64),
                format!("{}", i as f64 * 2.0),
                format!("{}", i % 2),
            ];
            for _ in PMS_FIELDS.iter().chain(GIS_FIELDS.iter()) {
                row.push("1".into());
                row.push("-0.25".into());
            }
            writer.write_record(&row).unwrap();
        }
        writer.flush().unwrap();
        DatasetCache::new(path)
    }

    #[test]
    fn opening_selects_first_patient() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(session(&dir, &["A", "B", "A", "C"]), None).unwrap();
        assert_eq!(state.patient_ids, vec!["A", "B", "C"]);
        assert_eq!(state.selected.as_deref(), Some("A"));
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.hospitalization, "Never hospitalized");
        assert_eq!(view.pms[1].style.size, 60.0);
        assert!(state.error.is_none());
    }

    #[test]
    fn unknown_initial_patient_shows_error_without_view() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(session(&dir, &["A", "B"]), Some("Z")).unwrap();
        assert!(state.view.is_none());
        assert_eq!(state.error, Some(DashboardError::PatientNotFound("Z".into())));
        assert!(state.distributions().is_none());
    }

    #[test]
    fn reselecting_recovers_from_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::open(session(&dir, &["A", "B"]), Some("Z")).unwrap();
        state.select_patient("B");
        assert!(state.error.is_none());
        let dists = state.distributions().unwrap();
        assert_eq!(dists[1].marker_value, Some(1.0));
        assert_eq!(dists[1].median, 0.5);
    }

    #[test]
    fn clearing_selection_keeps_population() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::open(session(&dir, &["A", "B", "C"]), None).unwrap();
        let before = state.distributions().unwrap()[2].median;
        state.clear_selection();
        let dists = state.distributions().unwrap();
        assert_eq!(dists[2].median, before);
        assert!(dists.iter().all(|d| d.marker_value.is_none()));
    }

    #[test]
    fn failed_switch_keeps_current_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::open(session(&dir, &["A"]), None).unwrap();
        state.switch_session(DatasetCache::new(dir.path().join("missing.csv")));
        assert_eq!(state.patient_ids, vec!["A"]);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }

    #[test]
    fn missing_source_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppState::open(DatasetCache::new(dir.path().join("nope.csv")), None);
        assert!(matches!(result, Err(DashboardError::DataLoad { .. })));
    }

    #[test]
    fn file_is_not_reread_on_selection() {
        let dir = tempfile::tempdir().unwrap();
        let cache = session(&dir, &["A", "B"]);
        let path = cache.source().to_path_buf();
        let mut state = AppState::open(cache, None).unwrap();
        std::fs::remove_file(&path).unwrap();
        state.select_patient("B");
        assert!(state.view.is_some());
    }
}
