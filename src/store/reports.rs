use std::{
    fs,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    domain::{BatchReport, VisualizationSet},
    error::ScanError,
};

/// Durable keyed storage for batch reports and their cached chart sets:
/// one complete JSON snapshot per batch id. Every mutation rewrites the
/// whole record under the store's single exclusive lock.
#[derive(Debug)]
pub struct ReportStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl ReportStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    fn report_path(&self, batch_id: Uuid) -> PathBuf {
        self.dir.join(format!("{batch_id}.json"))
    }

    fn viz_path(&self, batch_id: Uuid) -> PathBuf {
        self.dir.join(format!("{batch_id}_viz.json"))
    }

    /// Reports are written exactly once; the caller never mutates one
    /// after this returns.
    pub fn put(&self, report: &BatchReport) -> Result<(), ScanError> {
        let _guard = self.lock.lock();
        write_json(&self.report_path(report.batch_id), report)
    }

    pub fn get(&self, batch_id: Uuid) -> Result<BatchReport, ScanError> {
        let _guard = self.lock.lock();
        let path = self.report_path(batch_id);
        if !path.exists() {
            return Err(ScanError::not_found("report", batch_id.to_string()));
        }
        read_json(&path)
    }

    pub fn cached_visualizations(
        &self,
        batch_id: Uuid,
    ) -> Result<Option<VisualizationSet>, ScanError> {
        let _guard = self.lock.lock();
        let path = self.viz_path(batch_id);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn put_visualizations(
        &self,
        batch_id: Uuid,
        set: &VisualizationSet,
    ) -> Result<(), ScanError> {
        let _guard = self.lock.lock();
        write_json(&self.viz_path(batch_id), set)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ScanError> {
    let data = serde_json::to_vec(value).map_err(ScanError::storage)?;
    fs::write(path, data).map_err(ScanError::storage)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ScanError> {
    let data = fs::read(path).map_err(ScanError::storage)?;
    serde_json::from_slice(&data).map_err(ScanError::storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassificationResult, Label};
    use chrono::Utc;

    fn sample_report() -> BatchReport {
        BatchReport::assemble(
            vec![
                ClassificationResult::new(
                    "WIN CASH NOW!!!".to_string(),
                    Label::Spam,
                    91.0,
                    Vec::new(),
                    Utc::now(),
                ),
                ClassificationResult::new(
                    "lunch at noon?".to_string(),
                    Label::Ham,
                    83.5,
                    Vec::new(),
                    Utc::now(),
                ),
            ],
            Utc::now(),
        )
    }

    #[test]
    fn put_then_get_round_trips_counts_and_ordering() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        let report = sample_report();
        store.put(&report).unwrap();

        let fetched = store.get(report.batch_id).unwrap();
        assert_eq!(fetched.total, report.total);
        assert_eq!(fetched.spam_count, report.spam_count);
        assert_eq!(fetched.ham_count, report.ham_count);
        let order: Vec<Uuid> = fetched.results.iter().map(|r| r.id).collect();
        let expected: Vec<Uuid> = report.results.iter().map(|r| r.id).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn unknown_batch_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        let err = store.get(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ScanError::NotFound { kind: "report", .. }));
    }

    #[test]
    fn visualization_cache_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().to_path_buf());
        let batch_id = Uuid::new_v4();
        assert!(store.cached_visualizations(batch_id).unwrap().is_none());

        let set = VisualizationSet {
            pie_chart: "cGll".to_string(),
            confidence_histogram: "aGlzdA==".to_string(),
            word_influence: "d29yZHM=".to_string(),
        };
        store.put_visualizations(batch_id, &set).unwrap();
        assert_eq!(store.cached_visualizations(batch_id).unwrap(), Some(set));
    }
}
