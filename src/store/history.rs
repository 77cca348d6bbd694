use std::{collections::HashMap, fs, path::PathBuf};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    domain::{HistoryEntry, HISTORY_LIMIT},
    error::ScanError,
};

type Ledger = HashMap<String, Vec<HistoryEntry>>;

/// Bounded per-caller activity log, newest first. The whole ledger lives
/// in one JSON file; every append is load → mutate → save under the
/// ledger's single exclusive lock.
#[derive(Debug)]
pub struct HistoryLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryLedger {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn append(&self, user_id: &str, entry: HistoryEntry) -> Result<(), ScanError> {
        let _guard = self.lock.lock();
        let mut ledger = self.load()?;
        let entries = ledger.entry(user_id.to_string()).or_default();
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        self.save(&ledger)
    }

    pub fn get(&self, user_id: &str) -> Result<Vec<HistoryEntry>, ScanError> {
        let _guard = self.lock.lock();
        let mut ledger = self.load()?;
        Ok(ledger.remove(user_id).unwrap_or_default())
    }

    pub fn get_entry(&self, user_id: &str, batch_id: Uuid) -> Result<HistoryEntry, ScanError> {
        self.get(user_id)?
            .into_iter()
            .find(|entry| entry.id == batch_id)
            .ok_or_else(|| ScanError::not_found("scan", batch_id.to_string()))
    }

    fn load(&self) -> Result<Ledger, ScanError> {
        if !self.path.exists() {
            return Ok(Ledger::new());
        }
        let data = fs::read(&self.path).map_err(ScanError::storage)?;
        serde_json::from_slice(&data).map_err(ScanError::storage)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), ScanError> {
        let data = serde_json::to_vec(ledger).map_err(ScanError::storage)?;
        fs::write(&self.path, data).map_err(ScanError::storage)
    }
}
