use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::report::BatchReport;

/// Oldest entries are evicted once a caller's ledger exceeds this.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub total: usize,
    pub spam_count: usize,
    pub ham_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<&BatchReport> for HistoryEntry {
    fn from(report: &BatchReport) -> Self {
        Self {
            id: report.batch_id,
            total: report.total,
            spam_count: report.spam_count,
            ham_count: report.ham_count,
            timestamp: report.timestamp,
        }
    }
}
