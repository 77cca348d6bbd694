use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{preview, round2, Label, WordInfluence};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub id: Uuid,
    /// First 100 characters of the message, with an ellipsis when longer.
    pub message: String,
    pub full_message: String,
    pub prediction: Label,
    /// Probability of the predicted class, as a percentage (two decimals).
    pub confidence: f64,
    pub word_influence: Vec<WordInfluence>,
    pub timestamp: DateTime<Utc>,
}

impl ClassificationResult {
    pub fn new(
        full_message: String,
        prediction: Label,
        confidence: f64,
        word_influence: Vec<WordInfluence>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: preview(&full_message),
            full_message,
            prediction,
            confidence,
            word_influence,
            timestamp,
        }
    }
}

/// Immutable record of one submitted batch. Persisted exactly once and
/// never mutated thereafter; `spam_count + ham_count == total` always.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub total: usize,
    pub spam_count: usize,
    pub ham_count: usize,
    pub spam_percentage: f64,
    /// Results in original input order.
    pub results: Vec<ClassificationResult>,
}

impl BatchReport {
    pub fn assemble(results: Vec<ClassificationResult>, timestamp: DateTime<Utc>) -> Self {
        let total = results.len();
        let spam_count = results
            .iter()
            .filter(|r| r.prediction == Label::Spam)
            .count();
        let ham_count = total - spam_count;
        Self {
            batch_id: Uuid::new_v4(),
            timestamp,
            total,
            spam_count,
            ham_count,
            spam_percentage: round2(100.0 * spam_count as f64 / total as f64),
            results,
        }
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.total,
            spam_count: self.spam_count,
            ham_count: self.ham_count,
            spam_percentage: self.spam_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub spam_count: usize,
    pub ham_count: usize,
    pub spam_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub batch_id: Uuid,
    pub summary: BatchSummary,
}
