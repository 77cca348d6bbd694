pub mod history;
pub mod report;
pub mod types;

pub use history::{HistoryEntry, HISTORY_LIMIT};
pub use report::{BatchReport, BatchSummary, ClassificationResult, SubmissionReceipt};
pub use types::{preview, round2, Label, VisualizationSet, WordInfluence, WordStats, WordWeight};
