use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::{BatchReport, ClassificationResult, HistoryEntry, SubmissionReceipt},
    error::ScanError,
    ingest,
    model::{Explainer, SpamClassifier},
    store::{HistoryLedger, ReportStore},
};

/// Orchestrates one submission: ingest → classify → explain → assemble →
/// persist report → append history.
#[derive(Debug)]
pub struct BatchProcessor {
    classifier: SpamClassifier,
    explainer: Explainer,
    reports: Arc<ReportStore>,
    history: Arc<HistoryLedger>,
}

impl BatchProcessor {
    pub fn new(
        classifier: SpamClassifier,
        explainer: Explainer,
        reports: Arc<ReportStore>,
        history: Arc<HistoryLedger>,
    ) -> Self {
        Self {
            classifier,
            explainer,
            reports,
            history,
        }
    }

    pub fn run(
        &self,
        content: &[u8],
        filename: &str,
        user_id: &str,
    ) -> Result<SubmissionReceipt, ScanError> {
        let messages = ingest::parse(content, filename)?;
        let predictions = self.classifier.classify(&messages)?;

        let now = Utc::now();
        let results: Vec<ClassificationResult> = messages
            .into_iter()
            .zip(predictions)
            .map(|(message, prediction)| {
                let word_influence = self.explainer.explain(&message);
                ClassificationResult::new(
                    message,
                    prediction.label,
                    prediction.confidence,
                    word_influence,
                    now,
                )
            })
            .collect();

        // Nothing is persisted before this point; ingestion and
        // classification failures leave no partial report behind.
        let report = BatchReport::assemble(results, now);
        self.reports.put(&report)?;

        // The report write and the history append are two independent
        // writes. A failure between them leaves a report with no ledger
        // entry; the report stays the durable artifact.
        self.history.append(user_id, HistoryEntry::from(&report))?;

        tracing::info!(
            target: "processor",
            batch_id = %report.batch_id,
            user_id,
            total = report.total,
            spam = report.spam_count,
            ham = report.ham_count,
            "batch processed"
        );

        Ok(SubmissionReceipt {
            batch_id: report.batch_id,
            summary: report.summary(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Label, model::ModelArtifact};

    struct Fixture {
        _dir: tempfile::TempDir,
        processor: BatchProcessor,
        reports: Arc<ReportStore>,
        history: Arc<HistoryLedger>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Arc::new(
            ModelArtifact::from_parts(
                vec!["cash".into(), "lunch".into(), "noon".into(), "win".into()],
                vec![0.5f64.ln(), 0.5f64.ln()],
                vec![
                    vec![0.05f64.ln(), 0.45f64.ln(), 0.45f64.ln(), 0.05f64.ln()],
                    vec![0.4f64.ln(), 0.1f64.ln(), 0.1f64.ln(), 0.4f64.ln()],
                ],
            )
            .unwrap(),
        );
        let reports = Arc::new(ReportStore::new(dir.path().to_path_buf()));
        let history = Arc::new(HistoryLedger::new(dir.path().join("history.json")));
        let processor = BatchProcessor::new(
            SpamClassifier::new(artifact.clone()),
            Explainer::new(artifact),
            reports.clone(),
            history.clone(),
        );
        Fixture {
            _dir: dir,
            processor,
            reports,
            history,
        }
    }

    #[test]
    fn submission_summary_matches_the_batch() {
        let fx = fixture();
        let receipt = fx
            .processor
            .run(b"WIN CASH NOW!!!\nlunch at noon?\n", "emails.txt", "demo")
            .unwrap();

        assert_eq!(receipt.summary.total, 2);
        assert_eq!(receipt.summary.spam_count, 1);
        assert_eq!(receipt.summary.ham_count, 1);
        assert_eq!(receipt.summary.spam_percentage, 50.0);
    }

    #[test]
    fn persisted_report_round_trips_in_input_order() {
        let fx = fixture();
        let receipt = fx
            .processor
            .run(b"WIN CASH NOW!!!\nlunch at noon?\n", "emails.txt", "demo")
            .unwrap();

        let report = fx.reports.get(receipt.batch_id).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.spam_count + report.ham_count, report.total);
        assert_eq!(report.results[0].full_message, "WIN CASH NOW!!!");
        assert_eq!(report.results[0].prediction, Label::Spam);
        assert_eq!(report.results[1].full_message, "lunch at noon?");
        assert_eq!(report.results[1].prediction, Label::Ham);
        assert!(!report.results[0].word_influence.is_empty());
    }

    #[test]
    fn failed_ingestion_persists_nothing() {
        let fx = fixture();
        let err = fx.processor.run(b"   \n  \n", "blank.txt", "demo").unwrap_err();
        assert!(matches!(err, ScanError::EmptyInput { .. }));
        assert!(fx.history.get("demo").unwrap().is_empty());
    }

    #[test]
    fn fifty_one_submissions_keep_only_the_newest_fifty() {
        let fx = fixture();
        let first = fx
            .processor
            .run(b"WIN CASH NOW!!!\n", "emails.txt", "demo")
            .unwrap();
        for _ in 0..50 {
            fx.processor
                .run(b"lunch at noon?\n", "emails.txt", "demo")
                .unwrap();
        }

        let entries = fx.history.get("demo").unwrap();
        assert_eq!(entries.len(), 50);
        assert!(entries.iter().all(|e| e.id != first.batch_id));
    }
}
