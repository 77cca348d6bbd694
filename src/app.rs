use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    domain::{
        BatchReport, ClassificationResult, HistoryEntry, SubmissionReceipt, VisualizationSet,
        WordStats,
    },
    error::ScanError,
    export,
    infrastructure::directories::ResolvedPaths,
    model::{Explainer, ModelArtifact, SpamClassifier},
    store::{HistoryLedger, ReportStore},
    tasks::BatchProcessor,
    viz::VisualizationGenerator,
};

/// Wires the trained model, the stores, the batch processor and the
/// visualization generator, and exposes the boundary operations. Shared
/// state sits behind `Arc`, so the app can be handed to one thread per
/// request.
#[derive(Debug)]
pub struct SpamScopeApp {
    processor: BatchProcessor,
    reports: Arc<ReportStore>,
    history: Arc<HistoryLedger>,
    viz: VisualizationGenerator,
    classifier: SpamClassifier,
    explainer: Explainer,
    default_user_id: String,
}

impl SpamScopeApp {
    pub fn initialize(config: &AppConfig, paths: &ResolvedPaths) -> Result<Self, ScanError> {
        let artifact = Arc::new(ModelArtifact::load(&paths.model_path)?);
        tracing::info!(
            model = %paths.model_path.display(),
            vocabulary = artifact.vocabulary().len(),
            "model artifact loaded"
        );

        let reports = Arc::new(ReportStore::new(paths.reports_dir.clone()));
        let history = Arc::new(HistoryLedger::new(paths.history_path.clone()));
        let classifier = SpamClassifier::new(artifact.clone());
        let explainer = Explainer::new(artifact);
        let processor = BatchProcessor::new(
            classifier.clone(),
            explainer.clone(),
            reports.clone(),
            history.clone(),
        );
        let viz = VisualizationGenerator::new(reports.clone());

        Ok(Self {
            processor,
            reports,
            history,
            viz,
            classifier,
            explainer,
            default_user_id: config.default_user_id.clone(),
        })
    }

    /// Classifies one uploaded file under the caller's id (or the default
    /// id when the identity provider yields none).
    pub fn submit(
        &self,
        content: &[u8],
        filename: &str,
        user_id: Option<&str>,
    ) -> Result<SubmissionReceipt, ScanError> {
        let user_id = user_id.unwrap_or(&self.default_user_id);
        self.processor.run(content, filename, user_id)
    }

    /// Ad-hoc classification of messages already in hand. Nothing is
    /// persisted: no report, no history entry, no visualization cache.
    pub fn classify_messages(
        &self,
        messages: &[String],
    ) -> Result<Vec<ClassificationResult>, ScanError> {
        let predictions = self.classifier.classify(messages)?;
        let now = Utc::now();
        Ok(messages
            .iter()
            .zip(predictions)
            .map(|(message, prediction)| {
                ClassificationResult::new(
                    message.clone(),
                    prediction.label,
                    prediction.confidence,
                    self.explainer.explain(message),
                    now,
                )
            })
            .collect())
    }

    pub fn report(&self, batch_id: Uuid) -> Result<BatchReport, ScanError> {
        self.reports.get(batch_id)
    }

    pub fn visualizations(&self, batch_id: Uuid) -> Result<VisualizationSet, ScanError> {
        self.viz.get_or_generate(batch_id)
    }

    /// CSV export of a stored report, returned as (suggested filename, body).
    pub fn export_csv(&self, batch_id: Uuid) -> Result<(String, String), ScanError> {
        let report = self.reports.get(batch_id)?;
        Ok((
            export::export_filename(batch_id),
            export::report_to_csv(&report)?,
        ))
    }

    pub fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, ScanError> {
        self.history.get(user_id)
    }

    pub fn history_entry(
        &self,
        user_id: &str,
        batch_id: Uuid,
    ) -> Result<HistoryEntry, ScanError> {
        self.history.get_entry(user_id, batch_id)
    }

    pub fn word_stats(&self) -> WordStats {
        self.explainer.aggregate_vocabulary()
    }
}
