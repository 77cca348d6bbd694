pub mod charts;

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    domain::{BatchReport, Label, VisualizationSet},
    error::ScanError,
    store::ReportStore,
};

/// Aggregate bar chart keeps the strongest terms across the whole batch.
const AGGREGATE_WORD_LIMIT: usize = 30;

// One process-wide critical section around generate-plus-persist, so
// concurrent first requests for a batch render exactly once.
static RENDER_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Lazily derives the three chart artifacts for a stored report and caches
/// them under the batch id; cached sets are returned verbatim.
#[derive(Debug)]
pub struct VisualizationGenerator {
    reports: Arc<ReportStore>,
}

impl VisualizationGenerator {
    pub fn new(reports: Arc<ReportStore>) -> Self {
        Self { reports }
    }

    pub fn get_or_generate(&self, batch_id: Uuid) -> Result<VisualizationSet, ScanError> {
        if let Some(cached) = self.reports.cached_visualizations(batch_id)? {
            tracing::debug!(target: "viz", %batch_id, "visualization cache hit");
            return Ok(cached);
        }

        let report = self.reports.get(batch_id)?;

        let _guard = RENDER_LOCK.lock();
        // A concurrent request may have rendered while we waited.
        if let Some(cached) = self.reports.cached_visualizations(batch_id)? {
            return Ok(cached);
        }

        let set = generate(&report)?;
        self.reports.put_visualizations(batch_id, &set)?;
        tracing::info!(target: "viz", %batch_id, "visualizations generated");
        Ok(set)
    }
}

fn generate(report: &BatchReport) -> Result<VisualizationSet, ScanError> {
    let pie = charts::render_pie(report.spam_count, report.ham_count)?;

    let spam_confidences: Vec<f64> = confidences(report, Label::Spam);
    let ham_confidences: Vec<f64> = confidences(report, Label::Ham);
    let histogram = charts::render_confidence_histogram(&spam_confidences, &ham_confidences)?;

    let totals = aggregate_influence(report);
    let bars = charts::render_word_influence(&totals)?;

    Ok(VisualizationSet {
        pie_chart: STANDARD.encode(pie),
        confidence_histogram: STANDARD.encode(histogram),
        word_influence: STANDARD.encode(bars),
    })
}

fn confidences(report: &BatchReport, label: Label) -> Vec<f64> {
    report
        .results
        .iter()
        .filter(|r| r.prediction == label)
        .map(|r| r.confidence)
        .collect()
}

/// Sum of |influence| per word across every result, strongest first,
/// truncated to the aggregate limit. Equal sums fall back to word order
/// so the ranking stays deterministic.
fn aggregate_influence(report: &BatchReport) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for result in &report.results {
        for info in &result.word_influence {
            *totals.entry(info.word.clone()).or_default() += info.influence.abs();
        }
    }

    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(AGGREGATE_WORD_LIMIT);
    ranked
}
