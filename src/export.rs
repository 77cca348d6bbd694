use uuid::Uuid;

use crate::{domain::BatchReport, error::ScanError};

const TOP_WORDS_PER_ROW: usize = 5;

pub fn export_filename(batch_id: Uuid) -> String {
    format!("spam_analysis_report_{batch_id}.csv")
}

/// Tabular export of a report: one row per classified message with its
/// five most influential words.
pub fn report_to_csv(report: &BatchReport) -> Result<String, ScanError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "message",
            "prediction",
            "confidence_percent",
            "top_5_influential_words_with_scores",
        ])
        .map_err(ScanError::storage)?;

    for result in &report.results {
        let top_words = result
            .word_influence
            .iter()
            .take(TOP_WORDS_PER_ROW)
            .map(|info| format!("{} ({:.2})", info.word, info.influence))
            .collect::<Vec<_>>()
            .join(", ");
        let prediction = result.prediction.to_string();
        let confidence = result.confidence.to_string();
        writer
            .write_record([
                result.full_message.as_str(),
                prediction.as_str(),
                confidence.as_str(),
                top_words.as_str(),
            ])
            .map_err(ScanError::storage)?;
    }

    let bytes = writer.into_inner().map_err(ScanError::storage)?;
    String::from_utf8(bytes).map_err(ScanError::storage)
}
