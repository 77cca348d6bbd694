use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::ScanError;

/// Class indices inside the artifact arrays; ham first, matching the
/// training pipeline's label encoding.
pub const HAM: usize = 0;
pub const SPAM: usize = 1;

// Same token rule the training vectorizer used: lowercase words of two or
// more word characters.
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("valid token regex"));

#[derive(Debug, Deserialize)]
struct RawArtifact {
    vocabulary: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

/// Trained multinomial naive-Bayes artifact exported by the model
/// provider. Immutable once loaded; shared across components via `Arc`.
#[derive(Debug)]
pub struct ModelArtifact {
    vocabulary: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl ModelArtifact {
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let bytes = fs::read(path).map_err(|err| {
            ScanError::ModelUnavailable(format!("{}: {err}", path.display()))
        })?;
        let raw: RawArtifact = serde_json::from_slice(&bytes)
            .map_err(|err| ScanError::ModelUnavailable(format!("{}: {err}", path.display())))?;
        Self::from_parts(raw.vocabulary, raw.class_log_prior, raw.feature_log_prob)
    }

    pub fn from_parts(
        vocabulary: Vec<String>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Result<Self, ScanError> {
        if class_log_prior.len() != 2 || feature_log_prob.len() != 2 {
            return Err(ScanError::ModelUnavailable(
                "artifact must describe exactly two classes (ham, spam)".to_string(),
            ));
        }
        if feature_log_prob
            .iter()
            .any(|row| row.len() != vocabulary.len())
        {
            return Err(ScanError::ModelUnavailable(
                "feature_log_prob rows must match vocabulary length".to_string(),
            ));
        }
        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, word)| (word.clone(), i))
            .collect();
        Ok(Self {
            vocabulary,
            class_log_prior,
            feature_log_prob,
            index,
        })
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn class_log_prior(&self, class: usize) -> f64 {
        self.class_log_prior[class]
    }

    pub fn feature_log_prob(&self, class: usize, term: usize) -> f64 {
        self.feature_log_prob[class][term]
    }

    /// Log-odds contribution of a term toward spam; positive favors spam.
    pub fn influence(&self, term: usize) -> f64 {
        self.feature_log_prob[SPAM][term] - self.feature_log_prob[HAM][term]
    }

    /// Occurrence counts of in-vocabulary terms, keyed by vocabulary index
    /// so iteration follows vocabulary order.
    pub fn term_counts(&self, message: &str) -> BTreeMap<usize, usize> {
        let lowered = message.to_lowercase();
        let mut counts = BTreeMap::new();
        for token in TOKEN_REGEX.find_iter(&lowered) {
            if let Some(&term) = self.index.get(token.as_str()) {
                *counts.entry(term).or_insert(0) += 1;
            }
        }
        counts
    }
}
