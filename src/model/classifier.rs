use std::sync::Arc;

use crate::{
    domain::{round2, Label},
    error::ScanError,
};

use super::artifact::{ModelArtifact, HAM, SPAM};

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the predicted class as a percentage, two decimals.
    pub confidence: f64,
}

/// Thin adapter over the trained artifact: label plus predicted-class
/// probability per message.
#[derive(Clone)]
#[derive(Debug)]
pub struct SpamClassifier {
    artifact: Arc<ModelArtifact>,
}

impl SpamClassifier {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn classify(&self, messages: &[String]) -> Result<Vec<Prediction>, ScanError> {
        if messages.is_empty() {
            return Err(ScanError::Prediction(
                "cannot classify an empty message batch".to_string(),
            ));
        }
        Ok(messages
            .iter()
            .map(|message| self.classify_one(message))
            .collect())
    }

    fn classify_one(&self, message: &str) -> Prediction {
        let mut joint = [
            self.artifact.class_log_prior(HAM),
            self.artifact.class_log_prior(SPAM),
        ];
        for (term, count) in self.artifact.term_counts(message) {
            joint[HAM] += count as f64 * self.artifact.feature_log_prob(HAM, term);
            joint[SPAM] += count as f64 * self.artifact.feature_log_prob(SPAM, term);
        }

        // Normalize via log-sum-exp; equal posteriors resolve to ham, the
        // first class, as the training stack's argmax does.
        let max = joint[HAM].max(joint[SPAM]);
        let log_total = max + ((joint[HAM] - max).exp() + (joint[SPAM] - max).exp()).ln();
        let (label, log_p) = if joint[SPAM] > joint[HAM] {
            (Label::Spam, joint[SPAM])
        } else {
            (Label::Ham, joint[HAM])
        };

        Prediction {
            label,
            confidence: round2(100.0 * (log_p - log_total).exp()),
        }
    }
}
