use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Spam,
    Ham,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Spam => f.write_str("spam"),
            Label::Ham => f.write_str("ham"),
        }
    }
}

/// Signed log-odds contribution of a vocabulary term; positive favors spam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordInfluence {
    pub word: String,
    pub influence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordWeight {
    pub word: String,
    pub weight: f64,
}

/// Batch-independent vocabulary ranking derived from the model alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordStats {
    pub spam_words: Vec<WordWeight>,
    pub ham_words: Vec<WordWeight>,
}

/// Chart artifacts for one batch, each a base64-encoded PNG. Written once,
/// then served verbatim from cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationSet {
    pub pie_chart: String,
    pub confidence_histogram: String,
    pub word_influence: String,
}

const PREVIEW_CHARS: usize = 100;

pub fn preview(message: &str) -> String {
    if message.chars().count() > PREVIEW_CHARS {
        let cut: String = message.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        message.to_string()
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
