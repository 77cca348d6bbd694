use std::{cmp::Ordering, sync::Arc};

use crate::domain::{WordInfluence, WordStats, WordWeight};

use super::artifact::ModelArtifact;

/// Per-message influence lists keep only this many terms.
pub const MESSAGE_INFLUENCE_LIMIT: usize = 20;
/// Aggregate vocabulary rankings expose this many terms per class.
pub const VOCABULARY_STATS_LIMIT: usize = 50;

/// Deterministic explanation scoring over the trained artifact: which
/// vocabulary terms pushed a message toward spam or ham.
#[derive(Clone)]
#[derive(Debug)]
pub struct Explainer {
    artifact: Arc<ModelArtifact>,
}

impl Explainer {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    /// Influences for the distinct in-vocabulary terms of one message,
    /// strongest absolute influence first. Ties keep vocabulary order
    /// (stable sort over an already vocabulary-ordered list). A message
    /// with no vocabulary overlap yields an empty list.
    pub fn explain(&self, message: &str) -> Vec<WordInfluence> {
        let mut influences: Vec<WordInfluence> = self
            .artifact
            .term_counts(message)
            .keys()
            .map(|&term| WordInfluence {
                word: self.artifact.vocabulary()[term].clone(),
                influence: self.artifact.influence(term),
            })
            .collect();
        influences.sort_by(|a, b| {
            b.influence
                .abs()
                .partial_cmp(&a.influence.abs())
                .unwrap_or(Ordering::Equal)
        });
        influences.truncate(MESSAGE_INFLUENCE_LIMIT);
        influences
    }

    /// Batch-independent ranking of the whole vocabulary: top spam terms by
    /// descending influence, top ham terms by ascending influence with the
    /// weight stored as its absolute value.
    pub fn aggregate_vocabulary(&self) -> WordStats {
        let vocabulary = self.artifact.vocabulary();
        let mut ranked: Vec<(usize, f64)> = (0..vocabulary.len())
            .map(|term| (term, self.artifact.influence(term)))
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let spam_words = ranked
            .iter()
            .take(VOCABULARY_STATS_LIMIT)
            .map(|&(term, weight)| WordWeight {
                word: vocabulary[term].clone(),
                weight,
            })
            .collect();

        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        let ham_words = ranked
            .iter()
            .take(VOCABULARY_STATS_LIMIT)
            .map(|&(term, weight)| WordWeight {
                word: vocabulary[term].clone(),
                weight: weight.abs(),
            })
            .collect();

        WordStats {
            spam_words,
            ham_words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explainer() -> Explainer {
        let artifact = ModelArtifact::from_parts(
            vec!["cash".into(), "lunch".into(), "noon".into(), "win".into()],
            vec![0.5f64.ln(), 0.5f64.ln()],
            vec![
                vec![0.05f64.ln(), 0.45f64.ln(), 0.45f64.ln(), 0.05f64.ln()],
                vec![0.4f64.ln(), 0.1f64.ln(), 0.1f64.ln(), 0.4f64.ln()],
            ],
        )
        .unwrap();
        Explainer::new(Arc::new(artifact))
    }

    /// 60 terms with strictly increasing spam influence.
    fn wide_explainer() -> Explainer {
        let vocabulary: Vec<String> = (0..60).map(|i| format!("term{i:02}")).collect();
        let ham: Vec<f64> = vec![-3.0; 60];
        let spam: Vec<f64> = (0..60).map(|i| -3.0 + 0.1 * (i as f64 + 1.0)).collect();
        let artifact = ModelArtifact::from_parts(
            vocabulary,
            vec![0.5f64.ln(), 0.5f64.ln()],
            vec![ham, spam],
        )
        .unwrap();
        Explainer::new(Arc::new(artifact))
    }

    #[test]
    fn explain_sorts_by_absolute_influence_with_stable_ties() {
        let influences = explainer().explain("win cash before lunch");
        let words: Vec<&str> = influences.iter().map(|wi| wi.word.as_str()).collect();
        // cash and win tie at |ln 8|; cash comes first in the vocabulary.
        assert_eq!(words, vec!["cash", "win", "lunch"]);
        assert!(influences[0].influence > 0.0);
        assert!(influences[2].influence < 0.0);
    }

    #[test]
    fn explain_is_empty_for_unknown_vocabulary() {
        assert!(explainer().explain("completely unrelated words").is_empty());
    }

    #[test]
    fn explain_truncates_to_twenty_terms() {
        let message: String = (0..60)
            .map(|i| format!("term{i:02}"))
            .collect::<Vec<_>>()
            .join(" ");
        let influences = wide_explainer().explain(&message);
        assert_eq!(influences.len(), MESSAGE_INFLUENCE_LIMIT);
        // Strongest influence (term59) leads; the weakest fall off.
        assert_eq!(influences[0].word, "term59");
        assert!(influences.iter().all(|wi| wi.word != "term00"));
    }

    #[test]
    fn aggregate_ranks_spam_descending_and_ham_ascending() {
        let stats = explainer().aggregate_vocabulary();
        let spam: Vec<&str> = stats.spam_words.iter().map(|w| w.word.as_str()).collect();
        let ham: Vec<&str> = stats.ham_words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(spam, vec!["cash", "win", "lunch", "noon"]);
        assert_eq!(ham, vec!["lunch", "noon", "cash", "win"]);
        assert!(stats.ham_words[0].weight > 0.0);
    }

    #[test]
    fn aggregate_caps_each_list_at_fifty() {
        let stats = wide_explainer().aggregate_vocabulary();
        assert_eq!(stats.spam_words.len(), VOCABULARY_STATS_LIMIT);
        assert_eq!(stats.ham_words.len(), VOCABULARY_STATS_LIMIT);
    }
}
