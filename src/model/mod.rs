pub mod artifact;
pub mod classifier;
pub mod explainer;

pub use artifact::ModelArtifact;
pub use classifier::{Prediction, SpamClassifier};
pub use explainer::Explainer;
