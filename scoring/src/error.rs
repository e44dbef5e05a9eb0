use thiserror::Error;

/// Input inconsistencies that make the scores of a run meaningless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("image '{predicted}' in folder '{folder}' has no ground truth row '{expected}'")]
    IdentifierMismatch {
        folder: String,
        predicted: String,
        expected: String,
    },
    #[error("class label '{label}' is not in the class vocabulary")]
    UnknownClassLabel { label: String },
    #[error("image '{image}' is not a row of the count table")]
    UnknownImage { image: String },
    #[error("image '{image}' appears more than once in the count table")]
    DuplicateImage { image: String },
    #[error("expected and predicted counts use different class vocabularies")]
    VocabularyMismatch,
}

/// A detector runtime failure on a single image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("detector failed on '{image}': {reason}")]
pub struct DetectorFailure {
    pub image: String,
    pub reason: String,
}
