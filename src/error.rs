use thiserror::Error;

/// Failure taxonomy for the scan pipeline. Every variant is terminal for
/// the request that produced it; nothing is retried internally.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("unsupported file type: .{extension} (expected .txt or .csv)")]
    UnsupportedFileType { extension: String },

    #[error("file content is not valid UTF-8 text")]
    Decode,

    #[error("no usable messages found in upload ({extension}, {content_length} bytes)")]
    EmptyInput {
        extension: String,
        content_length: usize,
        preview: String,
    },

    #[error("no message column found in CSV header: {headers:?}")]
    ColumnNotFound { headers: Vec<String> },

    #[error("model artifact unavailable: {0}")]
    ModelUnavailable(String),

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl ScanError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
