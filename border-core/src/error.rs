pub type Result<T> = std::result::Result<T, BorderError>;

#[derive(Debug, thiserror::Error)]
pub enum BorderError {
    /// A shape with no points cannot be sampled.
    #[error("shape {region} has no points")]
    EmptyShape { region: String },

    #[error("unknown shape id {0}")]
    UnknownShape(usize),

    #[error("invalid pair key '{0}', expected \"i-j\"")]
    InvalidPairKey(String),

    #[error("adjacency entry {index} ({a}, {b}): {reason}")]
    InvalidAdjacency {
        index: usize,
        a: usize,
        b: usize,
        reason: &'static str,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl BorderError {
    pub(crate) fn empty(region: impl Into<String>) -> Self {
        BorderError::EmptyShape {
            region: region.into(),
        }
    }
}
