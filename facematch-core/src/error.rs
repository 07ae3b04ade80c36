use thiserror::Error;

/// Errors surfaced by the matching engine.
///
/// "No match" is never an error; these only cover malformed input and
/// contract violations between collaborators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("cannot aggregate an empty set of embeddings")]
    EmptyInput,

    #[error("identity {0} has an empty embedding")]
    EmptyEmbedding(String),

    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),
}

pub type Result<T> = std::result::Result<T, MatchError>;
