pub mod config;
pub mod pipeline;
pub mod storage;

// Re-export engine types for convenience
pub use facematch_core::{
    Embedding, Identity, IdentityId, MatchCandidate, MatchError, MatchReport, MatchSession,
};
