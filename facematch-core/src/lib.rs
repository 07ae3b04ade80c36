//! Face embedding aggregation and identity matching.
//!
//! Everything here is a pure function of its inputs: embeddings come in from
//! a detection model, identities from a registry, and ranked matches go out.

pub mod aggregate;
pub mod error;
pub mod identity;
pub mod matcher;
pub mod session;
pub mod vector;

// Re-export commonly used types
pub use aggregate::aggregate;
pub use error::{MatchError, Result};
pub use identity::{Identity, IdentityEmbeddings, IdentityId};
pub use matcher::{match_all, match_one, MatchCandidate, MatchResult};
pub use session::{MatchReport, MatchSession, DEFAULT_THRESHOLD};
pub use vector::{cosine_similarity, normalize, Embedding};
