use log::{info, warn};
use serde::Serialize;

use crate::error::{MatchError, Result};
use crate::identity::Identity;
use crate::matcher::{match_all, MatchResult};
use crate::vector::Embedding;

/// Cosine similarity a match must reach unless the caller says otherwise.
pub const DEFAULT_THRESHOLD: f32 = 0.65;

/// Outcome of matching one probe image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub candidates: MatchResult,
    pub total_faces_detected: usize,
}

/// Entry point for matching a detection batch against a set of identities.
///
/// Holds only the validated threshold; every call to [`MatchSession::run`]
/// works on its own inputs, so one session can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSession {
    threshold: f32,
}

impl MatchSession {
    pub fn new(threshold: f32) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn run(&self, detections: &[Embedding], identities: &[Identity]) -> MatchReport {
        for identity in identities.iter().filter(|i| i.is_empty()) {
            warn!("identity {} has no embeddings, skipping", identity.id);
        }

        let candidates = match_all(detections, identities, self.threshold);
        info!(
            "Matched {} faces out of {} detected",
            candidates.len(),
            detections.len()
        );

        MatchReport {
            candidates,
            total_faces_detected: detections.len(),
        }
    }
}

impl Default for MatchSession {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Reject thresholds outside `[0, 1]`, NaN included.
pub fn validate_threshold(threshold: f32) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(MatchError::InvalidThreshold(threshold))
    }
}
