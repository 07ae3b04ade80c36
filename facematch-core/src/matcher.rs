use log::{debug, warn};
use serde::Serialize;

use crate::identity::{Identity, IdentityEmbeddings, IdentityId};
use crate::vector::{cosine_similarity, normalize, Embedding};

/// Best identity found for one detected face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub identity: IdentityId,
    /// Raw cosine similarity of the winning comparison.
    pub confidence: f32,
}

/// Matches for a detection batch, highest confidence first.
pub type MatchResult = Vec<MatchCandidate>;

/// Similarity of a normalized probe against one identity.
///
/// Legacy identities take the best of their enrollment embeddings, so one
/// close photo is enough. Returns `None` when nothing in the identity is
/// comparable with the probe.
fn identity_score(probe: &Embedding, identity: &Identity) -> Option<f32> {
    match &identity.embeddings {
        IdentityEmbeddings::Canonical(reference) => compare(probe, reference, &identity.id),
        IdentityEmbeddings::Legacy(references) => references
            .iter()
            .filter_map(|reference| compare(probe, reference, &identity.id))
            .fold(None, |best, sim| match best {
                Some(b) if b >= sim => Some(b),
                _ => Some(sim),
            }),
    }
}

fn compare(probe: &Embedding, reference: &Embedding, id: &IdentityId) -> Option<f32> {
    if reference.is_empty() {
        debug!("identity {}: skipping empty embedding", id);
        return None;
    }
    match cosine_similarity(probe, &normalize(reference)) {
        Ok(sim) if sim.is_nan() => {
            warn!("identity {}: embedding is not a number, skipping", id);
            None
        }
        Ok(sim) => Some(sim),
        Err(e) => {
            warn!("identity {}: {}", id, e);
            None
        }
    }
}

/// Find the best identity for a single detected face.
///
/// Identities are scanned in order and the current best is only replaced on
/// a strictly higher score, so on exact ties the earlier identity wins.
/// Malformed identities are skipped; they never abort the scan.
pub fn match_one(
    detected: &Embedding,
    identities: &[Identity],
    threshold: f32,
) -> Option<MatchCandidate> {
    if detected.is_empty() || identities.is_empty() {
        return None;
    }
    let probe = normalize(detected);

    let mut best: Option<(&Identity, f32)> = None;
    for identity in identities {
        let Some(score) = identity_score(&probe, identity) else {
            continue;
        };
        debug!("identity {}: similarity {:.4}", identity.id, score);

        if score.is_nan() || score < threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((identity, score)),
        }
    }

    best.map(|(identity, confidence)| MatchCandidate {
        identity: identity.id.clone(),
        confidence,
    })
}

/// Match every detected face independently.
///
/// Two faces may resolve to the same identity. The result is sorted by
/// confidence descending; the sort is stable so equal confidences keep
/// detection order.
pub fn match_all(detected: &[Embedding], identities: &[Identity], threshold: f32) -> MatchResult {
    let mut result: MatchResult = detected
        .iter()
        .filter_map(|face| match_one(face, identities, threshold))
        .collect();
    result.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    result
}
