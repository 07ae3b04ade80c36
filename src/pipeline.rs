use anyhow::{Context, Result};
use facematch_core::{Identity, MatchReport, MatchSession};
use log::{info, warn};
use std::path::Path;

use crate::storage;

/// Full flow for one probe image: load detections and registry → match.
pub fn recognize(detections: &Path, registry: &Path, threshold: f32) -> Result<MatchReport> {
    let session = MatchSession::new(threshold).context("invalid match threshold")?;

    let faces = storage::load_detections(detections)?;
    let identities = storage::load_registry(registry)
        .with_context(|| format!("loading registry {}", registry.display()))?;

    info!(
        "Matching {} face(s) against {} identities (threshold: {:.3})",
        faces.len(),
        identities.len(),
        threshold
    );

    Ok(session.run(&faces, &identities))
}

/// Collapse every identity to a single aggregated embedding.
///
/// Malformed identities are dropped with a warning rather than failing the
/// whole registry.
pub fn canonicalize(identities: &[Identity]) -> Vec<Identity> {
    identities
        .iter()
        .filter_map(|identity| match identity.canonicalize() {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                warn!("identity {}: {}, dropping", identity.id, e);
                None
            }
        })
        .collect()
}

/// Rewrite a registry in canonical form. Returns how many identities were kept.
pub fn aggregate_registry(input: &Path, output: &Path) -> Result<usize> {
    let identities = storage::load_registry(input)
        .with_context(|| format!("loading registry {}", input.display()))?;
    let canonical = canonicalize(&identities);

    storage::save_registry(output, &canonical)
        .with_context(|| format!("saving registry {}", output.display()))?;

    info!(
        "Aggregated {} of {} identities into {}",
        canonical.len(),
        identities.len(),
        output.display()
    );
    Ok(canonical.len())
}
