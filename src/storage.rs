use anyhow::{Context, Result};
use facematch_core::{Embedding, Identity, IdentityEmbeddings, IdentityId};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk form of an enrolled identity.
///
/// `embedding` holds the aggregated canonical vector; `embeddings` holds one
/// raw vector per enrollment photo for registries that were never
/// aggregated. When both are present the canonical one wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: IdentityId,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub embeddings: Option<Vec<Vec<f32>>>,
}

impl IdentityRecord {
    pub fn into_identity(self) -> Option<Identity> {
        match (self.embedding, self.embeddings) {
            (Some(e), _) => Some(Identity::canonical(self.id, Embedding::new(e))),
            (None, Some(list)) => Some(Identity::legacy(
                self.id,
                list.into_iter().map(Embedding::new).collect(),
            )),
            (None, None) => None,
        }
    }
}

impl From<&Identity> for IdentityRecord {
    fn from(identity: &Identity) -> Self {
        let (embedding, embeddings) = match &identity.embeddings {
            IdentityEmbeddings::Canonical(e) => (Some(e.clone().into()), None),
            IdentityEmbeddings::Legacy(list) => {
                (None, Some(list.iter().cloned().map(Vec::<f32>::from).collect()))
            }
        };
        Self {
            id: identity.id.clone(),
            embedding,
            embeddings,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

pub fn load_records(path: &Path) -> Result<Vec<IdentityRecord>> {
    if !path.exists() {
        return Ok(vec![]);
    }

    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if is_json(path) {
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
    } else {
        postcard::from_bytes(&data).with_context(|| format!("decoding {}", path.display()))
    }
}

/// Load a registry, dropping records that carry no embedding field at all.
pub fn load_registry(path: &Path) -> Result<Vec<Identity>> {
    let records = load_records(path)?;
    Ok(records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            let identity = record.into_identity();
            if identity.is_none() {
                warn!("identity {} has no embedding data, skipping", id);
            }
            identity
        })
        .collect())
}

pub fn save_registry(path: &Path, identities: &[Identity]) -> Result<()> {
    let records: Vec<IdentityRecord> = identities.iter().map(IdentityRecord::from).collect();
    let data = if is_json(path) {
        serde_json::to_vec_pretty(&records)?
    } else {
        postcard::to_allocvec(&records)?
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Load the embeddings of one probe image: a JSON array of vectors.
pub fn load_detections(path: &Path) -> Result<Vec<Embedding>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading detections {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing detections {}", path.display()))
}
