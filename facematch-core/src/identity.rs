use std::fmt;

use log::{debug, warn};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::aggregate::aggregate;
use crate::error::{MatchError, Result};
use crate::vector::Embedding;

/// Opaque identifier handed to us by the registry.
///
/// Human-readable formats see a bare number or string; binary formats get a
/// tagged enum since they cannot guess the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityId {
    Number(i64),
    Name(String),
}

#[derive(Serialize)]
#[serde(rename = "IdentityId")]
enum TaggedIdRef<'a> {
    Number(i64),
    Name(&'a str),
}

#[derive(Deserialize)]
#[serde(rename = "IdentityId")]
enum TaggedId {
    Number(i64),
    Name(String),
}

impl Serialize for IdentityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            return match self {
                IdentityId::Number(n) => serializer.serialize_i64(*n),
                IdentityId::Name(s) => serializer.serialize_str(s),
            };
        }
        match self {
            IdentityId::Number(n) => TaggedIdRef::Number(*n),
            IdentityId::Name(s) => TaggedIdRef::Name(s),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IdentityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            return deserializer.deserialize_any(IdVisitor);
        }
        Ok(match TaggedId::deserialize(deserializer)? {
            TaggedId::Number(n) => IdentityId::Number(n),
            TaggedId::Name(s) => IdentityId::Name(s),
        })
    }
}

struct IdVisitor;

impl<'de> de::Visitor<'de> for IdVisitor {
    type Value = IdentityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string identifier")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<IdentityId, E> {
        Ok(IdentityId::Number(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<IdentityId, E> {
        i64::try_from(v)
            .map(IdentityId::Number)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<IdentityId, E> {
        Ok(IdentityId::Name(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<IdentityId, E> {
        Ok(IdentityId::Name(v))
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityId::Number(n) => write!(f, "{n}"),
            IdentityId::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for IdentityId {
    fn from(n: i64) -> Self {
        IdentityId::Number(n)
    }
}

impl From<i32> for IdentityId {
    fn from(n: i32) -> Self {
        IdentityId::Number(n.into())
    }
}

impl From<&str> for IdentityId {
    fn from(s: &str) -> Self {
        IdentityId::Name(s.to_string())
    }
}

impl From<String> for IdentityId {
    fn from(s: String) -> Self {
        IdentityId::Name(s)
    }
}

/// Reference embeddings of an enrolled identity.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityEmbeddings {
    /// One aggregated embedding, computed once at enrollment.
    Canonical(Embedding),
    /// One raw embedding per enrollment photo.
    Legacy(Vec<Embedding>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: IdentityId,
    pub embeddings: IdentityEmbeddings,
}

impl Identity {
    pub fn canonical(id: impl Into<IdentityId>, embedding: Embedding) -> Self {
        Self {
            id: id.into(),
            embeddings: IdentityEmbeddings::Canonical(embedding),
        }
    }

    pub fn legacy(id: impl Into<IdentityId>, embeddings: Vec<Embedding>) -> Self {
        Self {
            id: id.into(),
            embeddings: IdentityEmbeddings::Legacy(embeddings),
        }
    }

    /// True when there is nothing to compare against.
    pub fn is_empty(&self) -> bool {
        match &self.embeddings {
            IdentityEmbeddings::Canonical(e) => e.is_empty(),
            IdentityEmbeddings::Legacy(list) => list.iter().all(Embedding::is_empty),
        }
    }

    /// Collapse a legacy identity into its canonical form.
    ///
    /// This is what a registry should store at enrollment so matching never
    /// has to look at more than one embedding per identity. Empty embeddings
    /// are dropped, and so are embeddings whose dimension differs from the
    /// first usable one; the rest are aggregated.
    pub fn canonicalize(&self) -> Result<Identity> {
        let embedding = match &self.embeddings {
            IdentityEmbeddings::Canonical(e) if e.is_empty() => {
                return Err(MatchError::EmptyEmbedding(self.id.to_string()))
            }
            IdentityEmbeddings::Canonical(e) => e.clone(),
            IdentityEmbeddings::Legacy(list) => aggregate(&self.usable_embeddings(list))?,
        };
        Ok(Identity::canonical(self.id.clone(), embedding))
    }

    fn usable_embeddings(&self, list: &[Embedding]) -> Vec<Embedding> {
        let Some(dim) = list.iter().map(Embedding::len).find(|&len| len > 0) else {
            return vec![];
        };
        list.iter()
            .filter(|e| {
                if e.is_empty() {
                    debug!("identity {}: dropping empty embedding", self.id);
                    return false;
                }
                if e.len() != dim {
                    warn!(
                        "identity {}: dropping embedding of dimension {}, expected {}",
                        self.id,
                        e.len(),
                        dim
                    );
                    return false;
                }
                true
            })
            .cloned()
            .collect()
    }
}
