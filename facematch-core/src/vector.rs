use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Face embedding as produced by an external recognition model.
///
/// Serialized as a plain list of numbers so registry and detection files
/// stay readable by other tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f32>", into = "Vec<f32>")]
pub struct Embedding {
    pub vector: Array1<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            vector: Array1::from_vec(values),
        }
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            vector: Array1::zeros(dim),
        }
    }

    /// Dimensionality of the embedding.
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    pub fn norm(&self) -> f32 {
        l2_norm(&self.vector)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(embedding: Embedding) -> Self {
        embedding.vector.to_vec()
    }
}

fn l2_norm_f64(v: &Array1<f32>) -> f64 {
    v.iter()
        .map(|&x| {
            let x = x as f64;
            x * x
        })
        .sum::<f64>()
        .sqrt()
}

/// Euclidean length, accumulated in f64 so very large or very small
/// components neither overflow nor flush to zero.
pub fn l2_norm(v: &Array1<f32>) -> f32 {
    l2_norm_f64(v) as f32
}

/// L2-normalize an embedding.
///
/// A zero vector has no direction and is returned unchanged.
pub fn normalize(v: &Embedding) -> Embedding {
    let norm = l2_norm_f64(&v.vector);
    if norm == 0.0 {
        return v.clone();
    }
    Embedding {
        vector: v.vector.mapv(|x| (x as f64 / norm) as f32),
    }
}

/// Cosine similarity of two embeddings of equal dimensionality.
///
/// Accumulates in f64 and returns the raw quotient; the result is not
/// clamped, so near-unit inputs may land a few ulps outside [-1, 1].
/// A zero vector has similarity 0.0 to anything.
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;

    for (&x, &y) in a.vector.iter().zip(b.vector.iter()) {
        let x = x as f64;
        let y = y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}
