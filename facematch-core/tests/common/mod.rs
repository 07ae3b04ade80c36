#![allow(dead_code)]

use facematch_core::{normalize, Embedding};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DIM: usize = 512;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Raw model-style embedding, not normalized.
pub fn random_embedding(rng: &mut StdRng) -> Embedding {
    Embedding::new((0..DIM).map(|_| rng.gen_range(-2.0f32..2.0)).collect())
}

/// An embedding whose cosine similarity to `base` is `sim`.
pub fn with_similarity(base: &Embedding, sim: f32, rng: &mut StdRng) -> Embedding {
    let u = normalize(base).vector;
    let r = random_embedding(rng).vector;
    // Gram-Schmidt: remove the component along u.
    let w: Array1<f32> = &r - &(&u * u.dot(&r));
    let w = &w / w.dot(&w).sqrt();
    let v = &u * sim + &w * (1.0 - sim * sim).sqrt();
    // Scale to look like an unnormalized model output.
    Embedding { vector: v * 7.5f32 }
}

/// Noisy copy of `base`, as another photo of the same face would be.
pub fn jitter(base: &Embedding, amount: f32, rng: &mut StdRng) -> Embedding {
    Embedding {
        vector: base.vector.mapv(|x| x + rng.gen_range(-amount..amount)),
    }
}
