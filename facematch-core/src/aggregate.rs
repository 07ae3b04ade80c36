use ndarray::Array1;

use crate::error::{MatchError, Result};
use crate::vector::{normalize, Embedding};

/// Combine several embeddings of one identity into a single representative.
///
/// Each input is normalized first so every enrollment photo carries the same
/// weight, then the element-wise mean is re-normalized: the mean of unit
/// vectors is shorter than unit length.
pub fn aggregate(embeddings: &[Embedding]) -> Result<Embedding> {
    let first = embeddings.first().ok_or(MatchError::EmptyInput)?;
    let dim = first.len();

    let mut sum = Array1::<f32>::zeros(dim);
    for embedding in embeddings {
        if embedding.len() != dim {
            return Err(MatchError::DimensionMismatch {
                expected: dim,
                got: embedding.len(),
            });
        }
        sum += &normalize(embedding).vector;
    }

    let mean = Embedding {
        vector: sum / embeddings.len() as f32,
    };
    Ok(normalize(&mean))
}
