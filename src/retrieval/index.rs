use super::error::RetrievalError;

/// Exact nearest-neighbor index over a fixed vector set.
///
/// Search is a brute-force scan by squared Euclidean distance. At the corpus
/// sizes this service holds (dozens of guideline snippets) a linear scan is
/// both faster and simpler than any approximate structure, and its results
/// are exact and reproducible.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Builds an index from `vectors`.
    ///
    /// The first vector fixes the index dimension; every later vector must
    /// match it. An empty set is rejected, so a built index always has a
    /// well-defined dimension.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, RetrievalError> {
        let Some(first) = vectors.first() else {
            return Err(RetrievalError::EmptyIndex);
        };

        let dimension = first.len();
        for vector in &vectors {
            if vector.len() != dimension {
                return Err(RetrievalError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
        }

        Ok(Self { dimension, vectors })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Returns the `k` stored vectors nearest to `query`, closest first, as
    /// `(insertion position, squared L2 distance)` pairs.
    ///
    /// Ties on distance resolve to the lower position, so the ordering is a
    /// strict total order and results are deterministic. `k` must be between
    /// 1 and `len()`; anything else is `InvalidK` rather than a silent clamp.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, RetrievalError> {
        if query.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k < 1 || k > self.vectors.len() {
            return Err(RetrievalError::InvalidK {
                k,
                len: self.vectors.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|vector| squared_distance(query, vector))
            .enumerate()
            .collect();

        // Partial selection: only the k survivors need a full sort.
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, compare_hits);
            scored.truncate(k);
        }
        scored.sort_unstable_by(compare_hits);

        Ok(scored)
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn compare_hits(a: &(usize, f32), b: &(usize, f32)) -> std::cmp::Ordering {
    a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
}
