//! t-SNE into three dimensions, backed by `linfa-tsne`.
//!
//! Runs the exact (non Barnes-Hut) variant; the section sample rendered at
//! startup is small enough, and exact mode keeps seeded runs reproducible.

use linfa::traits::Transformer;
use linfa_tsne::TSneParams;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::error::{DashboardError, DashboardResult};

const OUTPUT_DIMS: usize = 3;
/// `linfa-tsne` needs `n - 1 >= 3 * perplexity` with perplexity at least 1.
const MIN_POINTS: usize = 4;

#[derive(Debug, Clone)]
pub struct TsneProjector {
    pub iterations: usize,
    /// Upper bound; clamped to `(n - 1) / 3` for small samples
    pub perplexity: f64,
    pub seed: u64,
}

impl Default for TsneProjector {
    fn default() -> Self {
        Self::new(500, 30.0)
    }
}

impl TsneProjector {
    pub fn new(iterations: usize, perplexity: f64) -> Self {
        Self {
            iterations,
            perplexity,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Perplexity actually used for `n` points
    pub fn effective_perplexity(&self, n: usize) -> f64 {
        let bound = (n.saturating_sub(1) as f64 / 3.0).max(1.0);
        self.perplexity.min(bound).max(1.0)
    }

    /// Map each vector to a 3-D point. Same input and seed give the same output.
    pub fn project(&self, vectors: &[Vec<f32>]) -> DashboardResult<Vec<[f64; 3]>> {
        let n = vectors.len();
        let Some(first) = vectors.first() else {
            return Ok(vec![]);
        };
        let dim = first.len();
        if let Some(i) = vectors.iter().position(|v| v.len() != dim) {
            return Err(DashboardError::InvalidEmbedding(format!(
                "vector {} has {} dimensions, expected {}",
                i,
                vectors[i].len(),
                dim
            )));
        }
        if n < MIN_POINTS {
            // Too few points to fit; lay them out on one axis.
            return Ok((0..n).map(|i| [i as f64, 0.0, 0.0]).collect());
        }

        let perplexity = self.effective_perplexity(n);
        info!(points = n, dim, perplexity, iterations = self.iterations, "Running t-SNE");

        // The embedding may not have more dimensions than the input.
        let width = dim.max(OUTPUT_DIMS);
        let data = Array2::from_shape_fn((n, width), |(i, j)| {
            vectors[i].get(j).copied().map(f64::from).unwrap_or(0.0)
        });

        let projected = TSneParams::<f64, StdRng>::embedding_size_with_rng(
            OUTPUT_DIMS,
            StdRng::seed_from_u64(self.seed),
        )
        .perplexity(perplexity)
        .approx_threshold(0.0)
        .max_iter(self.iterations)
        .transform(data)
        .map_err(|e| DashboardError::Projection(e.to_string()))?;

        Ok(projected
            .outer_iter()
            .map(|row| [row[0], row[1], row[2]])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters() -> Vec<Vec<f32>> {
        let mut vectors = Vec::new();
        for i in 0..6 {
            let jitter = i as f32 * 0.01;
            vectors.push(vec![0.0 + jitter, 0.0, 0.0, 0.0]);
        }
        for i in 0..6 {
            let jitter = i as f32 * 0.01;
            vectors.push(vec![10.0, 10.0 + jitter, 10.0, 10.0]);
        }
        vectors
    }

    fn dist(a: &[f64; 3], b: &[f64; 3]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
    }

    #[test]
    fn test_trivial_inputs() {
        let tsne = TsneProjector::default();
        assert!(tsne.project(&[]).unwrap().is_empty());
        assert_eq!(tsne.project(&[vec![1.0, 2.0]]).unwrap(), vec![[0.0; 3]]);
        assert_eq!(tsne.project(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap().len(), 3);
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let result = TsneProjector::default().project(&[vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(result, Err(DashboardError::InvalidEmbedding(_))));
    }

    #[test]
    fn test_perplexity_clamped_for_small_samples() {
        let tsne = TsneProjector::new(10, 30.0);
        assert_eq!(tsne.effective_perplexity(1000), 30.0);
        assert_eq!(tsne.effective_perplexity(31), 10.0);
        assert_eq!(tsne.effective_perplexity(2), 1.0);
    }

    #[test]
    fn test_low_dimensional_input_is_padded() {
        let vectors: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32, (i % 2) as f32]).collect();
        let points = TsneProjector::new(100, 30.0).project(&vectors).unwrap();
        assert_eq!(points.len(), 8);
        assert!(points.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let tsne = TsneProjector::new(150, 30.0);
        let a = tsne.project(&clusters()).unwrap();
        let b = tsne.project(&clusters()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_separated_clusters_stay_apart() {
        let points = TsneProjector::new(300, 30.0).project(&clusters()).unwrap();
        let (left, right) = points.split_at(6);

        let centroid = |pts: &[[f64; 3]]| {
            let mut c = [0.0; 3];
            for p in pts {
                for k in 0..3 {
                    c[k] += p[k] / pts.len() as f64;
                }
            }
            c
        };
        let (cl, cr) = (centroid(left), centroid(right));
        let spread = left
            .iter()
            .map(|p| dist(p, &cl))
            .chain(right.iter().map(|p| dist(p, &cr)))
            .fold(0.0, f64::max);

        assert!(dist(&cl, &cr) > spread);
    }
}
