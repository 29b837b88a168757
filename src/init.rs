//! k-means++ seeding.
//!
//! The first centroid is a uniformly random observation. Every further
//! centroid is drawn with probability proportional to its squared distance
//! from the nearest centroid picked so far, which spreads the seeds out.

use crate::distance::squared_distance;
use crate::error::{KMeansError, Result};
use ndarray::{Array2, ArrayView2};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

/// Pick `k` observation indices with the k-means++ scheme
pub fn kmeans_plus_plus_indices<R: Rng + ?Sized>(
    data: &ArrayView2<f64>,
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let n_samples = data.nrows();

    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }

    if n_samples < k {
        return Err(KMeansError::InsufficientData(format!(
            "Number of samples ({}) is less than k ({})",
            n_samples, k
        )));
    }

    let mut indices = Vec::new();
    indices.try_reserve_exact(k)?;
    indices.push(rng.gen_range(0..n_samples));

    let mut min_dists = Vec::new();
    min_dists.try_reserve_exact(n_samples)?;
    min_dists.resize(n_samples, f64::INFINITY);

    while indices.len() < k {
        let latest = data.row(indices[indices.len() - 1]);
        for (dist, row) in min_dists.iter_mut().zip(data.rows()) {
            *dist = dist.min(squared_distance(&row, &latest));
        }

        let weighted = if min_dists.iter().sum::<f64>().is_finite() {
            WeightedIndex::new(&min_dists)
        } else {
            WeightedIndex::new(&rescaled_weights(&min_dists)?)
        };
        let next = match weighted {
            Ok(weighted) => weighted.sample(rng),
            // Every point sits on an existing centroid
            Err(WeightedError::AllWeightsZero) => rng.gen_range(0..n_samples),
            Err(err) => {
                return Err(KMeansError::MalformedInput(format!(
                    "cannot weight observations for seeding: {}",
                    err
                )))
            }
        };
        indices.push(next);
    }

    Ok(indices)
}

/// Weights whose total overflows `f64`, brought back to a summable range.
///
/// Distances that overflowed to infinity outweigh every finite one, so when
/// any are present only those points stay candidates.
fn rescaled_weights(weights: &[f64]) -> Result<Vec<f64>> {
    let mut scaled = Vec::new();
    scaled.try_reserve_exact(weights.len())?;

    if weights.iter().any(|w| w.is_infinite()) {
        scaled.extend(
            weights
                .iter()
                .map(|w| if w.is_infinite() { 1.0 } else { 0.0 }),
        );
    } else {
        let max = weights.iter().copied().fold(0.0, f64::max);
        scaled.extend(weights.iter().map(|w| w / max));
    }
    Ok(scaled)
}

/// Build a (k, n_features) centroid matrix seeded with k-means++
pub fn kmeans_plus_plus<R: Rng + ?Sized>(
    data: &ArrayView2<f64>,
    k: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    let indices = kmeans_plus_plus_indices(data, k, rng)?;

    let mut centroids = Array2::zeros((k, data.ncols()));
    for (centroid_idx, &data_idx) in indices.iter().enumerate() {
        centroids.row_mut(centroid_idx).assign(&data.row(data_idx));
    }

    Ok(centroids)
}
