use crate::accumulator::Accumulator;
use crate::distance::{add_in_place, divide_in_place, squared_distance};
use crate::error::{KMeansError, Result};
use log::Level;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// `labels[i]` is the cluster of observation `i` from the last assignment pass
    pub labels: Array1<usize>,
    /// Number of update passes that ran
    pub n_iterations: usize,
    /// Whether the loop stopped on the movement test rather than the iteration cap
    pub converged: bool,
}

/// Outcome of recomputing one centroid
#[derive(Debug, Clone, PartialEq)]
pub enum CentroidUpdate {
    /// The cluster had members; `centroid` is their mean and `movement` the
    /// squared distance from the previous position
    Moved { centroid: Array1<f64>, movement: f64 },
    /// Nothing was assigned to the cluster, the centroid stays where it is
    Empty,
}

impl CentroidUpdate {
    /// Squared movement of the centroid, zero for an empty cluster
    pub fn movement(&self) -> f64 {
        match self {
            CentroidUpdate::Moved { movement, .. } => *movement,
            CentroidUpdate::Empty => 0.0,
        }
    }
}

/// Index of the centroid nearest to `v`.
///
/// Ties go to the lowest index.
pub fn find_closest_centroid(v: &ArrayView1<f64>, centroids: &ArrayView2<f64>) -> usize {
    let mut best_dist = f64::INFINITY;
    let mut best_idx = 0;

    for (idx, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = squared_distance(v, &centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }

    best_idx
}

/// Drain `cluster` and compute the mean of its members.
///
/// The accumulator is always left empty. The caller owns the returned
/// centroid and is responsible for replacing its slot with it.
pub fn update_centroid(
    centroid: &ArrayView1<f64>,
    cluster: &mut Accumulator<'_>,
) -> Result<CentroidUpdate> {
    let d = cluster.dim();

    let mut buf = Vec::new();
    buf.try_reserve_exact(d)?;
    buf.resize(d, 0.0);
    let mut mean = Array1::from_vec(buf);

    let mut size = 0usize;
    while let Some(member) = cluster.pop_front() {
        add_in_place(&mut mean, &member);
        size += 1;
    }

    if size == 0 {
        return Ok(CentroidUpdate::Empty);
    }

    divide_in_place(&mut mean, size as f64);
    let movement = squared_distance(centroid, &mean.view());

    Ok(CentroidUpdate::Moved {
        centroid: mean,
        movement,
    })
}

/// Run k-means refinement starting from the given centroids.
///
/// `centroids` (K x d) is updated in place. Each pass assigns every
/// observation to its nearest centroid, then moves each centroid to the mean
/// of its members. The loop stops after a pass whose summed movement is at
/// most `tol`, or after `max_iter` passes. With `max_iter == 0` only one
/// assignment pass runs and the centroids are left untouched.
pub fn kmeans(
    observations: &ArrayView2<f64>,
    centroids: &mut Array2<f64>,
    max_iter: usize,
    tol: f64,
    verbose: bool,
) -> Result<KMeansResult> {
    let n_samples = observations.nrows();
    let n_features = observations.ncols();
    let k = centroids.nrows();

    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }

    if n_features == 0 {
        return Err(KMeansError::InvalidDimensions(
            "observations must have at least one feature".to_string(),
        ));
    }

    if centroids.ncols() != n_features {
        return Err(KMeansError::InvalidDimensions(format!(
            "Expected centroids with {} features, got {}",
            n_features,
            centroids.ncols()
        )));
    }

    let level = if verbose { Level::Info } else { Level::Debug };
    log::log!(
        level,
        "Running k-means: {} samples, {} features, {} clusters, max_iter = {}",
        n_samples,
        n_features,
        k,
        max_iter
    );

    let mut labels_buf = Vec::new();
    labels_buf.try_reserve_exact(n_samples)?;
    labels_buf.resize(n_samples, 0usize);
    let mut labels = Array1::from_vec(labels_buf);

    if max_iter == 0 {
        for (label, row) in labels.iter_mut().zip(observations.rows()) {
            *label = find_closest_centroid(&row, &centroids.view());
        }
        log::log!(level, "  max_iter is 0, returning initial assignment");
        return Ok(KMeansResult {
            labels,
            n_iterations: 0,
            converged: false,
        });
    }

    let mut clusters: Vec<Accumulator> = Vec::new();
    clusters.try_reserve_exact(k)?;
    clusters.extend((0..k).map(|_| Accumulator::new(n_features)));

    let mut n_iterations = 0;
    let mut converged = false;

    while n_iterations < max_iter {
        for cluster in clusters.iter_mut() {
            cluster.clear();
        }

        // Assignment pass
        for (i, row) in observations.rows().into_iter().enumerate() {
            let idx = find_closest_centroid(&row, &centroids.view());
            labels[i] = idx;
            clusters[idx].push(row)?;
        }

        // Update pass
        let mut movement = 0.0;
        let mut empty_clusters = 0;
        for (idx, cluster) in clusters.iter_mut().enumerate() {
            let update = update_centroid(&centroids.row(idx), cluster)?;
            movement += update.movement();
            match update {
                CentroidUpdate::Moved { centroid, .. } => {
                    centroids.row_mut(idx).assign(&centroid);
                }
                CentroidUpdate::Empty => empty_clusters += 1,
            }
        }

        n_iterations += 1;

        if empty_clusters > 0 {
            log::debug!("  {} clusters received no observations", empty_clusters);
        }
        log::log!(
            level,
            "  Iteration {}/{}: movement = {:.6}",
            n_iterations,
            max_iter,
            movement
        );

        if movement <= tol {
            converged = true;
            log::log!(
                level,
                "  Converged after {} iterations (movement {:.6} <= tol {:.6})",
                n_iterations,
                movement,
                tol
            );
            break;
        }
    }

    if !converged {
        log::log!(level, "  Stopped at iteration cap ({})", max_iter);
    }

    Ok(KMeansResult {
        labels,
        n_iterations,
        converged,
    })
}

/// Assign each row of `data` to its nearest centroid without updating anything
pub fn predict_labels(data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Array1<usize> {
    data.rows()
        .into_iter()
        .map(|row| find_closest_centroid(&row, centroids))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_find_closest_centroid() {
        let centroids = array![[0.0, 0.0], [10.0, 10.0]];

        let near_first = array![1.0, 1.0];
        let near_second = array![9.0, 8.0];
        assert_eq!(find_closest_centroid(&near_first.view(), &centroids.view()), 0);
        assert_eq!(find_closest_centroid(&near_second.view(), &centroids.view()), 1);
    }

    #[test]
    fn test_find_closest_centroid_tie_takes_lowest_index() {
        let centroids = array![[10.0, 10.0], [0.0, 0.0], [10.0, 10.0]];

        // (5,5) is equidistant from all three
        let v = array![5.0, 5.0];
        assert_eq!(find_closest_centroid(&v.view(), &centroids.view()), 0);

        let v = array![12.0, 12.0];
        assert_eq!(find_closest_centroid(&v.view(), &centroids.view()), 0);
    }

    #[test]
    fn test_find_closest_centroid_huge_distances() {
        // Distances far above i32::MAX must still replace the initial minimum
        let centroids = array![[1e12], [2e12]];
        let v = array![1.9e12];
        assert_eq!(find_closest_centroid(&v.view(), &centroids.view()), 1);
    }

    #[test]
    fn test_update_centroid_mean_and_movement() {
        let data = array![[1.0, 2.0], [3.0, 6.0]];
        let old = array![0.0, 0.0];
        let mut acc = Accumulator::new(2);
        for row in data.rows() {
            acc.push(row).unwrap();
        }

        let update = update_centroid(&old.view(), &mut acc).unwrap();
        match update {
            CentroidUpdate::Moved { centroid, movement } => {
                assert_eq!(centroid, array![2.0, 4.0]);
                assert_relative_eq!(movement, 20.0);
            }
            CentroidUpdate::Empty => panic!("Expected a moved centroid"),
        }
        assert!(acc.is_empty(), "Accumulator should be drained");
    }

    #[test]
    fn test_update_centroid_empty_cluster() {
        let old = array![3.0, 4.0];
        let mut acc = Accumulator::new(2);

        let update = update_centroid(&old.view(), &mut acc).unwrap();
        assert_eq!(update, CentroidUpdate::Empty);
        assert_eq!(update.movement(), 0.0);
    }

    #[test]
    fn test_update_centroid_zero_movement() {
        let data = array![[2.0], [4.0]];
        let old = array![3.0];
        let mut acc = Accumulator::new(1);
        acc.push(data.row(0)).unwrap();
        acc.push(data.row(1)).unwrap();

        let update = update_centroid(&old.view(), &mut acc).unwrap();
        assert!(matches!(update, CentroidUpdate::Moved { .. }));
        assert_eq!(update.movement(), 0.0);
    }

    #[test]
    fn test_kmeans_two_clusters_1d() {
        let data = array![[1.0], [2.0], [9.0], [10.0]];
        let mut centroids = array![[1.0], [9.0]];

        let result = kmeans(&data.view(), &mut centroids, 100, 0.0, false).unwrap();

        assert_eq!(result.labels.to_vec(), vec![0, 0, 1, 1]);
        assert_relative_eq!(centroids[[0, 0]], 1.5);
        assert_relative_eq!(centroids[[1, 0]], 9.5);
        // One pass moves the centroids, the second confirms nothing moved
        assert_eq!(result.n_iterations, 2);
        assert!(result.converged);
    }

    #[test]
    fn test_kmeans_max_iter_zero_keeps_centroids() {
        let data = array![[1.0], [2.0], [9.0], [10.0]];
        let mut centroids = array![[2.0], [3.0]];

        let result = kmeans(&data.view(), &mut centroids, 0, 0.0, false).unwrap();

        assert_eq!(result.labels.to_vec(), vec![0, 0, 1, 1]);
        assert_eq!(centroids, array![[2.0], [3.0]]);
        assert_eq!(result.n_iterations, 0);
        assert!(!result.converged);
    }

    #[test]
    fn test_kmeans_max_iter_one() {
        let data = array![[1.0], [2.0], [9.0], [10.0]];
        let mut centroids = array![[1.0], [9.0]];

        let result = kmeans(&data.view(), &mut centroids, 1, 0.0, false).unwrap();

        assert_eq!(result.n_iterations, 1);
        assert!(!result.converged);
        assert_relative_eq!(centroids[[0, 0]], 1.5);
        assert_relative_eq!(centroids[[1, 0]], 9.5);
    }

    #[test]
    fn test_kmeans_empty_cluster_keeps_position() {
        let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let mut centroids = array![[0.0, 0.0], [100.0, 100.0]];

        let result = kmeans(&data.view(), &mut centroids, 10, 0.0, false).unwrap();

        assert!(result.labels.iter().all(|&l| l == 0));
        assert_eq!(centroids.row(1).to_vec(), vec![100.0, 100.0]);
        assert!(centroids.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_kmeans_rejects_zero_clusters() {
        let data = array![[1.0], [2.0]];
        let mut centroids = Array2::<f64>::zeros((0, 1));

        let result = kmeans(&data.view(), &mut centroids, 10, 0.0, false);
        assert!(matches!(result, Err(KMeansError::InvalidK(_))));
    }

    #[test]
    fn test_kmeans_rejects_dimension_mismatch() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let mut centroids = array![[1.0], [3.0]];

        let result = kmeans(&data.view(), &mut centroids, 10, 0.0, false);
        assert!(matches!(result, Err(KMeansError::InvalidDimensions(_))));
    }

    #[test]
    fn test_predict_labels() {
        let data = array![[0.0, 0.0], [10.0, 10.0], [5.0, 5.0]];
        let centroids = array![[0.0, 0.0], [10.0, 10.0]];

        let labels = predict_labels(&data.view(), &centroids.view());
        assert_eq!(labels.to_vec(), vec![0, 1, 0]);
    }
}
