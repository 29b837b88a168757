//! Entry point for callers holding dynamically-typed nested lists.
//!
//! Host values are modelled as [`serde_json::Value`]. A call either yields one
//! cluster index per observation or `None`; the reason for a `None` is only
//! reported through the log.

use crate::algorithm::kmeans as run_kmeans;
use crate::error::{KMeansError, Result};
use ndarray::Array2;
use serde_json::Value;

/// Convert a host list of numbers into a vector of exactly `d` values
pub fn list_to_vector(value: &Value, d: usize) -> Result<Vec<f64>> {
    let items = value
        .as_array()
        .ok_or_else(|| KMeansError::MalformedInput(format!("expected a list, got {}", value)))?;

    if items.len() != d {
        return Err(KMeansError::MalformedInput(format!(
            "expected {} coordinates, got {}",
            d,
            items.len()
        )));
    }

    let mut vector = Vec::new();
    vector.try_reserve_exact(d)?;
    for item in items {
        let coordinate = item.as_f64().ok_or_else(|| {
            KMeansError::MalformedInput(format!("{} is not a number", item))
        })?;
        vector.push(coordinate);
    }

    Ok(vector)
}

/// Convert a host list of `rows` lists, each holding `d` numbers, into a matrix
pub fn nested_list_to_matrix(value: &Value, rows: usize, d: usize) -> Result<Array2<f64>> {
    let items = value
        .as_array()
        .ok_or_else(|| KMeansError::MalformedInput("expected a list of lists".to_string()))?;

    if items.len() != rows {
        return Err(KMeansError::MalformedInput(format!(
            "expected {} rows, got {}",
            rows,
            items.len()
        )));
    }

    // The first row vouches for `d` before the whole buffer is sized from it
    let mut converted = items.iter().map(|item| list_to_vector(item, d));
    let first = converted.next().transpose()?;

    let total = rows.checked_mul(d).ok_or_else(|| {
        KMeansError::Allocation(format!("{} x {} matrix is too large", rows, d))
    })?;
    let mut flat = Vec::new();
    flat.try_reserve_exact(total)?;
    if let Some(first) = first {
        flat.extend(first);
    }
    for row in converted {
        flat.extend(row?);
    }

    Array2::from_shape_vec((rows, d), flat)
        .map_err(|err| KMeansError::MalformedInput(err.to_string()))
}

fn matrix_from_rows(rows: &[Vec<f64>], d: usize) -> Result<Array2<f64>> {
    let total = rows.len().checked_mul(d).ok_or_else(|| {
        KMeansError::Allocation(format!("{} x {} matrix is too large", rows.len(), d))
    })?;
    let mut flat = Vec::new();
    flat.try_reserve_exact(total)?;
    for (i, row) in rows.iter().enumerate() {
        if row.len() != d {
            return Err(KMeansError::MalformedInput(format!(
                "row {} has {} coordinates, expected {}",
                i,
                row.len(),
                d
            )));
        }
        flat.extend_from_slice(row);
    }

    Array2::from_shape_vec((rows.len(), d), flat)
        .map_err(|err| KMeansError::MalformedInput(err.to_string()))
}

fn declared(value: i64, name: &str, min: i64) -> Result<usize> {
    if value < min {
        return Err(KMeansError::MalformedInput(format!(
            "{} must be at least {}, got {}",
            name, min, value
        )));
    }
    usize::try_from(value)
        .map_err(|_| KMeansError::MalformedInput(format!("{} = {} is out of range", name, value)))
}

fn report(err: &KMeansError) {
    match err {
        KMeansError::Allocation(_) => log::error!("k-means aborted: {}", err),
        _ => log::warn!("k-means rejected its input: {}", err),
    }
}

fn run(
    observations: &Value,
    centroids: &Value,
    k: i64,
    n: i64,
    d: i64,
    max_iter: i64,
) -> Result<Vec<usize>> {
    let k = declared(k, "K", 1)?;
    let n = declared(n, "N", 0)?;
    let d = declared(d, "d", 1)?;
    let max_iter = usize::try_from(max_iter.max(0)).unwrap_or(usize::MAX);

    let observations = nested_list_to_matrix(observations, n, d)?;
    let mut centroids = nested_list_to_matrix(centroids, k, d)?;

    let result = run_kmeans(&observations.view(), &mut centroids, max_iter, 0.0, false)?;
    Ok(result.labels.to_vec())
}

/// Cluster `observations` starting from `centroids`.
///
/// `observations` must be a list of `n` lists of `d` numbers and `centroids` a
/// list of `k` such lists. A negative `max_iter` is treated as 0. Returns a
/// list of `n` integers in `[0, k)`, or `None` on malformed input or
/// allocation failure.
pub fn kmeans(
    observations: &Value,
    centroids: &Value,
    k: i64,
    n: i64,
    d: i64,
    max_iter: i64,
) -> Option<Value> {
    match run(observations, centroids, k, n, d, max_iter) {
        Ok(labels) => Some(Value::Array(labels.into_iter().map(Value::from).collect())),
        Err(err) => {
            report(&err);
            None
        }
    }
}

/// Same pipeline as [`kmeans`] for callers that already hold Rust vectors.
///
/// K, N and d are taken from the inputs; every row must have the same length.
pub fn kmeans_typed(
    observations: &[Vec<f64>],
    centroids: &[Vec<f64>],
    max_iter: usize,
) -> Option<Vec<usize>> {
    let pipeline = || -> Result<Vec<usize>> {
        let d = centroids.first().map(Vec::len).ok_or_else(|| {
            KMeansError::InvalidK("at least one centroid is required".to_string())
        })?;

        let observations = matrix_from_rows(observations, d)?;
        let mut centroids = matrix_from_rows(centroids, d)?;

        let result = run_kmeans(&observations.view(), &mut centroids, max_iter, 0.0, false)?;
        Ok(result.labels.to_vec())
    };

    pipeline().map_err(|err| report(&err)).ok()
}
