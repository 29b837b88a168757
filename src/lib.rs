//! # kmeanssp
//!
//! Lloyd-style k-means clustering over observations already held in memory,
//! built on ndarray.
//!
//! ## Features
//!
//! - **Caller-seeded refinement**: start from your own centroids and iterate
//!   assignment and mean updates until no centroid moves or `max_iter` passes
//!   have run
//! - **k-means++ seeding**: deterministic, seeded initialization when no
//!   centroids are supplied
//! - **Empty-cluster safe**: a centroid that attracts no observations keeps
//!   its position
//! - **Host entry point**: [`host::kmeans`] accepts dynamically-typed nested
//!   lists and returns one cluster index per observation, or no result
//! - **Evaluation helpers**: cluster membership lists and the pair-counting
//!   Jaccard measure
//!
//! ## Example
//!
//! ```rust
//! use kmeanssp::{KMeans, KMeansConfig};
//! use ndarray::array;
//!
//! let data = array![[1.0], [2.0], [9.0], [10.0]];
//! let initial = array![[1.0], [9.0]];
//!
//! let mut kmeans = KMeans::with_config(KMeansConfig::new(2).with_max_iter(100));
//! kmeans.fit_with_centroids(&data.view(), initial).unwrap();
//!
//! assert_eq!(kmeans.labels().unwrap().to_vec(), vec![0, 0, 1, 1]);
//! assert_eq!(kmeans.centroids().unwrap(), &array![[1.5], [9.5]]);
//! ```
//!
//! ## Host-style call
//!
//! ```rust
//! use serde_json::json;
//!
//! let observations = json!([[1.0], [2.0], [9.0], [10.0]]);
//! let centroids = json!([[1.0], [9.0]]);
//!
//! let labels = kmeanssp::host::kmeans(&observations, &centroids, 2, 4, 1, 300);
//! assert_eq!(labels, Some(json!([0, 0, 1, 1])));
//!
//! // A centroid that is a bare number is rejected
//! let bad = json!([[1.0], 9.0]);
//! assert_eq!(kmeanssp::host::kmeans(&observations, &bad, 2, 4, 1, 300), None);
//! ```

mod accumulator;
mod algorithm;
mod config;
mod distance;
mod error;
pub mod evaluation;
pub mod host;
pub mod init;
mod model;

pub use accumulator::Accumulator;
pub use algorithm::{
    find_closest_centroid, kmeans, predict_labels, update_centroid, CentroidUpdate, KMeansResult,
};
pub use config::KMeansConfig;
pub use distance::{add_in_place, divide_in_place, squared_distance};
pub use error::{KMeansError, Result};
pub use model::KMeans;
