use crate::algorithm::{kmeans, predict_labels};
use crate::config::KMeansConfig;
use crate::error::{KMeansError, Result};
use crate::evaluation::cluster_members;
use crate::init::kmeans_plus_plus;
use ndarray::{Array1, Array2, ArrayView2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// K-means clustering model.
///
/// Centroids either come from the caller (`fit_with_centroids`) or are seeded
/// with k-means++ (`fit`). Training refines them until no centroid moves or
/// `max_iter` passes have run.
///
/// # Example
///
/// ```
/// use kmeanssp::KMeans;
/// use ndarray::array;
///
/// let data = array![[1.0], [2.0], [9.0], [10.0]];
/// let initial = array![[1.0], [9.0]];
///
/// let mut kmeans = KMeans::new(1, 2);
/// kmeans.fit_with_centroids(&data.view(), initial).unwrap();
///
/// assert_eq!(kmeans.labels().unwrap().to_vec(), vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Number of features (dimensions)
    d: usize,

    /// Trained centroids (None if not yet fitted)
    centroids: Option<Array2<f64>>,

    /// Labels of the training data from the last assignment pass
    labels: Option<Array1<usize>>,

    n_iter: usize,
    converged: bool,
}

impl KMeans {
    /// Create a new KMeans instance with default configuration.
    ///
    /// # Arguments
    ///
    /// * `d` - Number of features (dimensions) in the data
    /// * `k` - Number of clusters
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(d: usize, k: usize) -> Self {
        assert!(k > 0, "k must be greater than 0");

        Self {
            config: KMeansConfig::new(k),
            d,
            centroids: None,
            labels: None,
            n_iter: 0,
            converged: false,
        }
    }

    /// Create a new KMeans instance with custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.k` is 0.
    pub fn with_config(config: KMeansConfig) -> Self {
        assert!(config.k > 0, "k must be greater than 0");

        Self {
            d: 0, // Will be set on first fit call
            config,
            centroids: None,
            labels: None,
            n_iter: 0,
            converged: false,
        }
    }

    fn check_dimensions(&mut self, n_features: usize) -> Result<()> {
        if self.d == 0 {
            self.d = n_features;
        } else if n_features != self.d {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }
        Ok(())
    }

    /// Fit the model starting from caller-supplied centroids.
    ///
    /// # Arguments
    ///
    /// * `data` - Training data of shape (n_samples, n_features)
    /// * `initial` - Starting centroids of shape (k, n_features)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `initial` does not have exactly k rows
    /// - Data or centroid dimensions don't match the model
    /// - An accumulator or centroid buffer cannot be allocated
    pub fn fit_with_centroids(
        &mut self,
        data: &ArrayView2<f64>,
        initial: Array2<f64>,
    ) -> Result<&mut Self> {
        if initial.nrows() != self.config.k {
            return Err(KMeansError::InvalidK(format!(
                "Expected {} initial centroids, got {}",
                self.config.k,
                initial.nrows()
            )));
        }
        self.check_dimensions(data.ncols())?;

        let mut centroids = initial;
        let result = kmeans(
            data,
            &mut centroids,
            self.config.max_iter,
            self.config.tol,
            self.config.verbose,
        )?;

        self.centroids = Some(centroids);
        self.labels = Some(result.labels);
        self.n_iter = result.n_iterations;
        self.converged = result.converged;
        Ok(self)
    }

    /// Fit the model, seeding the centroids with k-means++.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Number of samples is less than k
    /// - Data dimensions don't match (for subsequent calls)
    pub fn fit(&mut self, data: &ArrayView2<f64>) -> Result<&mut Self> {
        self.check_dimensions(data.ncols())?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let initial = kmeans_plus_plus(data, self.config.k, &mut rng)?;

        self.fit_with_centroids(data, initial)
    }

    /// Fit the model and return the training labels in one call.
    pub fn fit_predict(&mut self, data: &ArrayView2<f64>) -> Result<Array1<usize>> {
        self.fit(data)?;
        self.labels.clone().ok_or(KMeansError::NotFitted)
    }

    /// Predict cluster assignments for new data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has not been fitted yet
    /// - Data dimensions don't match the training data
    pub fn predict(&self, data: &ArrayView2<f64>) -> Result<Array1<usize>> {
        let centroids = self.centroids.as_ref().ok_or(KMeansError::NotFitted)?;

        let n_features = data.ncols();
        if n_features != self.d {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        Ok(predict_labels(data, &centroids.view()))
    }

    /// Indices of the training observations in each cluster
    pub fn members(&self) -> Result<Vec<Vec<usize>>> {
        let labels = self.labels.as_ref().ok_or(KMeansError::NotFitted)?;
        cluster_members(&labels.to_vec(), self.config.k)
    }

    /// Get the centroids of the fitted model.
    pub fn centroids(&self) -> Option<&Array2<f64>> {
        self.centroids.as_ref()
    }

    /// Labels of the training data, `None` before fitting
    pub fn labels(&self) -> Option<&Array1<usize>> {
        self.labels.as_ref()
    }

    /// Number of update passes run by the last fit
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Whether the last fit stopped because the centroids settled
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the number of features (dimensions).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}
