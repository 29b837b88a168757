//! Basic example demonstrating kmeanssp usage
//!
//! Run with: cargo run --example basic --release

use kmeanssp::evaluation::jaccard_measure;
use kmeanssp::{KMeans, KMeansConfig};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    println!("=== kmeanssp example ===\n");

    // Generate synthetic data: 3 clusters in 2D for easy visualization
    let n_samples = 300;
    let n_features = 2;
    let n_clusters = 3;

    println!("Generating {} samples with {} features...", n_samples, n_features);

    let mut data = Array2::<f64>::zeros((n_samples, n_features));
    let mut truth = Vec::with_capacity(n_samples);

    // Cluster centers
    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];

    let noise = Array2::random((n_samples, n_features), Uniform::new(-1.0, 1.0));
    for i in 0..n_samples {
        let cluster_idx = i % 3;
        data[[i, 0]] = centers[cluster_idx][0] + noise[[i, 0]];
        data[[i, 1]] = centers[cluster_idx][1] + noise[[i, 1]];
        truth.push(cluster_idx);
    }

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    let config = KMeansConfig::new(n_clusters)
        .with_max_iter(100)
        .with_seed(42);

    println!("Running k-means with k={}...\n", n_clusters);

    let mut kmeans = KMeans::with_config(config);
    kmeans.fit(&data.view()).expect("Training failed");

    println!(
        "Stopped after {} iterations (converged: {})",
        kmeans.n_iter(),
        kmeans.converged()
    );

    println!("\nLearned centroids:");
    let centroids = kmeans.centroids().unwrap();
    for i in 0..centroids.nrows() {
        println!(
            "  Centroid {}: ({:.4}, {:.4})",
            i,
            centroids[[i, 0]],
            centroids[[i, 1]]
        );
    }
    println!();

    let members = kmeans.members().expect("Model is fitted");
    println!("Cluster distribution:");
    for (i, cluster) in members.iter().enumerate() {
        println!(
            "  Cluster {}: {} samples ({:.1}%)",
            i,
            cluster.len(),
            (cluster.len() as f64 / n_samples as f64) * 100.0
        );
    }
    println!();

    let labels = kmeans.labels().unwrap();
    let jaccard = jaccard_measure(&truth, &labels.to_vec(), n_clusters).expect("Jaccard measure");
    println!("Jaccard measure against the true clusters: {:.3}", jaccard);

    println!("\n=== Done! ===");
}
