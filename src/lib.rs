//! Spectral clustering primitives.
//!
//! `spectral-clump` clusters items from pairwise similarity scores alone: it
//! builds a graph Laplacian, embeds every item with a few extreme eigenvectors,
//! and clusters the embedded points with an ordinary spatial algorithm.
//!
//! - [`spectral`]: the similarity graph, Laplacians, eigen-selection, embedding,
//!   and the [`SpectralClustering`] pipeline
//! - [`cluster`]: spatial clusterers for the embedding (k-means, DBSCAN)
//!
//! The crate logs through `tracing` and never installs a subscriber.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod spectral;

pub use cluster::{
    Clustering, Dbscan, HardAssigner, Kmeans, KmeansFit, SpatialClusterer, SpatialClusters,
};
pub use error::{Error, ErrorKind, Result};
pub use spectral::{
    ClusterAssignment, Direction, Eigengap, FixedK, LaplacianKind, SimilarityClustering,
    SimilarityMatrix, SpectralClustering, SpectralClusters,
};
