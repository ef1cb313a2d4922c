//! Spectral clustering over a similarity graph.
//!
//! ## Pipeline
//!
//! ```text
//! SimilarityMatrix ─▶ Laplacian ─▶ eigenpairs ─▶ Embedding ─▶ ClusterAssignment
//!                    (LaplacianKind) (Eigensolver,   (row-normalized)  (SpatialClusterer)
//!                                     EigenSelector)
//! ```
//!
//! 1. Build a graph Laplacian from the affinities ([`LaplacianKind`]).
//! 2. Solve for eigenpairs ([`Eigensolver`]) and decide how many to keep
//!    ([`EigenSelector`]), reading the spectrum from the end the Laplacian's
//!    [`Direction`] names.
//! 3. Stack the kept eigenvectors as columns; each row is an item. Rows are
//!    scaled to unit length.
//! 4. Cluster the rows with any [`SpatialClusterer`](crate::cluster::SpatialClusterer).
//!
//! When the graph has `c` connected components, an unnormalized or normalized
//! Laplacian has exactly `c` zero eigenvalues and the matching eigenvectors
//! are constant on each component, so the embedding collapses each component
//! to a single point.
//!
//! ## Usage
//!
//! ```rust
//! use spectral_clump::cluster::Kmeans;
//! use spectral_clump::spectral::{FixedK, LaplacianKind, SimilarityMatrix, SpectralClustering};
//!
//! // Two triangles with no edges between them.
//! let mut edges = Vec::new();
//! for block in [[0, 1, 2], [3, 4, 5]] {
//!     for &i in &block {
//!         for &j in &block {
//!             if i != j {
//!                 edges.push((i, j, 1.0));
//!             }
//!         }
//!     }
//! }
//! let similarity = SimilarityMatrix::from_triplets(6, 6, edges).unwrap();
//!
//! let spectral = SpectralClustering::new(Kmeans::new(2).with_seed(42))
//!     .with_laplacian(LaplacianKind::Unnormalized)
//!     .with_selection(FixedK::new(2));
//! let result = spectral.cluster(&similarity).unwrap();
//!
//! let labels = result.labels();
//! assert_eq!(labels[0], labels[1]);
//! assert_eq!(labels[3], labels[5]);
//! assert_ne!(labels[0], labels[3]);
//! assert!(result.eigenvalues().iter().all(|v| v.abs() < 1e-9));
//! ```
//!
//! ## References
//!
//! von Luxburg (2007). "A Tutorial on Spectral Clustering." Statistics and Computing.
//!
//! Ng, Jordan, Weiss (2001). "On Spectral Clustering: Analysis and an algorithm." NIPS.

mod assign;
mod eigen;
mod embedding;
mod laplacian;
mod matrix;
mod pipeline;
mod selection;

pub use assign::{assign, ClusterAssignment};
pub use eigen::{Direction, EigenPair, Eigenpairs, Eigensolver, JacobiSolver};
pub use embedding::{embed, Embedding};
pub use laplacian::{Laplacian, LaplacianKind, SymmetricForm};
pub use matrix::{CsrMatrix, SimilarityMatrix};
pub use pipeline::{SimilarityClustering, SpectralClusters, SpectralClustering};
pub use selection::{sorted_order, EigenSelector, Eigengap, FixedK};
