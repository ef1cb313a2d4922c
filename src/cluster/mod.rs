//! Spatial clustering algorithms for dense vectors.
//!
//! These run on the spectral embedding (see [`crate::spectral`]) but work on
//! any rows of equal length.
//!
//! ## Two kinds of output
//!
//! A [`SpatialClusterer`] returns [`SpatialClusters`], which is one of:
//!
//! - **Indexed**: the algorithm labels its own training rows and has nothing
//!   else to offer. DBSCAN works this way.
//! - **Model**: the algorithm produces a geometric model (e.g. centroids) and
//!   rows are labeled by querying it through [`HardAssigner`]. K-means works
//!   this way, and the same model can label points it never saw.
//!
//! Both also implement the simpler [`Clustering`] trait, which just returns
//! labels.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, move centroids to the mean of
//! their points, repeat. Minimizes within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Spectral embeddings of well-separated graphs put each cluster near its own
//! direction on the unit sphere, which is where k-means does well.
//!
//! ### DBSCAN
//!
//! Density-based clustering that finds the number of clusters itself and
//! flags outliers.
//!
//! ## Usage
//!
//! ```rust
//! use spectral_clump::cluster::{Clustering, Dbscan, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), data.len());
//! ```

mod dbscan;
mod kmeans;
mod traits;
pub(crate) mod util;

pub use dbscan::Dbscan;
pub use kmeans::{Kmeans, KmeansFit};
pub use traits::{Clustering, HardAssigner, SpatialClusterer, SpatialClusters};
