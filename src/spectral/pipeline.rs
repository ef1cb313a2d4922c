use super::assign::{assign, ClusterAssignment};
use super::eigen::{Eigensolver, JacobiSolver};
use super::embedding::{embed, Embedding};
use super::laplacian::{Laplacian, LaplacianKind};
use super::matrix::SimilarityMatrix;
use super::selection::{EigenSelector, Eigengap, FixedK};
use crate::cluster::SpatialClusterer;
use crate::error::{Error, Result};
use tracing::debug;

/// Anything that clusters items straight from their pairwise similarities.
pub trait SimilarityClustering {
    /// One cluster label per item of `similarity`.
    fn fit_predict_similarity(&self, similarity: &SimilarityMatrix) -> Result<Vec<usize>>;
}

/// Spectral clustering: Laplacian, eigenvector embedding, spatial clustering.
///
/// Configured once and then only read, so a single instance can serve
/// concurrent [`cluster`](SpectralClustering::cluster) calls.
#[derive(Debug)]
pub struct SpectralClustering {
    laplacian: LaplacianKind,
    selector: Box<dyn EigenSelector>,
    solver: Box<dyn Eigensolver>,
    clusterer: Box<dyn SpatialClusterer>,
}

impl SpectralClustering {
    /// Cluster the embedding with `clusterer`.
    ///
    /// Defaults: unnormalized Laplacian, [`JacobiSolver`], and [`FixedK`] with
    /// the clusterer's cluster count when it has one, else [`Eigengap`] over
    /// `1..=10`.
    pub fn new<C: SpatialClusterer + 'static>(clusterer: C) -> Self {
        let selector: Box<dyn EigenSelector> = match clusterer.cluster_count_hint() {
            Some(k) => Box::new(FixedK::new(k)),
            None => Box::new(Eigengap::default()),
        };
        Self {
            laplacian: LaplacianKind::default(),
            selector,
            solver: Box::new(JacobiSolver::default()),
            clusterer: Box::new(clusterer),
        }
    }

    /// Choose the Laplacian variant.
    pub fn with_laplacian(mut self, laplacian: LaplacianKind) -> Self {
        self.laplacian = laplacian;
        self
    }

    /// Choose how many eigenvectors to keep.
    pub fn with_selection<S: EigenSelector + 'static>(mut self, selector: S) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Replace the eigensolver.
    pub fn with_solver<E: Eigensolver + 'static>(mut self, solver: E) -> Self {
        self.solver = Box::new(solver);
        self
    }

    /// Configured Laplacian variant.
    pub fn laplacian_kind(&self) -> LaplacianKind {
        self.laplacian
    }

    /// Build the configured Laplacian of `similarity`.
    pub fn laplacian(&self, similarity: &SimilarityMatrix) -> Result<Laplacian> {
        self.laplacian.build(similarity)
    }

    /// Compute only the spectral embedding.
    pub fn embed(&self, similarity: &SimilarityMatrix) -> Result<Embedding> {
        let laplacian = self.laplacian(similarity)?;
        embed(&laplacian, self.selector.as_ref(), self.solver.as_ref())
    }

    /// Run the full pipeline.
    ///
    /// The assignment never has more clusters than retained eigenvectors: a
    /// clusterer that asks for more, or that returns more (DBSCAN's noise
    /// cluster included), fails with [`Error::TooManyClusters`].
    pub fn cluster(&self, similarity: &SimilarityMatrix) -> Result<SpectralClusters> {
        let n = similarity.dim();
        debug!(n, laplacian = ?self.laplacian, "spectral clustering");

        let embedding = self.embed(similarity)?;
        let k = embedding.dim();
        let too_many = |clusters| Error::TooManyClusters {
            clusters,
            k,
            n_items: n,
            laplacian: self.laplacian,
        };
        if let Some(hint) = self.clusterer.cluster_count_hint() {
            if hint > k {
                return Err(too_many(hint));
            }
        }

        let assignment =
            assign(embedding.rows(), self.clusterer.as_ref()).map_err(|source| Error::Clusterer {
                laplacian: self.laplacian,
                k,
                n_items: n,
                source: Box::new(source),
            })?;
        debug!(n_clusters = assignment.n_clusters(), "assigned clusters");
        if assignment.n_clusters() > k {
            return Err(too_many(assignment.n_clusters()));
        }

        Ok(SpectralClusters {
            assignment,
            embedding,
        })
    }
}

impl SimilarityClustering for SpectralClustering {
    fn fit_predict_similarity(&self, similarity: &SimilarityMatrix) -> Result<Vec<usize>> {
        Ok(self.cluster(similarity)?.assignment.into_labels())
    }
}

/// Result of [`SpectralClustering::cluster`]: the assignment plus the
/// embedding it was computed from.
#[derive(Clone, Debug)]
pub struct SpectralClusters {
    assignment: ClusterAssignment,
    embedding: Embedding,
}

impl SpectralClusters {
    /// Cluster id per item.
    pub fn assignment(&self) -> &ClusterAssignment {
        &self.assignment
    }

    /// Shorthand for `assignment().labels()`.
    pub fn labels(&self) -> &[usize] {
        self.assignment.labels()
    }

    /// Embedding used for clustering.
    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Retained eigenvalues.
    pub fn eigenvalues(&self) -> &[f64] {
        self.embedding.eigenvalues()
    }

    /// Hand both parts to the caller.
    pub fn into_parts(self) -> (ClusterAssignment, Embedding) {
        (self.assignment, self.embedding)
    }
}
