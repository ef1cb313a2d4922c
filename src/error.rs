use crate::spectral::LaplacianKind;
use thiserror::Error;

/// Errors returned by clustering algorithms in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input is empty (no points, or a zero-dimension similarity matrix).
    #[error("empty input")]
    EmptyInput,

    /// Similarity matrix is not square.
    #[error("similarity matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
    },

    /// A matrix entry is out of bounds, non-finite, or not allowed by the Laplacian.
    #[error("invalid entry at ({row}, {col}) = {value}: {reason}")]
    InvalidEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending value.
        value: f64,
        /// Why the entry was rejected.
        reason: &'static str,
    },

    /// The eigensolver needs a symmetric matrix and got an asymmetric one.
    #[error("matrix is not symmetric at ({row}, {col})")]
    NotSymmetric {
        /// Row index of the first asymmetric pair found.
        row: usize,
        /// Column index of the first asymmetric pair found.
        col: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters (or eigenvectors).
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A node with zero degree makes a normalized Laplacian undefined.
    #[error("degenerate graph: node {node} of {dimension} has zero degree ({laplacian:?} Laplacian)")]
    DegenerateGraph {
        /// The isolated node.
        node: usize,
        /// Number of nodes in the graph.
        dimension: usize,
        /// Laplacian variant that required a nonzero degree.
        laplacian: LaplacianKind,
    },

    /// The eigensolver did not converge or produced too few eigenpairs.
    #[error("numerical failure: {reason} (requested {requested} eigenpairs of a {dimension}x{dimension} {laplacian:?} Laplacian)")]
    NumericalFailure {
        /// What went wrong.
        reason: String,
        /// Number of eigenpairs requested.
        requested: usize,
        /// Matrix dimension.
        dimension: usize,
        /// Laplacian variant being solved.
        laplacian: LaplacianKind,
    },

    /// The eigenvector-count policy rejected its configuration or chose a
    /// count outside `1..=dimension`.
    #[error("eigenvector selection failed on a {dimension}x{dimension} {laplacian:?} Laplacian: {source}")]
    EigenSelection {
        /// Laplacian variant being embedded.
        laplacian: LaplacianKind,
        /// Matrix dimension.
        dimension: usize,
        /// The underlying parameter or count error.
        #[source]
        source: Box<Error>,
    },

    /// The clusterer wants, or produced, more clusters than retained eigenvectors.
    #[error("{clusters} clusters exceed the {k} retained eigenvectors of {n_items} items ({laplacian:?} Laplacian)")]
    TooManyClusters {
        /// Cluster count declared or found by the clusterer.
        clusters: usize,
        /// Embedding dimensionality (retained eigenvectors).
        k: usize,
        /// Number of embedded items.
        n_items: usize,
        /// Laplacian variant used to build the embedding.
        laplacian: LaplacianKind,
    },

    /// The downstream clusterer rejected the spectral embedding.
    #[error("clusterer rejected {k}-dimensional embedding of {n_items} items ({laplacian:?} Laplacian): {source}")]
    Clusterer {
        /// Laplacian variant used to build the embedding.
        laplacian: LaplacianKind,
        /// Embedding dimensionality (retained eigenvectors).
        k: usize,
        /// Number of embedded items.
        n_items: usize,
        /// The clusterer's own error.
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of [`Error`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed similarity matrix or data points.
    InvalidInput,
    /// Parameters incompatible with each other or with the input size.
    InvalidConfiguration,
    /// Graph structure breaks a normalization.
    DegenerateGraph,
    /// Eigensolver failure.
    NumericalFailure,
}

impl Error {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput
            | Error::NotSquare { .. }
            | Error::InvalidEntry { .. }
            | Error::NotSymmetric { .. }
            | Error::DimensionMismatch { .. } => ErrorKind::InvalidInput,
            Error::InvalidParameter { .. }
            | Error::InvalidClusterCount { .. }
            | Error::TooManyClusters { .. }
            | Error::Clusterer { .. } => ErrorKind::InvalidConfiguration,
            Error::EigenSelection { source, .. } => source.kind(),
            Error::DegenerateGraph { .. } => ErrorKind::DegenerateGraph,
            Error::NumericalFailure { .. } => ErrorKind::NumericalFailure,
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
