//! This module implements walk counting kernels for directed labeled multigraphs with a
//! designated set of instance vertices, as used for machine learning over RDF-like data.
//!
//! Each kernel produces one sparse feature vector per instance vertex and the Gram matrix
//! of their pairwise dot products.
//!
//! Some references on these kernels are :
//!
//! - Substructure counting graph kernels for machine learning from RDF data.
//!     de Vries, de Rooij. Journal of Web Semantics 2015.
//!
//! - A fast approximation of the Weisfeiler-Lehman graph kernel for RDF data.
//!     de Vries. ECML-PKDD 2013.
//
// - Shervashidze-Borgwardt Weisfeiler-Lehman Graph Kernels 2011
//       the general WL relabeling framework the tree walk variants derive from.


use ndarray::Array2;

use crate::graph::dtgraph::GraphData;
use crate::kernel::vector::SparseVector;

/// Defines kernel configuration.
pub mod params;

/// The append-only label/path dictionary.
pub mod dict;

/// Sparse feature vectors.
pub mod vector;

/// Gram matrix computation and normalization.
pub mod gram;

/// The depth bounded working graph shared by the instance neighbourhoods.
pub(crate) mod workgraph;

/// The approximate frequency-pruned tree walk kernel.
pub mod treewalk;

/// The plain root walk counting kernel.
pub mod rootwalk;


/// A kernel producing one sparse feature vector per instance vertex,
/// in the order of the instance list of the [GraphData].
pub trait FeatureVectorKernel {
    ///
    fn compute_feature_vectors(&mut self, data : &GraphData) -> Result<Vec<SparseVector>, anyhow::Error>;
} // end of trait FeatureVectorKernel


/// A kernel producing the symmetric Gram matrix over the instance vertices.
pub trait GraphKernel {
    ///
    fn compute(&mut self, data : &GraphData) -> Result<Array2<f64>, anyhow::Error>;
} // end of trait GraphKernel
