//! To ease access to most frequently used items
//!

pub use crate::graph::dtgraph::{DtGraph, GraphData};

pub use crate::kernel::{FeatureVectorKernel, GraphKernel};

pub use crate::kernel::params::KernelParams;
pub use crate::kernel::treewalk::TreeWalkApproxKernel;
pub use crate::kernel::rootwalk::RootWalkKernel;

pub use crate::kernel::vector::SparseVector;
pub use crate::kernel::gram::{compute_kernel_matrix, normalize_feature_vectors};
