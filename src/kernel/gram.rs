//! Gram matrix computation over the finished feature vectors.
//!
//! The matrix is dense (instances are few compared to features), the dot products
//! run over sparse vectors.


use ndarray::Array2;

use sprs::CsVecI;

use crate::kernel::vector::SparseVector;


/// computes the symmetric Gram matrix of pairwise dot products.
/// Entry (i,j) is the dot product of vectors i and j, 0 for ids absent in either.
pub fn compute_kernel_matrix(fvs : &[SparseVector]) -> Array2<f64> {
    let nb_instances = fvs.len();
    let mut gram = Array2::<f64>::zeros((nb_instances, nb_instances));
    // one common dimension so sprs accepts every pair
    let dim = 1 + fvs.iter().map(|fv| fv.get_last_index()).max().unwrap_or(0);
    let csvecs : Vec<CsVecI<f64, usize>> = fvs.iter().map(|fv| fv.as_csvec(dim)).collect();
    for i in 0..nb_instances {
        for j in 0..=i {
            let k_ij = csvecs[i].dot(&csvecs[j]);
            gram[[i, j]] = k_ij;
            gram[[j, i]] = k_ij;
        }
    }
    gram
} // end of compute_kernel_matrix


/// L2 normalization of every vector in place. After this the Gram diagonal is 1
/// for every non zero vector.
pub fn normalize_feature_vectors(fvs : &mut [SparseVector]) {
    for fv in fvs.iter_mut() {
        fv.normalize();
    }
} // end of normalize_feature_vectors


//========================================================================================


// end of mod tests
