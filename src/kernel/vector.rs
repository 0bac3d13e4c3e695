//! Sparse feature vector accumulated by the kernels.
//!
//! A vector maps dictionary ids to counts. It carries a last_index watermark giving its
//! declared dimensionality : vectors filled at different moments of a computation stay
//! comparable after the watermark has been raised to the final dictionary size, even if
//! trailing ids were never populated for some instance.


use std::collections::HashMap;

use sprs::CsVecI;


/// sparse mapping from feature id to count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    /// non zero entries
    values : HashMap<usize, f64, ahash::RandomState>,
    /// highest id this vector declares, even if unpopulated
    last_index : usize,
} // end of struct SparseVector


impl SparseVector {

    pub fn new() -> Self {
        SparseVector{values : HashMap::default(), last_index : 0}
    }

    /// value at idx, 0 if the entry was never set
    pub fn get_value(&self, idx : usize) -> f64 {
        *self.values.get(&idx).unwrap_or(&0.)
    }

    /// sets value at idx, raising the watermark if idx is beyond it
    pub fn set_value(&mut self, idx : usize, value : f64) {
        if idx > self.last_index {
            self.last_index = idx;
        }
        self.values.insert(idx, value);
    } // end of set_value

    ///
    pub fn get_last_index(&self) -> usize {
        self.last_index
    }

    /// declares the dimensionality of the vector. Callers only ever raise it.
    pub fn set_last_index(&mut self, idx : usize) {
        self.last_index = idx;
    }

    /// number of populated entries
    pub fn nb_nonzero(&self) -> usize {
        self.values.len()
    }

    /// sum of all counts
    pub fn sum(&self) -> f64 {
        self.values.values().sum()
    }

    /// populated ids in increasing order
    pub fn get_indices(&self) -> Vec<usize> {
        let mut indices : Vec<usize> = self.values.keys().copied().collect();
        indices.sort_unstable();
        indices
    } // end of get_indices

    /// L2 norm
    pub fn l2_norm(&self) -> f64 {
        self.values.values().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// divides the vector by its L2 norm. A zero vector is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.l2_norm();
        if norm > 0. {
            for v in self.values.values_mut() {
                *v /= norm;
            }
        }
    } // end of normalize

    /// conversion to a sprs vector of dimension dim for the Gram computation.
    /// dim must be greater than every populated id.
    pub fn as_csvec(&self, dim : usize) -> CsVecI<f64, usize> {
        let indices = self.get_indices();
        let data : Vec<f64> = indices.iter().map(|idx| self.values[idx]).collect();
        CsVecI::<f64, usize>::new(dim, indices, data)
    } // end of as_csvec

} // end of impl SparseVector


//========================================================================================


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn vector_get_set() {
        let mut fv = SparseVector::new();
        assert_eq!(fv.get_value(3), 0.);
        fv.set_value(3, 2.);
        fv.set_value(0, 1.);
        assert_eq!(fv.get_value(3), 2.);
        assert_eq!(fv.get_value(0), 1.);
        assert_eq!(fv.nb_nonzero(), 2);
        assert_eq!(fv.get_indices(), vec![0, 3]);
    }

    #[test]
    fn vector_watermark_raised_by_set() {
        let mut fv = SparseVector::new();
        fv.set_value(5, 1.);
        assert_eq!(fv.get_last_index(), 5);
        // setting a lower id must not lower the watermark
        fv.set_value(2, 1.);
        assert_eq!(fv.get_last_index(), 5);
        fv.set_last_index(11);
        assert_eq!(fv.get_last_index(), 11);
    }

    #[test]
    fn vector_normalize() {
        let mut fv = SparseVector::new();
        fv.set_value(0, 3.);
        fv.set_value(7, 4.);
        assert_eq!(fv.l2_norm(), 5.);
        fv.normalize();
        assert!((fv.l2_norm() - 1.).abs() < 1.0e-12);
        // a zero vector must stay zero, not become NaN
        let mut zero = SparseVector::new();
        zero.normalize();
        assert_eq!(zero.l2_norm(), 0.);
    }

    #[test]
    fn vector_to_csvec_dot() {
        let mut fv1 = SparseVector::new();
        fv1.set_value(0, 1.);
        fv1.set_value(2, 2.);
        let mut fv2 = SparseVector::new();
        fv2.set_value(2, 3.);
        fv2.set_value(5, 1.);
        let v1 = fv1.as_csvec(6);
        let v2 = fv2.as_csvec(6);
        assert_eq!(v1.dot(&v2), 6.);
    }

} // end of mod tests
