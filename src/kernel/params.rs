//! Kernel Parameters
//!
//!

use anyhow::anyhow;

/// Parameters of the tree walk kernels.
#[derive(Debug, Copy, Clone)]
pub struct KernelParams {
    /// number of path growth iterations. 0 means only single label counts.
    pub path_length : usize,
    /// neighbourhood extraction radius around an instance vertex. Must be at least 1.
    pub depth : usize,
    /// frequency pruning threshold. A label or path is kept only if the number of distinct
    /// instances containing it is **strictly** greater than min_freq, else it is censored
    /// to the empty string. A negative value disables pruning.
    pub min_freq : i64,
    /// whether feature vectors are L2 normalized after the computation.
    pub normalize : bool,
} // end of KernelParams


impl KernelParams {

    pub fn new(path_length : usize, depth : usize, min_freq : i64, normalize : bool) -> Self {
        KernelParams{path_length, depth, min_freq, normalize}
    }

    ///
    pub fn get_path_length(&self) -> usize { self.path_length }

    ///
    pub fn get_depth(&self) -> usize { self.depth }

    ///
    pub fn get_min_freq(&self) -> i64 { self.min_freq }

    ///
    pub fn do_normalize(&self) -> bool { self.normalize }

    /// useful to recompute a Gram matrix from the same kernel with the other normalization
    pub fn set_normalize(&mut self, normalize : bool) { self.normalize = normalize }

    /// boundary check of the configuration, run before any extraction work begins.
    /// Negative values are unrepresentable by type, a zero depth is rejected here.
    pub fn check(&self) -> Result<(), anyhow::Error> {
        if self.depth == 0 {
            return Err(anyhow!("kernel depth must be at least 1"));
        }
        Ok(())
    } // end of check

} // end of impl KernelParams


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn params_reject_zero_depth() {
        let params = KernelParams::new(2, 0, 0, false);
        assert!(params.check().is_err());
        let params = KernelParams::new(2, 1, 0, false);
        assert!(params.check().is_ok());
    }

} // end of mod tests
