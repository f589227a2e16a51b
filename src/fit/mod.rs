use nalgebra::*;
use crate::prob::*;
use crate::Result;

/// Maximum-likelihood estimation of the mean and (bias-corrected) covariance.
pub mod mle;

pub use mle::*;

/// Trait shared by estimation algorithms, parametrized by the distribution they update.
/// Estimators overwrite the parameters of an existing model instead of building a new
/// one, so the model identity (class label, prior and dataset reference) survives any
/// number of re-estimations.
pub trait Estimator<D>
    where
        D : Distribution
{

    /// Runs the algorithm over the sample matrix y (observations over rows),
    /// returning a reference to the modified model.
    fn fit<'a>(&self, model : &'a mut D, y : DMatrixSlice<'_, f64>) -> Result<&'a D>;

}
