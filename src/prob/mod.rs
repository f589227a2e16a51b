use nalgebra::*;
use std::fmt::{Debug, Display};
use crate::Result;

mod multinormal;

pub use multinormal::*;

/// Trait shared by class-conditional distributions. The distribution state is
/// defined by a location vector and a dispersion matrix, which summaries and
/// density evaluations are calculated from. Implementors evaluate a single
/// observation at a time, so the informed vector must carry as many entries as
/// the distribution has dimensions.
pub trait Distribution
    where Self : Debug + Display
{

    /// Number of features of each observation.
    fn dim(&self) -> usize;

    /// Returns the expected value of the distribution.
    fn mean(&self) -> &DVector<f64>;

    /// Returns the positive-definite covariance matrix.
    fn cov(&self) -> &DMatrix<f64>;

    /// Evaluates the probability density at the observation x.
    fn prob(&self, x : &DVector<f64>) -> Result<f64>;

    /// Evaluates the log-density at the observation x.
    fn log_prob(&self, x : &DVector<f64>) -> Result<f64> {
        self.prob(x).map(|p| p.ln() )
    }

}
