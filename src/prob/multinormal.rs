use nalgebra::*;
use super::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::fmt::{self, Display};
use crate::{Error, Result};

/// Multivariate normal class model parametrized by μ (px1), Σ (pxp) and the
/// class prior probability. The model may refer to the sample matrix it was
/// (or will be) trained against, but never owns it: the caller keeps the matrix
/// alive for as long as the model needs it, and the same matrix can back
/// several models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gaussian<'a> {

    /// Class label, unique among the models taking part in one classification batch.
    id : i32,

    mu : DVector<f64>,

    sigma : DMatrix<f64>,

    prior : f64,

    /// Observations over rows, features over columns.
    #[serde(skip)]
    dataset : Option<&'a DMatrix<f64>>
}

impl<'a> Gaussian<'a> {

    /// Builds a new class model from a mu vector and a covariance matrix sigma.
    /// Sigma is not verified to be positive-definite here; operations that need to
    /// invert it fail with a numeric error if it is not.
    pub fn new(id : i32, mu : DVector<f64>, sigma : DMatrix<f64>, prior : f64) -> Result<Self> {
        if sigma.nrows() != sigma.ncols() {
            return Err(Error::DimensionMismatch { expected : sigma.nrows(), found : sigma.ncols() });
        }
        if mu.nrows() != sigma.nrows() {
            return Err(Error::DimensionMismatch { expected : mu.nrows(), found : sigma.nrows() });
        }
        validate_prior(prior)?;
        Ok(Self { id, mu, sigma, prior, dataset : None })
    }

    /// Creates an untrained model, with zeroed mean and covariance, waiting
    /// for a call to the maximum-likelihood estimator.
    pub fn zeroed(id : i32, dim : usize, prior : f64) -> Result<Self> {
        Self::new(id, DVector::zeros(dim), DMatrix::zeros(dim, dim), prior)
    }

    /// Creates a model with the informed mean and identity covariance.
    pub fn new_standard(id : i32, mu : DVector<f64>, prior : f64) -> Result<Self> {
        let n = mu.nrows();
        Self::new(id, mu, DMatrix::identity(n, n), prior)
    }

    /// Creates a model with the informed mean and a diagonal covariance sharing the variance var.
    pub fn new_homoscedastic(id : i32, mu : DVector<f64>, var : f64, prior : f64) -> Result<Self> {
        let n = mu.nrows();
        let mut cov = DMatrix::zeros(n, n);
        cov.set_diagonal(&DVector::from_element(n, var));
        Self::new(id, mu, cov, prior)
    }

    /// Attaches the (borrowed) sample matrix this model is trained or tested against.
    pub fn with_dataset(mut self, dataset : &'a DMatrix<f64>) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn set_dataset(&mut self, dataset : &'a DMatrix<f64>) {
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&'a DMatrix<f64>> {
        self.dataset
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn prior(&self) -> f64 {
        self.prior
    }

    pub fn set_prior(&mut self, prior : f64) -> Result<()> {
        validate_prior(prior)?;
        self.prior = prior;
        Ok(())
    }

    /// Overwrites the location and scale in place. Both must match the current
    /// dimensionality of the model.
    pub fn set_parameters(&mut self, mu : DVector<f64>, sigma : DMatrix<f64>) -> Result<()> {
        self.check_dim(&mu)?;
        if sigma.nrows() != self.dim() || sigma.ncols() != self.dim() {
            return Err(Error::DimensionMismatch { expected : self.dim(), found : sigma.nrows().max(sigma.ncols()) });
        }
        self.mu = mu;
        self.sigma = sigma;
        Ok(())
    }

    /// Verifies the observation x carries one entry per model feature.
    pub fn check_dim(&self, x : &DVector<f64>) -> Result<()> {
        if x.nrows() != self.mu.nrows() {
            Err(Error::DimensionMismatch { expected : self.mu.nrows(), found : x.nrows() })
        } else {
            Ok(())
        }
    }

    /// Exact multivariate normal density
    /// (2π)^(-d/2) |Σ|^(-1/2) exp(-0.5 (x-μ)^T Σ^-1 (x-μ)).
    pub fn density(&self, x : &DVector<f64>) -> Result<f64> {
        self.check_dim(x)?;
        let (sigma_inv, sigma_det) = utils::pd_precision(&self.sigma)?;
        let diff = x - &self.mu;
        let q = utils::quad_form(&sigma_inv, &diff);
        Ok(normalization(self.dim(), sigma_det) * (-0.5 * q).exp())
    }

    /// Evaluates the density at each row of y, inverting the covariance only once.
    pub fn densities(&self, y : DMatrixSlice<'_, f64>) -> Result<DVector<f64>> {
        if y.ncols() != self.dim() {
            return Err(Error::DimensionMismatch { expected : self.dim(), found : y.ncols() });
        }
        let (sigma_inv, sigma_det) = utils::pd_precision(&self.sigma)?;
        let norm = normalization(self.dim(), sigma_det);
        let dens = y.row_iter().map(|row| {
            let diff = row.transpose() - &self.mu;
            norm * (-0.5 * utils::quad_form(&sigma_inv, &diff)).exp()
        });
        Ok(DVector::from_iterator(y.nrows(), dens))
    }

    /// Density value at the mode, which bounds the density from above.
    /// Useful to choose a threshold range for likelihood tests.
    pub fn peak_density(&self) -> Result<f64> {
        let (_, sigma_det) = utils::pd_precision(&self.sigma)?;
        Ok(normalization(self.dim(), sigma_det))
    }

}

fn normalization(d : usize, sigma_det : f64) -> f64 {
    1. / ((2. * PI).powf(d as f64 / 2.) * sigma_det.sqrt())
}

fn validate_prior(prior : f64) -> Result<()> {
    if prior > 0. && prior <= 1. {
        Ok(())
    } else {
        Err(Error::InvalidPrior(prior))
    }
}

impl<'a> Distribution for Gaussian<'a> {

    fn dim(&self) -> usize {
        self.mu.nrows()
    }

    fn mean(&self) -> &DVector<f64> {
        &self.mu
    }

    fn cov(&self) -> &DMatrix<f64> {
        &self.sigma
    }

    fn prob(&self, x : &DVector<f64>) -> Result<f64> {
        self.density(x)
    }

    fn log_prob(&self, x : &DVector<f64>) -> Result<f64> {
        self.check_dim(x)?;
        let (sigma_inv, sigma_det) = utils::pd_precision(&self.sigma)?;
        let diff = x - &self.mu;
        let d = self.dim() as f64;
        Ok(-0.5 * d * (2. * PI).ln() - 0.5 * sigma_det.ln() - 0.5 * utils::quad_form(&sigma_inv, &diff))
    }

}

impl<'a> Display for Gaussian<'a> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gaussian(id = {}, dim = {}, prior = {})", self.id, self.mu.nrows(), self.prior)
    }

}

pub mod utils {

    use nalgebra::*;
    use crate::{Error, Result};

    const EPS : f64 = 1E-8;

    /// Determinant from the LU decomposition with partial pivoting. The sign of the
    /// product of the U diagonal is flipped once per row permutation.
    pub fn det(m : &DMatrix<f64>) -> f64 {
        assert!(m.nrows() == m.ncols(), "det: Informed non-square matrix");
        LU::new(m.clone()).determinant()
    }

    /// Returns the inverse of m with its determinant, or a numeric error if m is singular.
    pub fn precision(m : &DMatrix<f64>) -> Result<(DMatrix<f64>, f64)> {
        if m.nrows() != m.ncols() {
            return Err(Error::DimensionMismatch { expected : m.nrows(), found : m.ncols() });
        }
        let lu = LU::new(m.clone());
        let m_det = lu.determinant();
        if m_det == 0.0 || !m_det.is_finite() {
            return Err(Error::Singular);
        }
        let m_inv = lu.try_inverse().ok_or(Error::Singular)?;
        Ok((m_inv, m_det))
    }

    /// Same as precision(.), but also rejects matrices that are not positive-definite
    /// (those without a Cholesky factor), which cannot be the covariance of a normal density.
    pub fn pd_precision(m : &DMatrix<f64>) -> Result<(DMatrix<f64>, f64)> {
        let (m_inv, m_det) = precision(m)?;
        if Cholesky::new(m.clone()).is_none() {
            return Err(Error::NotPositiveDefinite(m_det));
        }
        Ok((m_inv, m_det))
    }

    /// x^T A x
    pub fn quad_form(a : &DMatrix<f64>, x : &DVector<f64>) -> f64 {
        x.dot(&(a * x))
    }

    pub fn is_symmetric(m : &DMatrix<f64>) -> bool {
        if m.nrows() != m.ncols() {
            return false;
        }
        (m - m.transpose()).amax() < EPS
    }

}
