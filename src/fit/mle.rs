use nalgebra::*;
use super::*;
use crate::Error;
use log::debug;

/// Maximum-likelihood estimator for Gaussian class models. The mean is the
/// arithmetic mean of the observations; the covariance uses the n-1 divisor,
/// which makes it an unbiased estimate of the population covariance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mle;

impl Mle {

    /// Arithmetic mean over the rows of y.
    pub fn sample_mean(y : DMatrixSlice<'_, f64>) -> Result<DVector<f64>> {
        if y.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        let n = y.nrows() as f64;
        let mut mu = DVector::zeros(y.ncols());
        for row in y.row_iter() {
            mu += row.transpose();
        }
        mu.unscale_mut(n);
        Ok(mu)
    }

    /// Sample covariance (1/(n-1)) C^T C, where C holds the rows of y centered at mu.
    pub fn sample_cov(y : DMatrixSlice<'_, f64>, mu : &DVector<f64>) -> Result<DMatrix<f64>> {
        if y.nrows() < 2 {
            return Err(Error::NotEnoughSamples { required : 2, found : y.nrows() });
        }
        if mu.nrows() != y.ncols() {
            return Err(Error::DimensionMismatch { expected : y.ncols(), found : mu.nrows() });
        }
        let centered = DMatrix::from_fn(y.nrows(), y.ncols(), |i, j| y[(i, j)] - mu[j] );
        let mut sigma = centered.transpose() * &centered;
        sigma.unscale_mut((y.nrows() - 1) as f64);
        Ok(sigma)
    }

    /// Returns the (mean, covariance) pair estimated from all rows of y.
    pub fn estimate(y : DMatrixSlice<'_, f64>) -> Result<(DVector<f64>, DMatrix<f64>)> {
        if y.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        let mu = Self::sample_mean(y)?;
        let sigma = Self::sample_cov(y, &mu)?;
        Ok((mu, sigma))
    }

    /// Re-estimates the model from the first n rows of the dataset it refers to.
    /// Estimating from growing prefixes of the same stored sample is how the
    /// convergence of the estimates is studied.
    pub fn fit_prefix<'a, 'd>(&self, model : &'a mut Gaussian<'d>, n : usize) -> Result<&'a Gaussian<'d>> {
        let data = model.dataset().ok_or(Error::MissingDataset)?;
        if n > data.nrows() {
            return Err(Error::NotEnoughSamples { required : n, found : data.nrows() });
        }
        self.fit(model, data.rows(0, n))
    }

}

impl<'d> Estimator<Gaussian<'d>> for Mle {

    fn fit<'a>(&self, model : &'a mut Gaussian<'d>, y : DMatrixSlice<'_, f64>) -> Result<&'a Gaussian<'d>> {
        if y.ncols() != model.dim() {
            return Err(Error::DimensionMismatch { expected : model.dim(), found : y.ncols() });
        }
        let (mu, sigma) = Self::estimate(y)?;
        debug!("MLE for class {} from {} samples: mu = {:?}", model.id(), y.nrows(), mu.as_slice());
        model.set_parameters(mu, sigma)?;
        Ok(&*model)
    }

}
