use nalgebra::*;
use crate::prob::*;
use crate::{Error, Result};
use serde::{Serialize, Deserialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Scoring function g(x) evaluated for each class, where the class with the highest
/// score is the classification decision. Scores are only comparable among classes
/// scored by the same variant. The variant is chosen once for a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discriminant {

    /// g(x) = -||x - μ||². Ignores covariance and prior, which is optimal only when all
    /// classes share the same isotropic covariance and the same prior. Linear boundary.
    Euclidean,

    /// g(x) = w^T x + w0, with w = μ / s and w0 = -(μ^T μ) / 2s + ln P, where s is the
    /// square of the first covariance entry. The whole covariance is taken as a single
    /// variance shared by every feature and class. Linear boundary.
    Case1,

    /// g(x) = x^T W x + w^T x + w0 with W = -Σ^-1 / 2, w = Σ^-1 μ and
    /// w0 = -μ^T w / 2 - ln|Σ| / 2 + ln P. Arbitrary covariances; hyperquadric boundary.
    Case3
}

impl Discriminant {

    /// Scores the feature vector x against the class model.
    pub fn score(&self, x : &DVector<f64>, model : &Gaussian<'_>) -> Result<f64> {
        model.check_dim(x)?;
        match self {
            Discriminant::Euclidean => Ok(euclidean(x, model)),
            Discriminant::Case1 => case1(x, model),
            Discriminant::Case3 => case3(x, model)
        }
    }

}

fn euclidean(x : &DVector<f64>, model : &Gaussian<'_>) -> f64 {
    let diff = x - model.mean();
    -1. * diff.dot(&diff)
}

fn case1(x : &DVector<f64>, model : &Gaussian<'_>) -> Result<f64> {
    let mu = model.mean();
    let var = model.cov()[(0, 0)];
    let ss = var * var;
    if ss == 0.0 {
        return Err(Error::Singular);
    }
    let w = mu.unscale(ss);
    let w0 = (-1. / (2. * ss)) * mu.dot(mu) + model.prior().ln();
    Ok(w.dot(x) + w0)
}

fn case3(x : &DVector<f64>, model : &Gaussian<'_>) -> Result<f64> {
    let mu = model.mean();
    let (sigma_inv, sigma_det) = utils::pd_precision(model.cov())?;
    let w_quad = sigma_inv.scale(-0.5);
    let w = &sigma_inv * mu;
    let w0 = -0.5 * mu.dot(&w) - 0.5 * sigma_det.ln() + model.prior().ln();
    Ok(utils::quad_form(&w_quad, x) + w.dot(x) + w0)
}

impl Display for Discriminant {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discriminant::Euclidean => write!(f, "euclidean"),
            Discriminant::Case1 => write!(f, "case1"),
            Discriminant::Case3 => write!(f, "case3")
        }
    }

}

impl FromStr for Discriminant {

    type Err = String;

    fn from_str(s : &str) -> std::result::Result<Self, String> {
        match &s.to_lowercase()[..] {
            "euclidean" | "euclid" => Ok(Discriminant::Euclidean),
            "case1" => Ok(Discriminant::Case1),
            "case3" => Ok(Discriminant::Case3),
            other => Err(format!("Unknown discriminant: {} (expected euclidean, case1 or case3)", other))
        }
    }

}

#[cfg(test)]
mod tests {

    use super::*;

    const EPS : f64 = 1E-10;

    fn vector(v : &[f64]) -> DVector<f64> {
        DVector::from_column_slice(v)
    }

    #[test]
    fn euclidean_score() {
        let g = Gaussian::new_homoscedastic(1, vector(&[1., 2.]), 9., 0.1).unwrap();
        let s = Discriminant::Euclidean.score(&vector(&[4., 6.]), &g).unwrap();
        assert!((s + 25.).abs() < EPS);
    }

    #[test]
    fn case1_squares_variance() {
        let g = Gaussian::new_homoscedastic(1, vector(&[1., 1.]), 2., 0.5).unwrap();
        let x = vector(&[3., 1.]);
        // w = mu / 4, w0 = -(2 / 8) + ln 0.5
        let expected = (3. + 1.) / 4. - 0.25 + 0.5f64.ln();
        assert!((Discriminant::Case1.score(&x, &g).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn case3_score() {
        let g = Gaussian::new(1, vector(&[1., 0.]), DMatrix::from_row_slice(2, 2, &[2., 0., 0., 1.]), 0.4).unwrap();
        let x = vector(&[3., 1.]);
        // Quadratic discriminant equals -0.5 (x-μ)^T Σ^-1 (x-μ) - 0.5 ln|Σ| + ln P
        let expected = -0.5 * (4. / 2. + 1.) - 0.5 * 2f64.ln() + 0.4f64.ln();
        assert!((Discriminant::Case3.score(&x, &g).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn degenerate_covariance() {
        let g = Gaussian::zeroed(1, 2, 0.5).unwrap();
        let x = vector(&[0., 0.]);
        assert!(Discriminant::Case3.score(&x, &g).unwrap_err().is_numeric());
        assert!(Discriminant::Case1.score(&x, &g).unwrap_err().is_numeric());
        assert!(Discriminant::Euclidean.score(&vector(&[0.]), &g).unwrap_err().is_precondition());
    }

    #[test]
    fn negative_definite_covariance() {
        let g = Gaussian::new(1, vector(&[0., 0.]), -DMatrix::<f64>::identity(2, 2), 1.).unwrap();
        let x = vector(&[3., 3.]);
        assert_eq!(Discriminant::Case3.score(&x, &g).unwrap_err(), Error::NotPositiveDefinite(1.));
    }

    #[test]
    fn parse() {
        assert_eq!("Case3".parse::<Discriminant>().unwrap(), Discriminant::Case3);
        assert_eq!(Discriminant::Case1.to_string().parse::<Discriminant>().unwrap(), Discriminant::Case1);
        assert!("case2".parse::<Discriminant>().is_err());
    }

}
