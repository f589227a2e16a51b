use crate::prob::*;
use crate::{Error, Result};

/// Bhattacharyya distance between two normals:
/// k = (μ2-μ1)^T Σ^-1 (μ2-μ1) / 8 + ln( |Σ| / sqrt(|Σ1| |Σ2|) ) / 2, with Σ = (Σ1 + Σ2) / 2.
pub fn bhattacharyya_distance(c1 : &Gaussian<'_>, c2 : &Gaussian<'_>) -> Result<f64> {
    if c1.dim() != c2.dim() {
        return Err(Error::DimensionMismatch { expected : c1.dim(), found : c2.dim() });
    }
    let mu_diff = c2.mean() - c1.mean();
    let avg_cov = (c1.cov() + c2.cov()).scale(0.5);
    let (_, det_1) = utils::pd_precision(c1.cov())?;
    let (_, det_2) = utils::pd_precision(c2.cov())?;
    let (avg_inv, avg_det) = utils::pd_precision(&avg_cov)?;
    let k = 0.125 * utils::quad_form(&avg_inv, &mu_diff) + 0.5 * (avg_det / (det_1 * det_2).sqrt()).ln();
    Ok(k)
}

/// Upper bound on the Bayes error of deciding between the two classes:
/// sqrt(P1 P2) exp(-k), where k is the Bhattacharyya distance.
pub fn bhattacharyya_bound(c1 : &Gaussian<'_>, c2 : &Gaussian<'_>) -> Result<f64> {
    let k = bhattacharyya_distance(c1, c2)?;
    Ok((c1.prior() * c2.prior()).sqrt() * (-k).exp())
}
