use nalgebra::*;
use super::*;
use crate::prob::*;
use crate::{Error, Result};
use serde::{Serialize, Deserialize};
use log::{debug, info};

/// Sequence of likelihood thresholds step, 2*step, ..., steps*step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sweep {

    pub steps : usize,

    pub step : f64
}

impl Sweep {

    pub fn new(steps : usize, step : f64) -> Result<Self> {
        let sweep = Self { steps, step };
        sweep.validate()?;
        Ok(sweep)
    }

    /// Spreads the thresholds evenly up to the peak density of the model, so the last
    /// threshold rejects every observation but the mode.
    pub fn spanning(model : &Gaussian<'_>, steps : usize) -> Result<Self> {
        if steps == 0 {
            return Err(Error::InvalidSweep);
        }
        Self::new(steps, model.peak_density()? / steps as f64)
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 || !(self.step > 0.0) || !self.step.is_finite() {
            Err(Error::InvalidSweep)
        } else {
            Ok(())
        }
    }

    pub fn thresholds(&self) -> impl Iterator<Item=f64> + '_ {
        (1..=self.steps).map(move |i| i as f64 * self.step )
    }

}

/// One operating point of a binary detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {

    pub false_pos_rate : f64,

    pub false_neg_rate : f64,

    pub threshold : f64
}

impl RocPoint {

    /// Distance from the equal-error condition FPR = FNR.
    pub fn rate_gap(&self) -> f64 {
        (self.false_pos_rate - self.false_neg_rate).abs()
    }

}

/// Result of a threshold sweep: the ROC curve in increasing threshold order, the
/// position of the equal-error-rate point and the decision mask at that point.
#[derive(Debug, Clone)]
pub struct Roc {

    pub points : Vec<RocPoint>,

    pub best : usize,

    pub mask : Vec<bool>
}

impl Roc {

    pub fn best_point(&self) -> &RocPoint {
        &self.points[self.best]
    }

    pub fn best_threshold(&self) -> f64 {
        self.points[self.best].threshold
    }

}

/// Decides positive for the rows of the density vector at or above the threshold.
pub fn threshold_mask(dens : &DVector<f64>, threshold : f64) -> Vec<bool> {
    dens.iter().map(|d| *d >= threshold ).collect()
}

/// Likelihood-threshold detector: a feature row is positive when its density under
/// the model is at least the threshold. Each threshold of the sweep is compared
/// against the truth mask, and the threshold minimizing |FPR - FNR| is selected.
/// Of equally good thresholds, the lowest one is kept.
///
/// Fails before sweeping if the truth mask lacks positives or negatives, since the
/// error rates would be undefined at every threshold.
pub fn sweep(
    model : &Gaussian<'_>,
    features : DMatrixSlice<'_, f64>,
    truth : &[bool],
    sweep : &Sweep
) -> Result<Roc> {
    sweep.validate()?;
    if features.nrows() != truth.len() {
        return Err(Error::DimensionMismatch { expected : truth.len(), found : features.nrows() });
    }
    let positives = truth.iter().filter(|t| **t ).count();
    let negatives = truth.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::DegenerateTruth { positives, negatives });
    }
    let dens = model.densities(features)?;
    let mut points = Vec::with_capacity(sweep.steps);
    let mut best = 0;
    for (i, threshold) in sweep.thresholds().enumerate() {
        let rate = ErrorRate::compare(&threshold_mask(&dens, threshold), truth)?;
        let pt = RocPoint {
            false_pos_rate : rate.false_pos_rate()?,
            false_neg_rate : rate.false_neg_rate()?,
            threshold
        };
        debug!("Threshold {}: FPR = {}, FNR = {}", threshold, pt.false_pos_rate, pt.false_neg_rate);
        if pt.rate_gap() < points.get(best).map(|p : &RocPoint| p.rate_gap() ).unwrap_or(f64::INFINITY) {
            best = i;
        }
        points.push(pt);
    }
    let mask = threshold_mask(&dens, points[best].threshold);
    info!(
        "Equal-error threshold {} (FPR = {}, FNR = {})",
        points[best].threshold,
        points[best].false_pos_rate,
        points[best].false_neg_rate
    );
    Ok(Roc { points, best, mask })
}
