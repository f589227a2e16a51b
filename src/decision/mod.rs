use crate::{Error, Result};
use serde::{Serialize, Deserialize};

/// Per-class scoring functions derived from Bayesian decision theory.
pub mod discriminant;

pub use discriminant::*;

/// Engine that assigns each observation of a dataset to its best-scoring class.
pub mod classify;

pub use classify::*;

/// Closed-form upper bound on the two-class Bayes error.
pub mod bound;

pub use bound::*;

/// Threshold sweep over a density-based binary detector and its ROC curve.
pub mod roc;

pub use roc::*;

/// Outcome counts of a binary decision process compared against a known ground truth.
/// The false positive rate is taken relative to the true negatives, and the false
/// negative rate relative to the true positives, so false_pos_rate() + true_neg_rate
/// and false_neg_rate() + true_pos_rate both sum to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRate {

    pub true_pos : usize,

    pub true_neg : usize,

    pub false_pos : usize,

    pub false_neg : usize
}

impl ErrorRate {

    /// Counts the agreement between a predicted and a reference decision vector,
    /// where true means the positive class.
    pub fn compare(predicted : &[bool], truth : &[bool]) -> Result<Self> {
        if predicted.len() != truth.len() {
            return Err(Error::DimensionMismatch { expected : truth.len(), found : predicted.len() });
        }
        let mut rate = ErrorRate::default();
        for (p, t) in predicted.iter().zip(truth.iter()) {
            match (p, t) {
                (true, true) => rate.true_pos += 1,
                (false, false) => rate.true_neg += 1,
                (true, false) => rate.false_pos += 1,
                (false, true) => rate.false_neg += 1
            }
        }
        Ok(rate)
    }

    pub fn positives(&self) -> usize {
        self.true_pos + self.false_neg
    }

    pub fn negatives(&self) -> usize {
        self.true_neg + self.false_pos
    }

    /// FP / (FP + TN). Undefined when the reference has no negatives.
    pub fn false_pos_rate(&self) -> Result<f64> {
        self.check_defined()?;
        Ok(self.false_pos as f64 / self.negatives() as f64)
    }

    /// FN / (FN + TP). Undefined when the reference has no positives.
    pub fn false_neg_rate(&self) -> Result<f64> {
        self.check_defined()?;
        Ok(self.false_neg as f64 / self.positives() as f64)
    }

    fn check_defined(&self) -> Result<()> {
        if self.positives() == 0 || self.negatives() == 0 {
            Err(Error::DegenerateTruth { positives : self.positives(), negatives : self.negatives() })
        } else {
            Ok(())
        }
    }

}
