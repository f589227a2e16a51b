use nalgebra::*;
use super::*;
use crate::prob::*;
use crate::{Error, Result};
use log::{info, warn};
use std::ops::AddAssign;

/// Tolerance for the sum of class priors to be accepted as one.
pub const PRIOR_TOL : f64 = 1E-6;

/// Destination of the labeled observations produced while classifying a dataset.
/// Observations arrive in dataset row order.
pub trait OutputSink {

    fn record(&mut self, x : &DVector<f64>, class_id : i32);

}

/// Keeps the labeled rows in memory, so they can be persisted or plotted afterwards.
impl OutputSink for Vec<(DVector<f64>, i32)> {

    fn record(&mut self, x : &DVector<f64>, class_id : i32) {
        self.push((x.clone(), class_id));
    }

}

/// Discards all labeled rows, for when only the accuracy count is of interest.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {

    fn record(&mut self, _x : &DVector<f64>, _class_id : i32) { }

}

/// Number of correctly classified observations from a total. Reports of
/// different datasets can be summed up to yield the accuracy over all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {

    pub correct : usize,

    pub total : usize
}

impl Report {

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

}

impl AddAssign for Report {

    fn add_assign(&mut self, other : Report) {
        self.correct += other.correct;
        self.total += other.total;
    }

}

/// Selects the winning class slot from a score vector: the highest score wins, and
/// among equal scores the later slot wins.
pub fn select_class(scores : &[f64]) -> usize {
    assert!(scores.len() > 0, "select_class: empty score vector");
    let mut winner = 0;
    for (k, s) in scores.iter().enumerate() {
        if *s >= scores[winner] {
            winner = k;
        }
    }
    winner
}

/// A set of class models compared under a single discriminant function. The
/// models are borrowed: they can be re-estimated between batches, but not while
/// a batch holds them. Model order (not class id order) decides ties.
#[derive(Debug, Clone)]
pub struct Batch<'m, 'd> {

    name : String,

    dim : usize,

    discriminant : Discriminant,

    models : &'m [Gaussian<'d>]
}

impl<'m, 'd> Batch<'m, 'd> {

    /// Builds a batch, verifying that there is at least one model, that all models
    /// share the same dimensionality and that their priors sum to one.
    pub fn new(name : &str, discriminant : Discriminant, models : &'m [Gaussian<'d>]) -> Result<Self> {
        let first = models.first().ok_or(Error::NoClasses)?;
        let dim = first.dim();
        for m in models.iter() {
            if m.dim() != dim {
                return Err(Error::DimensionMismatch { expected : dim, found : m.dim() });
            }
        }
        let prior_sum : f64 = models.iter().map(|m| m.prior() ).sum();
        if (prior_sum - 1.).abs() > PRIOR_TOL {
            return Err(Error::PriorSum(prior_sum));
        }
        Ok(Self { name : name.to_string(), dim, discriminant, models })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_classes(&self) -> usize {
        self.models.len()
    }

    pub fn discriminant(&self) -> Discriminant {
        self.discriminant
    }

    pub fn models(&self) -> &'m [Gaussian<'d>] {
        self.models
    }

    /// Scores of x against every model, in slot order.
    pub fn scores(&self, x : &DVector<f64>) -> Result<Vec<f64>> {
        self.models.iter().map(|m| self.discriminant.score(x, m) ).collect()
    }

    /// Returns the slot of the class x is assigned to.
    pub fn classify_one(&self, x : &DVector<f64>) -> Result<usize> {
        let scores = self.scores(x)?;
        Ok(select_class(&scores))
    }

    /// Classifies every row of y, sending each row and its assigned class id to the
    /// sink in row order. Returns how many rows were assigned to true_id.
    pub fn classify(
        &self,
        y : DMatrixSlice<'_, f64>,
        true_id : i32,
        sink : &mut dyn OutputSink
    ) -> Result<Report> {
        if y.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        if y.ncols() != self.dim {
            return Err(Error::DimensionMismatch { expected : self.dim, found : y.ncols() });
        }
        let mut report = Report { correct : 0, total : y.nrows() };
        for row in y.row_iter() {
            let x : DVector<f64> = row.transpose();
            let winner = &self.models[self.classify_one(&x)?];
            sink.record(&x, winner.id());
            if winner.id() == true_id {
                report.correct += 1;
            }
        }
        info!(
            "{} correctly classified {} of {} ({:.4}%)",
            self.name,
            report.correct,
            report.total,
            100. * report.accuracy()
        );
        if report.correct == 0 {
            warn!("{}: no observation was assigned to class {}", self.name, true_id);
        }
        Ok(report)
    }

}
