use thiserror::Error;

/// Failures surfaced by the estimation, classification and evaluation routines.
/// Variants fall into three families: violated preconditions (the caller passed
/// malformed input), numeric degeneracy (a covariance cannot be inverted or is
/// not positive-definite) and degenerate evaluation input (a ground truth that
/// leaves the error rates undefined). None of them is recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected : usize, found : usize },

    #[error("At least {required} samples are required, but {found} were informed")]
    NotEnoughSamples { required : usize, found : usize },

    #[error("Dataset has no observations")]
    EmptyDataset,

    #[error("Model has no dataset attached")]
    MissingDataset,

    #[error("Classification batch has no class models")]
    NoClasses,

    #[error("Prior {0} outside the interval (0, 1]")]
    InvalidPrior(f64),

    #[error("Class priors sum to {0} instead of 1")]
    PriorSum(f64),

    #[error("Threshold sweep requires a positive step and at least one threshold")]
    InvalidSweep,

    #[error("Informed matrix is singular")]
    Singular,

    #[error("Informed matrix is not positive-definite (determinant {0})")]
    NotPositiveDefinite(f64),

    #[error("Ground truth has {positives} positives and {negatives} negatives; error rates are undefined")]
    DegenerateTruth { positives : usize, negatives : usize }

}

impl Error {

    /// Whether the caller violated an input precondition.
    pub fn is_precondition(&self) -> bool {
        match self {
            Error::DimensionMismatch { .. } | Error::NotEnoughSamples { .. } | Error::EmptyDataset |
            Error::MissingDataset | Error::NoClasses | Error::InvalidPrior(_) | Error::PriorSum(_) | Error::InvalidSweep => true,
            _ => false
        }
    }

    /// Whether a covariance could not be inverted or used as a density scale.
    pub fn is_numeric(&self) -> bool {
        match self {
            Error::Singular | Error::NotPositiveDefinite(_) => true,
            _ => false
        }
    }

    /// Whether an evaluation could not define its error rates.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Error::DegenerateTruth { .. } => true,
            _ => false
        }
    }

}

pub type Result<T> = std::result::Result<T, Error>;
