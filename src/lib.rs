/// Generic trait for class-conditional probability distributions and the multivariate
/// Gaussian class model, with its exact density and the linear-algebra helpers it relies on.
pub mod prob;

/// Maximum-likelihood estimation of Gaussian class models from sample matrices.
pub mod fit;

/// Discriminant functions, the classification engine, the Bhattacharyya error bound
/// and the threshold sweep (ROC) used to calibrate density-based binary detectors.
pub mod decision;

/// Explicit-state random generators used to synthesize datasets from class models.
pub mod sim;

/// In-memory raster images and the chromaticity features derived from them.
pub mod image;

/// Plain-text persistence of sample matrices, class models, labeled outputs and ROC curves.
pub mod table;

mod error;

pub use error::*;
