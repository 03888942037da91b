use thiserror::Error;

use super::smoothed_curve::SmoothedCurve;
use crate::shapes::domain::polygon::Polygon;

/// Why a polygon produced no curve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("polygon has {found} distinct points, at least {required} are needed")]
    TooFewPoints { found: usize, required: usize },
    #[error("consecutive duplicate points at index {index}")]
    DuplicatePoints { index: usize },
    #[error("spline system is not positive definite")]
    SingularSystem,
    #[error("spline evaluation produced non-finite coordinates")]
    NonFinite,
}

/// Outcome of fitting one polygon. Callers drop `Skipped` and carry on
/// with the rest of the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FitResult {
    Fitted(SmoothedCurve),
    Skipped(SkipReason),
}

/// Domain interface for smoothing a closed polygon into a curve.
pub trait CurveFitter: Send {
    fn fit(&self, polygon: &Polygon) -> FitResult;
}
