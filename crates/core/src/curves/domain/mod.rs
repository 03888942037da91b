pub mod curve_fitter;
pub mod smoothed_curve;
