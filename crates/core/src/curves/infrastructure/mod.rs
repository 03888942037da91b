pub mod periodic_spline_fitter;
mod skyline;
