pub mod contour_extractor;
