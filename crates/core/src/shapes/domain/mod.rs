pub mod polygon;
pub mod shape_extractor;
