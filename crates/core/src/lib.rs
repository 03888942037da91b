pub mod curves;
pub mod pipeline;
pub mod rendering;
pub mod shapes;
pub mod shared;
pub mod video;
