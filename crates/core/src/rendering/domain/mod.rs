pub mod canvas;
pub mod frame_renderer;
pub mod viewport;
