pub mod line_plot_renderer;
pub mod raster_canvas;
