pub mod bitmap_label_renderer;
pub mod label_renderer_factory;
pub mod overlay_painter;
pub mod truetype_label_renderer;
