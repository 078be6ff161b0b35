pub mod disclosure_compositor;
