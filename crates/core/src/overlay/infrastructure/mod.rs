pub mod bitmap_renderer;
pub mod font;
