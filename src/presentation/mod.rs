pub mod app_theme;
mod region_canvas;

pub use region_canvas::{RegionCanvas, RegionCanvasMessage};
