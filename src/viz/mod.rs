//! Visualization engine: a recording 2D canvas plus the per-type rendering
//! algorithms that map solution data into geometry.

pub mod canvas;
pub mod render;

pub use canvas::Canvas;
pub use render::{default_canvas_size, render};
