pub mod renderer;

pub use renderer::{cell_at, required_area, Cell, Renderer};
