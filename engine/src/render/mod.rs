pub mod graphics;

pub use graphics::{create_graphics, Graphics};
pub use wgpu::Color;

/// The clear colour the desktop template has always started from.
pub const CORNFLOWER_BLUE: Color = Color {
    r: 100.0 / 255.0,
    g: 149.0 / 255.0,
    b: 237.0 / 255.0,
    a: 1.0,
};
