pub mod topology;

pub use topology::{draw, png_bytes, save_png};
