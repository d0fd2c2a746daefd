pub mod console;
pub mod render;

pub use console::*;
pub use render::*;
