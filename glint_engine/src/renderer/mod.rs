/// Renderer module - frame-level drawing on top of the resource wrappers

pub mod renderer;

pub use renderer::*;
