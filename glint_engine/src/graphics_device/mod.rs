/// Graphics device module - the driver interface and its value types

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod shader;
pub mod texture;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use shader::*;
pub use texture::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;

#[cfg(test)]
#[path = "graphics_device_tests.rs"]
mod tests;
