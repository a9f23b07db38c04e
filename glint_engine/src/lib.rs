/*!
# Glint Engine

GPU resource layer for a minimal 2D renderer.

This crate wraps the raw objects of a graphics driver (shaders, programs,
buffers, vertex arrays and textures) in owning Rust types that release their
driver object when dropped. All driver access goes through the
`GraphicsDevice` trait; the OpenGL implementation lives in the
`glint_engine_device_opengl` crate.

## Architecture

- **GraphicsDevice**: driver interface, one method per driver operation
- **Shader / ShaderProgram**: compile stages, link them, set typed uniforms
- **VertexBuffer / IndexBuffer**: vertex and `u32` index storage
- **VertexLayout / VertexArray**: attribute descriptions and slot registration
- **Texture**: image decoding and RGBA8 upload
- **Renderer**: clear and indexed triangle draws

Everything is single-threaded: wrappers share the device through
`Rc<dyn GraphicsDevice>` and therefore stay on the thread owning the context.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod renderer;
pub mod resource;

// Main glint namespace module
pub mod glint {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging services
    pub use crate::engine::Engine;

    // Draw facade
    pub use crate::renderer::{Renderer, RendererStats};

    // Logging sub-module (types only, the engine_* macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
    }

    // Driver interface and its value types
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource wrappers
    pub mod resource {
        pub use crate::resource::*;
    }

    // Render sub-module
    pub mod render {
        pub use crate::renderer::*;
    }
}

// Re-export math library at crate root
pub use glam;
