/// Renderer - issues clears and indexed draws on a graphics device

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use glam::Vec4;

use crate::engine_trace;
use crate::graphics_device::{ClearMask, DrawMode, GraphicsDevice};
use crate::resource::{IndexBuffer, ShaderProgram, VertexArray};

/// Renderer statistics, accumulated until `reset_stats`
///
/// Counters saturate at `u64::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Number of draw calls
    pub draw_calls: u64,
    /// Number of triangles submitted
    pub triangles: u64,
}

/// Stateless draw facade
///
/// Every `draw` binds the vertex array, index buffer and program it is given,
/// so the result never depends on what was bound before.
pub struct Renderer {
    device: Rc<dyn GraphicsDevice>,
    stats: Cell<RendererStats>,
}

impl Renderer {
    pub fn new(device: &Rc<dyn GraphicsDevice>) -> Self {
        Self {
            device: Rc::clone(device),
            stats: Cell::new(RendererStats::default()),
        }
    }

    /// Clear the color buffer with the current clear color
    pub fn clear(&self) {
        self.device.clear(ClearMask::COLOR);
    }

    pub fn set_clear_color(&self, color: Vec4) {
        self.device.set_clear_color(color.to_array());
    }

    /// Draw `index_buffer.count()` indices as a triangle list
    ///
    /// Uniforms must already be set on `program`; binding it again here does
    /// not reset them.
    pub fn draw(&self, vertex_array: &VertexArray<'_>, index_buffer: &IndexBuffer, program: &ShaderProgram) {
        program.bind();
        vertex_array.bind();
        index_buffer.bind();

        let count = index_buffer.count();
        self.device.draw_elements(DrawMode::Triangles, count, index_buffer.index_type(), 0);

        let mut stats = self.stats.get();
        stats.draw_calls = stats.draw_calls.saturating_add(1);
        stats.triangles = stats.triangles.saturating_add(u64::from(count / 3));
        self.stats.set(stats);

        engine_trace!("glint::Renderer", "Draw {} indices", count);
    }

    pub fn stats(&self) -> RendererStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(RendererStats::default());
    }

    pub fn device(&self) -> &Rc<dyn GraphicsDevice> {
        &self.device
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("stats", &self.stats.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
