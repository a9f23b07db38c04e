/// GPU vertex storage bound on the array-buffer target.

use std::fmt;
use std::rc::Rc;

use bytemuck::Pod;

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{BufferTarget, BufferUsage, GraphicsDevice, Handle};

pub struct VertexBuffer {
    device: Rc<dyn GraphicsDevice>,
    handle: Handle,
    size: usize,
    usage: BufferUsage,
}

impl VertexBuffer {
    /// Upload `data` into a new buffer
    ///
    /// The buffer is left bound on the array target.
    pub fn new(device: &Rc<dyn GraphicsDevice>, data: &[u8], usage: BufferUsage) -> Result<Self> {
        let handle = device.create_buffer()?;
        device.bind_buffer(BufferTarget::Array, Some(handle));
        device.buffer_data(BufferTarget::Array, data, usage);

        Ok(Self {
            device: Rc::clone(device),
            handle,
            size: data.len(),
            usage,
        })
    }

    /// Upload a slice of plain-old-data vertices (e.g. `[f32]` or a `#[repr(C)]` struct)
    pub fn from_slice<T: Pod>(device: &Rc<dyn GraphicsDevice>, vertices: &[T], usage: BufferUsage) -> Result<Self> {
        Self::new(device, bytemuck::cast_slice(vertices), usage)
    }

    /// Overwrite `data.len()` bytes starting at `offset`
    ///
    /// Binds the buffer. The write must stay inside the size given at creation.
    pub fn update(&self, offset: usize, data: &[u8]) -> Result<()> {
        let end = offset.checked_add(data.len());
        if end.map_or(true, |end| end > self.size) {
            engine_bail!(
                "glint::VertexBuffer",
                "Write of {} bytes at offset {} exceeds buffer {} of {} bytes",
                data.len(),
                offset,
                self.handle.raw(),
                self.size
            );
        }
        self.bind();
        self.device.buffer_sub_data(BufferTarget::Array, offset, data);
        Ok(())
    }

    pub fn bind(&self) {
        self.device.bind_buffer(BufferTarget::Array, Some(self.handle));
    }

    pub fn unbind(&self) {
        self.device.bind_buffer(BufferTarget::Array, None);
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl fmt::Debug for VertexBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("handle", &self.handle)
            .field("size", &self.size)
            .field("usage", &self.usage)
            .finish()
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.device.delete_buffer(self.handle);
    }
}

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;
