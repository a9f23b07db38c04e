/// GPU index storage bound on the element-array target.
///
/// Indices are always `u32`. Every index must be smaller than the vertex
/// count of the buffers it is drawn with; this is not checked here since the
/// index buffer does not know which vertices it will be paired with.

use std::fmt;
use std::rc::Rc;

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{BufferTarget, BufferUsage, GraphicsDevice, Handle, IndexType};

pub struct IndexBuffer {
    device: Rc<dyn GraphicsDevice>,
    handle: Handle,
    count: u32,
}

impl IndexBuffer {
    /// Upload `indices` into a new buffer
    ///
    /// The buffer is left bound on the element-array target. An empty slice
    /// is accepted and yields a count of 0.
    pub fn new(device: &Rc<dyn GraphicsDevice>, indices: &[u32], usage: BufferUsage) -> Result<Self> {
        let count = match u32::try_from(indices.len()) {
            Ok(count) => count,
            Err(_) => engine_bail!(
                "glint::IndexBuffer",
                "{} indices do not fit in a single draw",
                indices.len()
            ),
        };

        let handle = device.create_buffer()?;
        device.bind_buffer(BufferTarget::ElementArray, Some(handle));
        device.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices), usage);

        Ok(Self {
            device: Rc::clone(device),
            handle,
            count,
        })
    }

    pub fn bind(&self) {
        self.device.bind_buffer(BufferTarget::ElementArray, Some(self.handle));
    }

    pub fn unbind(&self) {
        self.device.bind_buffer(BufferTarget::ElementArray, None);
    }

    /// Number of indices
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn index_type(&self) -> IndexType {
        IndexType::U32
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl fmt::Debug for IndexBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexBuffer")
            .field("handle", &self.handle)
            .field("count", &self.count)
            .finish()
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        self.device.delete_buffer(self.handle);
    }
}

#[cfg(test)]
#[path = "index_buffer_tests.rs"]
mod tests;
