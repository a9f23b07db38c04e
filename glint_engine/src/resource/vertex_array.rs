/// Vertex array: records which buffer feeds which attribute slot.
///
/// A `VertexArray<'buf>` borrows every buffer attached to it, so the
/// buffers cannot be dropped while the array still refers to them.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::Result;
use crate::graphics_device::{AttributePointer, GraphicsDevice, Handle};
use crate::resource::{VertexBuffer, VertexLayout};
use crate::{engine_bail, engine_trace};

/// One attached buffer and the slots its layout occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexBinding {
    pub buffer: Handle,
    pub layout: VertexLayout,
    pub first_slot: u32,
}

impl VertexBinding {
    /// Slots `first_slot .. first_slot + layout.len()`
    pub fn slots(&self) -> std::ops::Range<u32> {
        self.first_slot..self.first_slot + self.layout.len() as u32
    }
}

pub struct VertexArray<'buf> {
    device: Rc<dyn GraphicsDevice>,
    handle: Handle,
    bindings: Vec<VertexBinding>,
    _buffers: PhantomData<&'buf VertexBuffer>,
}

impl<'buf> VertexArray<'buf> {
    pub fn new(device: &Rc<dyn GraphicsDevice>) -> Result<Self> {
        let handle = device.create_vertex_array()?;
        Ok(Self {
            device: Rc::clone(device),
            handle,
            bindings: Vec::new(),
            _buffers: PhantomData,
        })
    }

    /// Attach `buffer` described by `layout` after the highest slot in use
    ///
    /// Returns the first slot assigned. The first attach starts at slot 0.
    pub fn attach(&mut self, buffer: &'buf VertexBuffer, layout: &VertexLayout) -> Result<u32> {
        let first_slot = self.next_free_slot();
        self.attach_at(buffer, layout, first_slot)?;
        Ok(first_slot)
    }

    /// Attach `buffer` with attribute `i` of `layout` on slot `first_slot + i`
    ///
    /// Leaves both the array and the buffer bound.
    pub fn attach_at(&mut self, buffer: &'buf VertexBuffer, layout: &VertexLayout, first_slot: u32) -> Result<()> {
        if layout.is_empty() {
            engine_bail!("glint::VertexArray", "Cannot attach buffer {} with an empty layout", buffer.handle().raw());
        }

        let max_slots = self.device.max_vertex_attributes();
        let end = u32::try_from(layout.len())
            .ok()
            .and_then(|len| first_slot.checked_add(len));
        let end = match end {
            Some(end) if end <= max_slots => end,
            _ => engine_bail!(
                "glint::VertexArray",
                "Slots {}..{} exceed the device limit of {} vertex attributes",
                first_slot,
                first_slot as u64 + layout.len() as u64,
                max_slots
            ),
        };

        if let Some(taken) = self
            .bindings
            .iter()
            .find(|b| b.slots().start < end && first_slot < b.slots().end)
        {
            engine_bail!(
                "glint::VertexArray",
                "Slots {}..{} overlap slots {}..{} already registered for buffer {}",
                first_slot,
                end,
                taken.slots().start,
                taken.slots().end,
                taken.buffer.raw()
            );
        }

        self.bind();
        buffer.bind();
        for (slot, attribute) in (first_slot..end).zip(layout.attributes()) {
            self.device.enable_vertex_attribute(slot);
            self.device.vertex_attribute_pointer(slot, &AttributePointer {
                component_count: attribute.component_count,
                component_type: attribute.component_type,
                normalized: attribute.normalized,
                stride: layout.stride(),
                offset: attribute.offset,
            });
        }

        engine_trace!(
            "glint::VertexArray",
            "Vertex array {}: buffer {} on slots {}..{} (stride {})",
            self.handle.raw(),
            buffer.handle().raw(),
            first_slot,
            end,
            layout.stride()
        );

        self.bindings.push(VertexBinding {
            buffer: buffer.handle(),
            layout: layout.clone(),
            first_slot,
        });
        Ok(())
    }

    fn next_free_slot(&self) -> u32 {
        self.bindings.iter().map(|b| b.slots().end).max().unwrap_or(0)
    }

    pub fn bindings(&self) -> &[VertexBinding] {
        &self.bindings
    }

    pub fn bind(&self) {
        self.device.bind_vertex_array(Some(self.handle));
    }

    pub fn unbind(&self) {
        self.device.bind_vertex_array(None);
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl fmt::Debug for VertexArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexArray")
            .field("handle", &self.handle)
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl Drop for VertexArray<'_> {
    fn drop(&mut self) {
        self.device.delete_vertex_array(self.handle);
    }
}

#[cfg(test)]
#[path = "vertex_array_tests.rs"]
mod tests;
