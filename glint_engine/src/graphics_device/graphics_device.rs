/// GraphicsDevice trait - the seam between the resource wrappers and the driver

use std::num::NonZeroU32;
use bitflags::bitflags;

use crate::error::Result;
use crate::graphics_device::{
    AttributePointer, BufferTarget, BufferUsage, IndexType, ShaderStage, TextureParams,
    UniformValue,
};

// ============================================================================
// Common types
// ============================================================================

/// Opaque driver-issued object name
///
/// Zero is reserved by the driver for "no object", so a `Handle` is never
/// zero and `Option<Handle>` is the same size as a raw `u32`. The type is
/// `Copy` so it can be passed to driver calls; ownership of the underlying
/// object belongs to exactly one resource wrapper, which releases it on drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(NonZeroU32);

impl Handle {
    /// Wrap a raw object name; returns None for 0
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Handle)
    }

    /// Raw object name
    pub fn raw(&self) -> u32 {
        self.0.get()
    }

    /// Non-zero object name, as expected by native bindings
    pub fn get(&self) -> NonZeroU32 {
        self.0
    }
}

impl From<NonZeroU32> for Handle {
    fn from(raw: NonZeroU32) -> Self {
        Handle(raw)
    }
}

bitflags! {
    /// Framebuffer planes cleared by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 0b001;
        const DEPTH = 0b010;
        const STENCIL = 0b100;
    }
}

/// Primitive assembly mode for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    Lines,
    Points,
}

/// Device configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Forward driver debug messages (GL_DEBUG_OUTPUT) to the engine logger
    pub enable_debug_output: bool,
    /// Initial clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enable_debug_output: cfg!(debug_assertions),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Driver interface
///
/// Every call operates on the context that is current on the calling thread.
/// Calls that act on "the bound object" of a target affect whatever was last
/// bound there; callers establish bindings explicitly before such calls.
pub trait GraphicsDevice {
    // ===== SHADERS =====

    /// Allocate a shader object for `stage`
    fn create_shader(&self, stage: ShaderStage) -> Result<Handle>;

    /// Upload `source` into `shader` and compile it; returns the compile status
    fn compile_shader(&self, shader: Handle, source: &str) -> bool;

    /// Compiler diagnostic log for `shader`
    fn shader_info_log(&self, shader: Handle) -> String;

    fn delete_shader(&self, shader: Handle);

    // ===== PROGRAMS =====

    fn create_program(&self) -> Result<Handle>;

    fn attach_shader(&self, program: Handle, shader: Handle);

    fn detach_shader(&self, program: Handle, shader: Handle);

    /// Link the attached stages; returns the link status
    fn link_program(&self, program: Handle) -> bool;

    /// Validate the program against the current state; returns the validate status
    fn validate_program(&self, program: Handle) -> bool;

    /// Linker / validator diagnostic log for `program`
    fn program_info_log(&self, program: Handle) -> String;

    /// Make `program` current, or clear the current program with None
    fn use_program(&self, program: Option<Handle>);

    fn delete_program(&self, program: Handle);

    /// Location of an active uniform, or -1 if the linked program has none by that name
    fn uniform_location(&self, program: Handle, name: &str) -> i32;

    /// Write `value` at `location` of the current program
    fn set_uniform(&self, location: i32, value: &UniformValue);

    // ===== BUFFERS =====

    fn create_buffer(&self) -> Result<Handle>;

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Handle>);

    /// Allocate and fill the storage of the buffer bound to `target`
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Overwrite part of the storage of the buffer bound to `target`
    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]);

    fn delete_buffer(&self, buffer: Handle);

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&self) -> Result<Handle>;

    fn bind_vertex_array(&self, vertex_array: Option<Handle>);

    fn enable_vertex_attribute(&self, slot: u32);

    /// Register `slot` of the bound vertex array against the bound array buffer
    fn vertex_attribute_pointer(&self, slot: u32, pointer: &AttributePointer);

    fn delete_vertex_array(&self, vertex_array: Handle);

    /// Number of attribute slots a vertex array exposes
    fn max_vertex_attributes(&self) -> u32;

    // ===== TEXTURES =====

    fn create_texture(&self) -> Result<Handle>;

    /// Select the texturing unit later texture binds apply to
    fn active_texture_unit(&self, unit: u32);

    /// Bind a 2D texture on the active unit
    fn bind_texture(&self, texture: Option<Handle>);

    /// Apply sampling state to the bound 2D texture
    fn texture_parameters(&self, params: &TextureParams);

    /// Upload tightly packed RGBA8 pixels, bottom row first, to the bound 2D texture
    fn texture_image_2d(&self, width: u32, height: u32, rgba: &[u8]);

    fn delete_texture(&self, texture: Handle);

    /// Number of combined texture image units
    fn max_texture_units(&self) -> u32;

    // ===== FRAME =====

    fn set_clear_color(&self, color: [f32; 4]);

    fn clear(&self, mask: ClearMask);

    /// Indexed draw from the bound vertex array and element buffer
    fn draw_elements(&self, mode: DrawMode, count: u32, index_type: IndexType, offset: usize);
}
