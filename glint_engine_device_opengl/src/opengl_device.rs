/// OpenGlDevice - GraphicsDevice implementation on top of glow
///
/// The device does not create a context; it wraps a `glow::Context` that the
/// caller made current on this thread. Every method issues the matching GL
/// call directly, so binding state is the driver's.

use std::ffi::c_void;
use std::fmt;

use glint_engine::glint::device::{
    AttributePointer, BufferTarget, BufferUsage, ClearMask, DeviceConfig, DrawMode,
    GraphicsDevice, Handle, IndexType, ShaderStage, TextureParams, UniformValue,
};
use glint_engine::glint::{Error, Result};
use glint_engine::{engine_info, engine_warn};
use glow::HasContext;

use crate::opengl_debug::{handle_debug_message, reset_debug_tracking};
use crate::opengl_format::*;

fn shader_of(handle: Handle) -> glow::NativeShader {
    glow::NativeShader(handle.get())
}

fn program_of(handle: Handle) -> glow::NativeProgram {
    glow::NativeProgram(handle.get())
}

fn buffer_of(handle: Handle) -> glow::NativeBuffer {
    glow::NativeBuffer(handle.get())
}

fn vertex_array_of(handle: Handle) -> glow::NativeVertexArray {
    glow::NativeVertexArray(handle.get())
}

fn texture_of(handle: Handle) -> glow::NativeTexture {
    glow::NativeTexture(handle.get())
}

fn backend_error(what: &str, message: String) -> Error {
    Error::BackendError(format!("Could not create {}: {}", what, message))
}

/// OpenGL 3.3+ core graphics device
pub struct OpenGlDevice {
    gl: glow::Context,
    config: DeviceConfig,
    debug_output: bool,
    max_vertex_attributes: u32,
    max_texture_units: u32,
}

impl OpenGlDevice {
    /// Wrap an existing context
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as the device
    /// and every resource created from it are alive.
    pub unsafe fn new(mut gl: glow::Context, config: DeviceConfig) -> Self {
        let version = gl.get_parameter_string(glow::VERSION);
        let glsl = gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION);
        let renderer = gl.get_parameter_string(glow::RENDERER);
        engine_info!("glint::OpenGlDevice", "OpenGL {} ({})", version, renderer);
        engine_info!("glint::OpenGlDevice", "GLSL {}", glsl);

        let debug_output = if config.enable_debug_output {
            if gl.supports_debug() {
                reset_debug_tracking();
                gl.enable(glow::DEBUG_OUTPUT);
                gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
                gl.debug_message_callback(handle_debug_message);
                engine_info!("glint::OpenGlDevice", "Driver debug output enabled");
                true
            } else {
                engine_warn!("glint::OpenGlDevice", "Debug output requested but not supported by this context");
                false
            }
        } else {
            false
        };

        let max_vertex_attributes = gl.get_parameter_i32(glow::MAX_VERTEX_ATTRIBS).max(0) as u32;
        let max_texture_units = gl.get_parameter_i32(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS).max(0) as u32;

        let [r, g, b, a] = config.clear_color;
        gl.clear_color(r, g, b, a);

        Self {
            gl,
            config,
            debug_output,
            max_vertex_attributes,
            max_texture_units,
        }
    }

    /// Load GL entry points with `loader` and wrap the resulting context
    ///
    /// # Safety
    ///
    /// Same as `new`; `loader` must return entry points of the current context.
    pub unsafe fn from_loader_function<F>(loader: F, config: DeviceConfig) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        Self::new(glow::Context::from_loader_function(loader), config)
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Whether driver debug messages are being forwarded to the logger
    pub fn debug_output_enabled(&self) -> bool {
        self.debug_output
    }

    /// Underlying glow context, for calls the device does not cover
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

impl fmt::Debug for OpenGlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenGlDevice")
            .field("config", &self.config)
            .field("debug_output", &self.debug_output)
            .field("max_vertex_attributes", &self.max_vertex_attributes)
            .field("max_texture_units", &self.max_texture_units)
            .finish()
    }
}

impl GraphicsDevice for OpenGlDevice {
    // ===== SHADERS =====

    fn create_shader(&self, stage: ShaderStage) -> Result<Handle> {
        unsafe {
            self.gl
                .create_shader(shader_stage_to_gl(stage))
                .map(|s| Handle::from(s.0))
                .map_err(|e| backend_error("shader", e))
        }
    }

    fn compile_shader(&self, shader: Handle, source: &str) -> bool {
        unsafe {
            self.gl.shader_source(shader_of(shader), source);
            self.gl.compile_shader(shader_of(shader));
            self.gl.get_shader_compile_status(shader_of(shader))
        }
    }

    fn shader_info_log(&self, shader: Handle) -> String {
        unsafe { self.gl.get_shader_info_log(shader_of(shader)) }
    }

    fn delete_shader(&self, shader: Handle) {
        unsafe { self.gl.delete_shader(shader_of(shader)) }
    }

    // ===== PROGRAMS =====

    fn create_program(&self) -> Result<Handle> {
        unsafe {
            self.gl
                .create_program()
                .map(|p| Handle::from(p.0))
                .map_err(|e| backend_error("program", e))
        }
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        unsafe { self.gl.attach_shader(program_of(program), shader_of(shader)) }
    }

    fn detach_shader(&self, program: Handle, shader: Handle) {
        unsafe { self.gl.detach_shader(program_of(program), shader_of(shader)) }
    }

    fn link_program(&self, program: Handle) -> bool {
        unsafe {
            self.gl.link_program(program_of(program));
            self.gl.get_program_link_status(program_of(program))
        }
    }

    fn validate_program(&self, program: Handle) -> bool {
        unsafe {
            self.gl.validate_program(program_of(program));
            self.gl.get_program_validate_status(program_of(program))
        }
    }

    fn program_info_log(&self, program: Handle) -> String {
        unsafe { self.gl.get_program_info_log(program_of(program)) }
    }

    fn use_program(&self, program: Option<Handle>) {
        unsafe { self.gl.use_program(program.map(program_of)) }
    }

    fn delete_program(&self, program: Handle) {
        unsafe { self.gl.delete_program(program_of(program)) }
    }

    fn uniform_location(&self, program: Handle, name: &str) -> i32 {
        unsafe {
            self.gl
                .get_uniform_location(program_of(program), name)
                .map_or(-1, |location| location.0 as i32)
        }
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        let location = Some(&location);
        unsafe {
            match *value {
                UniformValue::Float(x) => self.gl.uniform_1_f32(location, x),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Int(x) => self.gl.uniform_1_i32(location, x),
                UniformValue::UInt(x) => self.gl.uniform_1_u32(location, x),
                UniformValue::Mat4(m) => {
                    self.gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }

    // ===== BUFFERS =====

    fn create_buffer(&self) -> Result<Handle> {
        unsafe {
            self.gl
                .create_buffer()
                .map(|b| Handle::from(b.0))
                .map_err(|e| backend_error("buffer", e))
        }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Handle>) {
        unsafe { self.gl.bind_buffer(buffer_target_to_gl(target), buffer.map(buffer_of)) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target_to_gl(target), data, buffer_usage_to_gl(usage))
        }
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_sub_data_u8_slice(buffer_target_to_gl(target), offset as i32, data)
        }
    }

    fn delete_buffer(&self, buffer: Handle) {
        unsafe { self.gl.delete_buffer(buffer_of(buffer)) }
    }

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&self) -> Result<Handle> {
        unsafe {
            self.gl
                .create_vertex_array()
                .map(|v| Handle::from(v.0))
                .map_err(|e| backend_error("vertex array", e))
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Handle>) {
        unsafe { self.gl.bind_vertex_array(vertex_array.map(vertex_array_of)) }
    }

    fn enable_vertex_attribute(&self, slot: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(slot) }
    }

    fn vertex_attribute_pointer(&self, slot: u32, pointer: &AttributePointer) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                slot,
                pointer.component_count as i32,
                attribute_type_to_gl(pointer.component_type),
                pointer.normalized,
                pointer.stride as i32,
                pointer.offset as i32,
            )
        }
    }

    fn delete_vertex_array(&self, vertex_array: Handle) {
        unsafe { self.gl.delete_vertex_array(vertex_array_of(vertex_array)) }
    }

    fn max_vertex_attributes(&self) -> u32 {
        self.max_vertex_attributes
    }

    // ===== TEXTURES =====

    fn create_texture(&self) -> Result<Handle> {
        unsafe {
            self.gl
                .create_texture()
                .map(|t| Handle::from(t.0))
                .map_err(|e| backend_error("texture", e))
        }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, texture: Option<Handle>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture.map(texture_of)) }
    }

    fn texture_parameters(&self, params: &TextureParams) {
        unsafe {
            let target = glow::TEXTURE_2D;
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, texture_filter_to_gl(params.min_filter));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, texture_filter_to_gl(params.mag_filter));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, texture_wrap_to_gl(params.wrap_s));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, texture_wrap_to_gl(params.wrap_t));
        }
    }

    fn texture_image_2d(&self, width: u32, height: u32, rgba: &[u8]) {
        unsafe {
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(rgba)),
            )
        }
    }

    fn delete_texture(&self, texture: Handle) {
        unsafe { self.gl.delete_texture(texture_of(texture)) }
    }

    fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }

    // ===== FRAME =====

    fn set_clear_color(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_mask_to_gl(mask)) }
    }

    fn draw_elements(&self, mode: DrawMode, count: u32, index_type: IndexType, offset: usize) {
        unsafe {
            self.gl.draw_elements(
                draw_mode_to_gl(mode),
                count as i32,
                index_type_to_gl(index_type),
                offset as i32,
            )
        }
    }
}
