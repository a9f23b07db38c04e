/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// The mock hands out object names, tracks which objects are alive, mirrors
/// the driver's binding state and records every state-changing call so tests
/// can assert on ordering, leaks and cache behaviour.
///
/// Shader compilation is simulated: a source compiles when it declares
/// `void main` and its braces balance. Linking succeeds with exactly one
/// compiled vertex stage and one compiled fragment stage attached. Active
/// uniforms are the `uniform <type> <name>;` declarations of the attached
/// sources, located in declaration order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    AttributePointer, BufferTarget, BufferUsage, ClearMask, DrawMode, GraphicsDevice, Handle,
    IndexType, ShaderStage, TextureParams, UniformValue,
};

pub const MOCK_MAX_VERTEX_ATTRIBUTES: u32 = 16;
pub const MOCK_MAX_TEXTURE_UNITS: u32 = 16;

/// Create a mock device plus the trait-object handle resources are built with
pub fn shared_mock() -> (Rc<MockGraphicsDevice>, Rc<dyn GraphicsDevice>) {
    let mock = Rc::new(MockGraphicsDevice::new());
    let device: Rc<dyn GraphicsDevice> = mock.clone();
    (mock, device)
}

// ============================================================================
// Recorded objects
// ============================================================================

/// Kind of a live driver object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockResourceKind {
    Shader,
    Program,
    Buffer,
    VertexArray,
    Texture,
}

#[derive(Debug, Clone)]
pub struct MockShaderObject {
    pub stage: ShaderStage,
    pub source: String,
    pub compiled: bool,
    pub log: String,
}

#[derive(Debug, Clone, Default)]
pub struct MockProgramObject {
    pub attached: Vec<Handle>,
    pub linked: bool,
    pub log: String,
    pub uniforms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MockBufferObject {
    pub data: Vec<u8>,
    pub usage: Option<BufferUsage>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTextureObject {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub params: Option<TextureParams>,
}

/// One registered vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAttributeRecord {
    pub vertex_array: Option<Handle>,
    pub buffer: Option<Handle>,
    pub slot: u32,
    pub pointer: AttributePointer,
}

/// Bindings in effect when a draw was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDrawCall {
    pub mode: DrawMode,
    pub count: u32,
    pub index_type: IndexType,
    pub offset: usize,
    pub vertex_array: Option<Handle>,
    pub element_buffer: Option<Handle>,
    pub program: Option<Handle>,
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock device that tracks created objects and bindings without GPU
#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    next_name: Cell<u32>,
    live: RefCell<FxHashMap<Handle, MockResourceKind>>,
    shaders: RefCell<FxHashMap<Handle, MockShaderObject>>,
    programs: RefCell<FxHashMap<Handle, MockProgramObject>>,
    buffers: RefCell<FxHashMap<Handle, MockBufferObject>>,
    textures: RefCell<FxHashMap<Handle, MockTextureObject>>,

    array_buffer: Cell<Option<Handle>>,
    element_buffer: Cell<Option<Handle>>,
    vertex_array: Cell<Option<Handle>>,
    program: Cell<Option<Handle>>,
    active_unit: Cell<u32>,
    unit_textures: RefCell<FxHashMap<u32, Handle>>,
    clear_color: Cell<[f32; 4]>,

    enabled_attributes: RefCell<Vec<(Option<Handle>, u32)>>,
    attribute_records: RefCell<Vec<MockAttributeRecord>>,
    uniform_writes: RefCell<Vec<(Option<Handle>, i32, UniformValue)>>,
    draw_calls: RefCell<Vec<MockDrawCall>>,
    commands: RefCell<Vec<String>>,
    uniform_queries: Cell<u32>,

    refuse_allocations: Cell<bool>,
    fail_link: Cell<bool>,
    fail_validation: Cell<bool>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== TEST CONTROLS =====

    /// Make every `create_*` call fail as if the driver were out of names
    pub fn set_refuse_allocations(&self, refuse: bool) {
        self.refuse_allocations.set(refuse);
    }

    /// Make every link fail with a driver-style log
    pub fn set_fail_link(&self, fail: bool) {
        self.fail_link.set(fail);
    }

    /// Make `validate_program` report failure
    pub fn set_fail_validation(&self, fail: bool) {
        self.fail_validation.set(fail);
    }

    // ===== INSPECTION =====

    pub fn live_count(&self, kind: MockResourceKind) -> usize {
        self.live.borrow().values().filter(|k| **k == kind).count()
    }

    pub fn total_live(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.live.borrow().contains_key(&handle)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.borrow_mut().clear();
    }

    pub fn command_count(&self, prefix: &str) -> usize {
        self.commands.borrow().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn draw_calls(&self) -> Vec<MockDrawCall> {
        self.draw_calls.borrow().clone()
    }

    pub fn uniform_queries(&self) -> u32 {
        self.uniform_queries.get()
    }

    pub fn uniform_writes(&self) -> Vec<(Option<Handle>, i32, UniformValue)> {
        self.uniform_writes.borrow().clone()
    }

    pub fn attribute_records(&self) -> Vec<MockAttributeRecord> {
        self.attribute_records.borrow().clone()
    }

    pub fn enabled_attributes(&self) -> Vec<(Option<Handle>, u32)> {
        self.enabled_attributes.borrow().clone()
    }

    pub fn shader(&self, handle: Handle) -> Option<MockShaderObject> {
        self.shaders.borrow().get(&handle).cloned()
    }

    pub fn program(&self, handle: Handle) -> Option<MockProgramObject> {
        self.programs.borrow().get(&handle).cloned()
    }

    pub fn buffer(&self, handle: Handle) -> Option<MockBufferObject> {
        self.buffers.borrow().get(&handle).cloned()
    }

    pub fn texture(&self, handle: Handle) -> Option<MockTextureObject> {
        self.textures.borrow().get(&handle).cloned()
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<Handle> {
        match target {
            BufferTarget::Array => self.array_buffer.get(),
            BufferTarget::ElementArray => self.element_buffer.get(),
        }
    }

    pub fn bound_vertex_array(&self) -> Option<Handle> {
        self.vertex_array.get()
    }

    pub fn current_program(&self) -> Option<Handle> {
        self.program.get()
    }

    pub fn active_unit(&self) -> u32 {
        self.active_unit.get()
    }

    pub fn bound_texture(&self, unit: u32) -> Option<Handle> {
        self.unit_textures.borrow().get(&unit).copied()
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color.get()
    }

    // ===== INTERNALS =====

    fn record(&self, command: String) {
        self.commands.borrow_mut().push(command);
    }

    fn allocate(&self, kind: MockResourceKind) -> Result<Handle> {
        if self.refuse_allocations.get() {
            return Err(Error::BackendError(format!("mock device refused to allocate {:?}", kind)));
        }
        let name = self.next_name.get() + 1;
        self.next_name.set(name);
        let handle = Handle::new(name).expect("object names start at 1");
        self.live.borrow_mut().insert(handle, kind);
        self.record(format!("create_{:?}({})", kind, name));
        Ok(handle)
    }

    fn release(&self, handle: Handle, kind: MockResourceKind) {
        let removed = self.live.borrow_mut().remove(&handle);
        assert_eq!(removed, Some(kind), "double or mismatched delete of {:?}", handle);
        self.record(format!("delete_{:?}({})", kind, handle.raw()));
    }

    fn check_source(source: &str) -> std::result::Result<(), String> {
        if !source.contains("void main") {
            return Err("0:1(1): error: missing entry point main()".to_string());
        }
        let open = source.matches('{').count();
        let close = source.matches('}').count();
        if open != close {
            return Err(format!(
                "0:{}(1): error: syntax error, unexpected end of file ({} unmatched braces)",
                source.lines().count(),
                open.abs_diff(close)
            ));
        }
        Ok(())
    }

    fn declared_uniforms(source: &str) -> Vec<String> {
        source
            .lines()
            .filter_map(|line| {
                let mut tokens = line.trim().split_whitespace();
                if tokens.next()? != "uniform" {
                    return None;
                }
                let _ty = tokens.next()?;
                let name = tokens.next()?.trim_end_matches(';');
                let name = name.split('[').next().unwrap_or(name);
                Some(name.to_string())
            })
            .collect()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    // ===== SHADERS =====

    fn create_shader(&self, stage: ShaderStage) -> Result<Handle> {
        let handle = self.allocate(MockResourceKind::Shader)?;
        self.shaders.borrow_mut().insert(handle, MockShaderObject {
            stage,
            source: String::new(),
            compiled: false,
            log: String::new(),
        });
        Ok(handle)
    }

    fn compile_shader(&self, shader: Handle, source: &str) -> bool {
        self.record(format!("compile_shader({})", shader.raw()));
        let mut shaders = self.shaders.borrow_mut();
        let object = shaders.get_mut(&shader).expect("compile of unknown shader");
        object.source = source.to_string();
        match Self::check_source(source) {
            Ok(()) => {
                object.compiled = true;
                object.log.clear();
            }
            Err(log) => {
                object.compiled = false;
                object.log = log;
            }
        }
        object.compiled
    }

    fn shader_info_log(&self, shader: Handle) -> String {
        self.shaders.borrow().get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, shader: Handle) {
        self.release(shader, MockResourceKind::Shader);
        self.shaders.borrow_mut().remove(&shader);
    }

    // ===== PROGRAMS =====

    fn create_program(&self) -> Result<Handle> {
        let handle = self.allocate(MockResourceKind::Program)?;
        self.programs.borrow_mut().insert(handle, MockProgramObject::default());
        Ok(handle)
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        self.record(format!("attach_shader({}, {})", program.raw(), shader.raw()));
        let mut programs = self.programs.borrow_mut();
        let object = programs.get_mut(&program).expect("attach to unknown program");
        if !object.attached.contains(&shader) {
            object.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: Handle, shader: Handle) {
        self.record(format!("detach_shader({}, {})", program.raw(), shader.raw()));
        if let Some(object) = self.programs.borrow_mut().get_mut(&program) {
            object.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: Handle) -> bool {
        self.record(format!("link_program({})", program.raw()));
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let object = programs.get_mut(&program).expect("link of unknown program");

        let stages: Vec<&MockShaderObject> =
            object.attached.iter().filter_map(|h| shaders.get(h)).collect();
        let vertex = stages.iter().filter(|s| s.stage == ShaderStage::Vertex).count();
        let fragment = stages.iter().filter(|s| s.stage == ShaderStage::Fragment).count();

        let failure = if self.fail_link.get() {
            Some("error: fragment shader input 'v_TexCoord' has no matching vertex output".to_string())
        } else if stages.iter().any(|s| !s.compiled) {
            Some("error: linking with uncompiled shader".to_string())
        } else if vertex != 1 {
            Some(format!("error: program needs exactly one vertex shader, found {}", vertex))
        } else if fragment != 1 {
            Some(format!("error: program needs exactly one fragment shader, found {}", fragment))
        } else {
            None
        };

        match failure {
            Some(log) => {
                object.linked = false;
                object.log = log;
                object.uniforms.clear();
            }
            None => {
                object.linked = true;
                object.log.clear();
                let mut uniforms: Vec<String> = Vec::new();
                for stage in &stages {
                    for name in Self::declared_uniforms(&stage.source) {
                        if !uniforms.contains(&name) {
                            uniforms.push(name);
                        }
                    }
                }
                object.uniforms = uniforms;
            }
        }
        object.linked
    }

    fn validate_program(&self, program: Handle) -> bool {
        self.record(format!("validate_program({})", program.raw()));
        if self.fail_validation.get() {
            if let Some(object) = self.programs.borrow_mut().get_mut(&program) {
                object.log = "validation failed: no vertex array bound".to_string();
            }
            return false;
        }
        self.programs.borrow().get(&program).map(|p| p.linked).unwrap_or(false)
    }

    fn program_info_log(&self, program: Handle) -> String {
        self.programs.borrow().get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn use_program(&self, program: Option<Handle>) {
        self.record(format!("use_program({})", program.map_or(0, |h| h.raw())));
        self.program.set(program);
    }

    fn delete_program(&self, program: Handle) {
        self.release(program, MockResourceKind::Program);
        self.programs.borrow_mut().remove(&program);
        if self.program.get() == Some(program) {
            self.program.set(None);
        }
    }

    fn uniform_location(&self, program: Handle, name: &str) -> i32 {
        self.uniform_queries.set(self.uniform_queries.get() + 1);
        self.programs
            .borrow()
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map_or(-1, |index| index as i32)
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        self.record(format!("set_uniform({})", location));
        self.uniform_writes.borrow_mut().push((self.program.get(), location, *value));
    }

    // ===== BUFFERS =====

    fn create_buffer(&self) -> Result<Handle> {
        let handle = self.allocate(MockResourceKind::Buffer)?;
        self.buffers.borrow_mut().insert(handle, MockBufferObject { data: Vec::new(), usage: None });
        Ok(handle)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Handle>) {
        self.record(format!("bind_buffer({:?}, {})", target, buffer.map_or(0, |h| h.raw())));
        match target {
            BufferTarget::Array => self.array_buffer.set(buffer),
            BufferTarget::ElementArray => self.element_buffer.set(buffer),
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.record(format!("buffer_data({:?}, {})", target, data.len()));
        let bound = self.bound_buffer(target).expect("buffer_data with no buffer bound");
        let mut buffers = self.buffers.borrow_mut();
        let object = buffers.get_mut(&bound).expect("buffer_data on unknown buffer");
        object.data = data.to_vec();
        object.usage = Some(usage);
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.record(format!("buffer_sub_data({:?}, {}, {})", target, offset, data.len()));
        let bound = self.bound_buffer(target).expect("buffer_sub_data with no buffer bound");
        let mut buffers = self.buffers.borrow_mut();
        let object = buffers.get_mut(&bound).expect("buffer_sub_data on unknown buffer");
        object.data[offset..offset + data.len()].copy_from_slice(data);
    }

    fn delete_buffer(&self, buffer: Handle) {
        self.release(buffer, MockResourceKind::Buffer);
        self.buffers.borrow_mut().remove(&buffer);
        if self.array_buffer.get() == Some(buffer) {
            self.array_buffer.set(None);
        }
        if self.element_buffer.get() == Some(buffer) {
            self.element_buffer.set(None);
        }
    }

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&self) -> Result<Handle> {
        self.allocate(MockResourceKind::VertexArray)
    }

    fn bind_vertex_array(&self, vertex_array: Option<Handle>) {
        self.record(format!("bind_vertex_array({})", vertex_array.map_or(0, |h| h.raw())));
        self.vertex_array.set(vertex_array);
    }

    fn enable_vertex_attribute(&self, slot: u32) {
        self.record(format!("enable_vertex_attribute({})", slot));
        self.enabled_attributes.borrow_mut().push((self.vertex_array.get(), slot));
    }

    fn vertex_attribute_pointer(&self, slot: u32, pointer: &AttributePointer) {
        self.record(format!(
            "vertex_attribute_pointer({}, stride={}, offset={})",
            slot, pointer.stride, pointer.offset
        ));
        self.attribute_records.borrow_mut().push(MockAttributeRecord {
            vertex_array: self.vertex_array.get(),
            buffer: self.array_buffer.get(),
            slot,
            pointer: *pointer,
        });
    }

    fn delete_vertex_array(&self, vertex_array: Handle) {
        self.release(vertex_array, MockResourceKind::VertexArray);
        if self.vertex_array.get() == Some(vertex_array) {
            self.vertex_array.set(None);
        }
    }

    fn max_vertex_attributes(&self) -> u32 {
        MOCK_MAX_VERTEX_ATTRIBUTES
    }

    // ===== TEXTURES =====

    fn create_texture(&self) -> Result<Handle> {
        let handle = self.allocate(MockResourceKind::Texture)?;
        self.textures.borrow_mut().insert(handle, MockTextureObject::default());
        Ok(handle)
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(format!("active_texture_unit({})", unit));
        self.active_unit.set(unit);
    }

    fn bind_texture(&self, texture: Option<Handle>) {
        self.record(format!("bind_texture({})", texture.map_or(0, |h| h.raw())));
        let unit = self.active_unit.get();
        let mut units = self.unit_textures.borrow_mut();
        match texture {
            Some(handle) => {
                units.insert(unit, handle);
            }
            None => {
                units.remove(&unit);
            }
        }
    }

    fn texture_parameters(&self, params: &TextureParams) {
        self.record("texture_parameters".to_string());
        let bound = self.bound_texture(self.active_unit.get()).expect("no texture bound");
        if let Some(object) = self.textures.borrow_mut().get_mut(&bound) {
            object.params = Some(*params);
        }
    }

    fn texture_image_2d(&self, width: u32, height: u32, rgba: &[u8]) {
        self.record(format!("texture_image_2d({}x{})", width, height));
        assert_eq!(rgba.len(), (width * height * 4) as usize, "RGBA8 upload size mismatch");
        let bound = self.bound_texture(self.active_unit.get()).expect("no texture bound");
        if let Some(object) = self.textures.borrow_mut().get_mut(&bound) {
            object.width = width;
            object.height = height;
            object.pixels = rgba.to_vec();
        }
    }

    fn delete_texture(&self, texture: Handle) {
        self.release(texture, MockResourceKind::Texture);
        self.textures.borrow_mut().remove(&texture);
        self.unit_textures.borrow_mut().retain(|_, bound| *bound != texture);
    }

    fn max_texture_units(&self) -> u32 {
        MOCK_MAX_TEXTURE_UNITS
    }

    // ===== FRAME =====

    fn set_clear_color(&self, color: [f32; 4]) {
        self.record("set_clear_color".to_string());
        self.clear_color.set(color);
    }

    fn clear(&self, mask: ClearMask) {
        self.record(format!("clear({:?})", mask));
    }

    fn draw_elements(&self, mode: DrawMode, count: u32, index_type: IndexType, offset: usize) {
        self.record(format!("draw_elements({:?}, {})", mode, count));
        self.draw_calls.borrow_mut().push(MockDrawCall {
            mode,
            count,
            index_type,
            offset,
            vertex_array: self.vertex_array.get(),
            element_buffer: self.element_buffer.get(),
            program: self.program.get(),
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
