/// Linked shader program with a lazily populated uniform-location cache.
///
/// Uniform setters write to the currently bound program, so `bind()` must be
/// called before any `set_*` call.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, Handle, ShaderStage, UniformValue};
use crate::resource::Shader;
use crate::{engine_bail, engine_debug, engine_error, engine_warn};

pub struct ShaderProgram {
    device: Rc<dyn GraphicsDevice>,
    handle: Handle,
    linked: bool,
    uniform_cache: RefCell<FxHashMap<String, i32>>,
}

impl ShaderProgram {
    /// Link a vertex and a fragment stage into a program
    ///
    /// Both stages are consumed: they are detached after linking and their
    /// driver objects are deleted when this call returns, whatever the outcome.
    pub fn new(device: &Rc<dyn GraphicsDevice>, vertex: Shader, fragment: Shader) -> Result<Self> {
        Self::check_stages(&vertex, &fragment)?;

        let handle = device.create_program()?;
        if let Err(e) = Self::link(device.as_ref(), handle, &vertex, &fragment) {
            device.delete_program(handle);
            return Err(e);
        }
        Self::validate(device.as_ref(), handle);

        engine_debug!("glint::ShaderProgram", "Linked program {}", handle.raw());

        Ok(Self {
            device: Rc::clone(device),
            handle,
            linked: true,
            uniform_cache: RefCell::new(FxHashMap::default()),
        })
    }

    /// Compile both stage files and link them
    pub fn from_files(
        device: &Rc<dyn GraphicsDevice>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let vertex = Shader::from_file(device, ShaderStage::Vertex, vertex_path)?;
        let fragment = Shader::from_file(device, ShaderStage::Fragment, fragment_path)?;
        Self::new(device, vertex, fragment)
    }

    /// Relink this program from new stages, keeping its handle
    ///
    /// The uniform cache is cleared in every case since locations may move.
    /// If linking fails the program is left unlinked: `is_linked()` returns
    /// false and it must not be drawn with until a later `relink` succeeds.
    pub fn relink(&mut self, vertex: Shader, fragment: Shader) -> Result<()> {
        Self::check_stages(&vertex, &fragment)?;
        self.uniform_cache.borrow_mut().clear();
        self.linked = false;
        Self::link(self.device.as_ref(), self.handle, &vertex, &fragment)?;
        Self::validate(self.device.as_ref(), self.handle);
        self.linked = true;
        engine_debug!("glint::ShaderProgram", "Relinked program {}", self.handle.raw());
        Ok(())
    }

    /// False after a failed `relink`
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    fn check_stages(vertex: &Shader, fragment: &Shader) -> Result<()> {
        if vertex.stage() != ShaderStage::Vertex || fragment.stage() != ShaderStage::Fragment {
            engine_bail!(
                "glint::ShaderProgram",
                "Expected vertex + fragment stages, got {} + {}",
                vertex.stage(),
                fragment.stage()
            );
        }
        Ok(())
    }

    // Validation failure is reported but never fatal
    fn validate(device: &dyn GraphicsDevice, handle: Handle) {
        if !device.validate_program(handle) {
            engine_warn!(
                "glint::ShaderProgram",
                "Program {} failed validation: {}",
                handle.raw(),
                device.program_info_log(handle)
            );
        }
    }

    fn link(device: &dyn GraphicsDevice, handle: Handle, vertex: &Shader, fragment: &Shader) -> Result<()> {
        device.attach_shader(handle, vertex.handle());
        device.attach_shader(handle, fragment.handle());
        let linked = device.link_program(handle);
        device.detach_shader(handle, vertex.handle());
        device.detach_shader(handle, fragment.handle());

        if !linked {
            let mut log = device.program_info_log(handle);
            if log.trim().is_empty() {
                log = "driver reported a link failure without a diagnostic log".to_string();
            }
            engine_error!("glint::ShaderProgram", "Could not link program {}:\n{}", handle.raw(), log);
            return Err(Error::LinkError { log });
        }
        Ok(())
    }

    pub fn bind(&self) {
        self.device.use_program(Some(self.handle));
    }

    pub fn unbind(&self) {
        self.device.use_program(None);
    }

    /// Location of uniform `name`, or -1 if the program has no such uniform
    ///
    /// The first lookup of a name queries the driver; later lookups are served
    /// from the cache, misses included.
    pub fn uniform_location(&self, name: &str) -> i32 {
        if let Some(location) = self.uniform_cache.borrow().get(name) {
            return *location;
        }

        let location = self.device.uniform_location(self.handle, name);
        if location < 0 {
            engine_warn!(
                "glint::ShaderProgram",
                "Uniform '{}' does not exist in program {}",
                name,
                self.handle.raw()
            );
        }
        self.uniform_cache.borrow_mut().insert(name.to_string(), location);
        location
    }

    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        let location = self.uniform_location(name);
        self.set_uniform_at(location, value);
    }

    /// Write to an already resolved location; -1 is ignored
    pub fn set_uniform_at(&self, location: i32, value: impl Into<UniformValue>) {
        if location < 0 {
            return;
        }
        self.device.set_uniform(location, &value.into());
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_float2(&self, name: &str, value: Vec2) {
        self.set_uniform(name, value);
    }

    pub fn set_float3(&self, name: &str, value: Vec3) {
        self.set_uniform(name, value);
    }

    pub fn set_float4(&self, name: &str, value: Vec4) {
        self.set_uniform(name, value);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_uint(&self, name: &str, value: u32) {
        self.set_uniform(name, value);
    }

    pub fn set_mat4(&self, name: &str, value: Mat4) {
        self.set_uniform(name, value);
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .field("linked", &self.linked)
            .field("cached_uniforms", &self.uniform_cache.borrow().len())
            .finish()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.device.delete_program(self.handle);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_program_tests.rs"]
mod tests;
