/// Compiled shader stage.
///
/// A Shader owns exactly one driver shader object. It only exists to be
/// linked into a `ShaderProgram`, which consumes it; the object is deleted
/// when the Shader is dropped.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, Handle, ShaderStage};
use crate::{engine_debug, engine_error};

/// Read a shader source file in full
///
/// Fails with `Error::ResourceUnavailable` if the file cannot be opened or read.
pub fn read_shader_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| {
        engine_error!("glint::Shader", "Could not open shader file {}: {}", path.display(), e);
        Error::ResourceUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })
}

pub struct Shader {
    device: Rc<dyn GraphicsDevice>,
    handle: Handle,
    stage: ShaderStage,
}

impl Shader {
    /// Compile `source` as a `stage` shader
    ///
    /// On failure the shader object created for the attempt is deleted before
    /// `Error::ShaderCompileError` is returned with the driver's full log.
    pub fn compile(device: &Rc<dyn GraphicsDevice>, stage: ShaderStage, source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            engine_error!("glint::Shader", "Refusing to compile empty {} shader source", stage);
            return Err(Error::ShaderCompileError {
                stage,
                log: "shader source is empty".to_string(),
            });
        }

        let handle = device.create_shader(stage)?;

        if !device.compile_shader(handle, source) {
            let mut log = device.shader_info_log(handle);
            device.delete_shader(handle);
            if log.trim().is_empty() {
                log = "driver reported a compile failure without a diagnostic log".to_string();
            }
            engine_error!("glint::Shader", "Could not compile {} shader:\n{}", stage, log);
            return Err(Error::ShaderCompileError { stage, log });
        }

        engine_debug!("glint::Shader", "Compiled {} shader {}", stage, handle.raw());

        Ok(Self {
            device: Rc::clone(device),
            handle,
            stage,
        })
    }

    /// Read `path` and compile it as a `stage` shader
    pub fn from_file(
        device: &Rc<dyn GraphicsDevice>,
        stage: ShaderStage,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let source = read_shader_source(path)?;
        Self::compile(device, stage, &source).inspect_err(|_| {
            engine_error!("glint::Shader", "Shader file {} failed to compile", path.display());
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("handle", &self.handle)
            .field("stage", &self.stage)
            .finish()
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.device.delete_shader(self.handle);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
