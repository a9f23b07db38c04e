/*!
# Glint Engine - OpenGL Device

OpenGL implementation of the `GraphicsDevice` trait from `glint_engine`,
built on the `glow` bindings. Requires an OpenGL 3.3 core (or newer)
context created and made current by the application.

```no_run
use std::rc::Rc;
use glint_engine::glint::device::{DeviceConfig, GraphicsDevice};
use glint_engine_device_opengl::OpenGlDevice;

# fn get_proc_address(_: &str) -> *const std::ffi::c_void { std::ptr::null() }
let device: Rc<dyn GraphicsDevice> = Rc::new(unsafe {
    OpenGlDevice::from_loader_function(get_proc_address, DeviceConfig::default())
});
```
*/

mod opengl_device;
mod opengl_debug;
mod opengl_format;

pub use opengl_device::OpenGlDevice;

// Re-export debug utilities
pub use opengl_debug::{debug_message_stats, print_debug_message_report, DebugMessageStats};
