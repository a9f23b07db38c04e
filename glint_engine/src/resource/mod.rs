//! GPU resource wrappers
//!
//! Each wrapper owns one driver object, shares the device through
//! `Rc<dyn GraphicsDevice>` and releases its object when dropped.

pub mod shader;
pub mod shader_program;
pub mod vertex_buffer;
pub mod index_buffer;
pub mod vertex_layout;
pub mod vertex_array;
pub mod texture;

pub use shader::{Shader, read_shader_source};
pub use shader_program::ShaderProgram;
pub use vertex_buffer::VertexBuffer;
pub use index_buffer::IndexBuffer;
pub use vertex_layout::{VertexAttribute, VertexComponent, VertexLayout};
pub use vertex_array::{VertexArray, VertexBinding};
pub use texture::{Texture, TextureInfo};
