pub mod backend;
pub mod buffer;
pub mod device;
pub mod handle;
pub mod render_target;
pub mod shader;
pub mod texture;

pub use backend::{
    BufferUsage, GpuBackend, GpuObjectInfo, GpuObjectKind, HeadlessBackend, TextureDescriptor,
    TextureFormat,
};
pub use buffer::GpuBuffer;
pub use device::{ContextListener, GraphicsContextResource, GraphicsDevice, ManagedResourceId};
pub use handle::{GpuHandle, HandleAllocator};
pub use render_target::RenderTarget;
pub use shader::ShaderProgram;
pub use texture::Texture;
