//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use archetype_content::prelude::*;
//! ```

pub use crate::app::App;
pub use crate::config::ContentConfig;
pub use crate::content::{
    Content, ContentLoader, ContentManager, ContentParam, ContentState, ContentStore,
};
pub use crate::error::{ContentError, Result};
pub use crate::graphics::{
    BufferUsage, GpuBuffer, GraphicsContextResource, GraphicsDevice, RenderTarget, ShaderProgram,
    Texture, TextureDescriptor, TextureFormat,
};
pub use crate::loaders::{
    BlobContent, SpriteFont, SpriteFontParam, TextContent, TextureLoader,
};
pub use crate::logging::{init_logging, ContentLogger, LogConfig, TracingLogger};
pub use crate::plugin::{DefaultContentPlugin, Plugin};
pub use crate::vfs::{DiskFileSystem, FileSystem, MemoryFileSystem};
