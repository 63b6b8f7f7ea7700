use crate::error::{ContentError, Result};
use crate::graphics::{GpuHandle, HandleAllocator};
use ahash::AHashMap;
use glam::UVec2;
use serde::{Deserialize, Serialize};

/// Pixel layout of a texture or render target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    Rgba8,
    Rgb8,
    Alpha8,
}

impl TextureFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rgb8 => 3,
            TextureFormat::Alpha8 => 1,
        }
    }
}

/// CPU-side description that survives a lost context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    pub size: UVec2,
    pub format: TextureFormat,
}

impl TextureDescriptor {
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            size: UVec2::new(width, height),
            format,
        }
    }

    /// Bytes of tightly packed pixel data
    pub fn byte_len(&self) -> usize {
        (self.size.x as usize)
            .saturating_mul(self.size.y as usize)
            .saturating_mul(self.format.bytes_per_pixel())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
    Uniform,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GpuObjectKind {
    Texture,
    Buffer,
    Shader,
    RenderTarget,
}

/// What the backend knows about a live object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GpuObjectInfo {
    pub kind: GpuObjectKind,
    pub bytes: usize,
    pub uploads: u32,
}

/// Graphics API seam.
///
/// Every create call fails with [`ContentError::ContextUnavailable`] while
/// the context is lost. `delete` of a handle from an older context is a no-op.
pub trait GpuBackend {
    fn has_context(&self) -> bool;

    fn context_generation(&self) -> u32;

    fn create_texture(
        &mut self,
        desc: &TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<GpuHandle>;

    fn upload_texture(&mut self, handle: GpuHandle, pixels: &[u8]) -> Result<()>;

    fn create_buffer(&mut self, size: usize, usage: BufferUsage) -> Result<GpuHandle>;

    fn write_buffer(&mut self, handle: GpuHandle, offset: usize, data: &[u8]) -> Result<()>;

    fn compile_shader(&mut self, vertex_source: &str, fragment_source: &str) -> Result<GpuHandle>;

    fn create_render_target(&mut self, desc: &TextureDescriptor) -> Result<GpuHandle>;

    fn delete(&mut self, handle: GpuHandle);

    /// The platform destroyed the context; every object is gone
    fn context_lost(&mut self);

    /// A fresh, empty context is available
    fn context_restored(&mut self);

    fn live_objects(&self) -> usize;

    fn object_info(&self, handle: GpuHandle) -> Option<GpuObjectInfo>;
}

/// In-memory backend for tests, tools and servers without a display
#[derive(Debug)]
pub struct HeadlessBackend {
    allocator: HandleAllocator,
    has_context: bool,
    objects: AHashMap<GpuHandle, GpuObjectInfo>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            has_context: true,
            objects: AHashMap::new(),
        }
    }

    fn require_context(&self) -> Result<()> {
        if self.has_context {
            Ok(())
        } else {
            Err(ContentError::ContextUnavailable)
        }
    }

    fn create(&mut self, kind: GpuObjectKind, bytes: usize, uploads: u32) -> Result<GpuHandle> {
        self.require_context()?;
        let handle = self.allocator.allocate();
        self.objects.insert(
            handle,
            GpuObjectInfo {
                kind,
                bytes,
                uploads,
            },
        );
        Ok(handle)
    }

    fn object_mut(&mut self, handle: GpuHandle) -> Result<&mut GpuObjectInfo> {
        self.require_context()?;
        self.objects
            .get_mut(&handle)
            .ok_or_else(|| ContentError::Gpu(format!("Unknown GPU object {}", handle.id())))
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for HeadlessBackend {
    fn has_context(&self) -> bool {
        self.has_context
    }

    fn context_generation(&self) -> u32 {
        self.allocator.generation()
    }

    fn create_texture(
        &mut self,
        desc: &TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<GpuHandle> {
        if let Some(pixels) = pixels {
            if pixels.len() != desc.byte_len() {
                return Err(ContentError::Gpu(format!(
                    "Texture data is {} bytes, expected {}",
                    pixels.len(),
                    desc.byte_len()
                )));
            }
        }
        let uploads = u32::from(pixels.is_some());
        self.create(GpuObjectKind::Texture, desc.byte_len(), uploads)
    }

    fn upload_texture(&mut self, handle: GpuHandle, pixels: &[u8]) -> Result<()> {
        let object = self.object_mut(handle)?;
        if object.kind != GpuObjectKind::Texture || object.bytes != pixels.len() {
            return Err(ContentError::Gpu(format!(
                "Upload of {} bytes does not fit GPU object {}",
                pixels.len(),
                handle.id()
            )));
        }
        object.uploads += 1;
        Ok(())
    }

    fn create_buffer(&mut self, size: usize, _usage: BufferUsage) -> Result<GpuHandle> {
        self.create(GpuObjectKind::Buffer, size, 0)
    }

    fn write_buffer(&mut self, handle: GpuHandle, offset: usize, data: &[u8]) -> Result<()> {
        let object = self.object_mut(handle)?;
        let fits = offset
            .checked_add(data.len())
            .is_some_and(|end| end <= object.bytes);
        if object.kind != GpuObjectKind::Buffer || !fits {
            return Err(ContentError::Gpu(format!(
                "Write of {} bytes at {offset} overflows GPU buffer {}",
                data.len(),
                handle.id()
            )));
        }
        object.uploads += 1;
        Ok(())
    }

    fn compile_shader(&mut self, vertex_source: &str, fragment_source: &str) -> Result<GpuHandle> {
        self.require_context()?;
        if vertex_source.trim().is_empty() || fragment_source.trim().is_empty() {
            return Err(ContentError::Gpu("Shader stage source is empty".to_string()));
        }
        self.create(
            GpuObjectKind::Shader,
            vertex_source.len() + fragment_source.len(),
            0,
        )
    }

    fn create_render_target(&mut self, desc: &TextureDescriptor) -> Result<GpuHandle> {
        self.create(GpuObjectKind::RenderTarget, desc.byte_len(), 0)
    }

    fn delete(&mut self, handle: GpuHandle) {
        if handle.is_live_in(self.allocator.generation()) {
            self.objects.remove(&handle);
        }
    }

    fn context_lost(&mut self) {
        self.has_context = false;
        self.objects.clear();
    }

    fn context_restored(&mut self) {
        self.allocator.advance_generation();
        self.has_context = true;
    }

    fn live_objects(&self) -> usize {
        self.objects.len()
    }

    fn object_info(&self, handle: GpuHandle) -> Option<GpuObjectInfo> {
        self.objects.get(&handle).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_size_checked() {
        let mut backend = HeadlessBackend::new();
        let desc = TextureDescriptor::new(2, 2, TextureFormat::Rgba8);

        assert!(backend.create_texture(&desc, Some(&[0u8; 16])).is_ok());
        assert!(matches!(
            backend.create_texture(&desc, Some(&[0u8; 3])),
            Err(ContentError::Gpu(_))
        ));
    }

    #[test]
    fn test_lost_context_drops_objects() {
        let mut backend = HeadlessBackend::new();
        let handle = backend.create_buffer(64, BufferUsage::Vertex).unwrap();
        assert_eq!(backend.live_objects(), 1);

        backend.context_lost();
        assert_eq!(backend.live_objects(), 0);
        assert!(matches!(
            backend.create_buffer(64, BufferUsage::Vertex),
            Err(ContentError::ContextUnavailable)
        ));

        backend.context_restored();
        let fresh = backend.create_buffer(64, BufferUsage::Vertex).unwrap();
        backend.delete(handle);
        assert_eq!(backend.live_objects(), 1);
        assert!(backend.object_info(fresh).is_some());
    }

    #[test]
    fn test_shader_requires_source() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.compile_shader("void main() {}", "").is_err());
        assert!(backend.compile_shader("void main() {}", "void main() {}").is_ok());
    }

    #[test]
    fn test_buffer_write_bounds() {
        let mut backend = HeadlessBackend::new();
        let handle = backend.create_buffer(8, BufferUsage::Uniform).unwrap();
        assert!(backend.write_buffer(handle, 4, &[0u8; 4]).is_ok());
        assert!(backend.write_buffer(handle, 6, &[0u8; 4]).is_err());
        assert!(backend.write_buffer(handle, usize::MAX, &[0u8; 4]).is_err());
        assert_eq!(backend.object_info(handle).unwrap().uploads, 1);
    }
}
