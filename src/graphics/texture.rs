use crate::content::{Content, ContentState};
use crate::error::Result;
use crate::graphics::{
    GpuHandle, GraphicsContextResource, GraphicsDevice, ManagedResourceId, TextureDescriptor,
    TextureFormat,
};
use glam::UVec2;
use std::cell::Cell;
use std::rc::Rc;

/// 2D texture.
///
/// The descriptor is kept on the CPU so the texture can be recreated after a
/// lost context. Pixel data is not kept: GPU memory cannot be read back, so
/// whoever owns the texture re-derives the pixels (the texture loader reloads
/// the source image by its cache key).
#[derive(Debug)]
pub struct Texture {
    state: ContentState,
    descriptor: TextureDescriptor,
    handle: Cell<GpuHandle>,
    device: Rc<GraphicsDevice>,
    managed_id: Cell<Option<ManagedResourceId>>,
}

impl Texture {
    /// Create and upload a texture. `pixels` must match the descriptor size.
    pub fn new(
        device: &Rc<GraphicsDevice>,
        descriptor: TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<Self> {
        let handle = device.create_texture(&descriptor, pixels)?;
        Ok(Self {
            state: ContentState::new(),
            descriptor,
            handle: Cell::new(handle),
            device: Rc::clone(device),
            managed_id: Cell::new(None),
        })
    }

    /// Texture registered with the device for automatic context fan-out.
    /// After a restore its storage is recreated empty.
    pub fn new_managed(
        device: &Rc<GraphicsDevice>,
        descriptor: TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<Rc<Self>> {
        let texture = Rc::new(Self::new(device, descriptor, pixels)?);
        let id = device.allocate_resource_id();
        let weak = Rc::downgrade(&texture);
        device.register_managed_resource(id, weak);
        texture.managed_id.set(Some(id));
        Ok(texture)
    }

    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    pub fn size(&self) -> UVec2 {
        self.descriptor.size
    }

    pub fn width(&self) -> u32 {
        self.descriptor.size.x
    }

    pub fn height(&self) -> u32 {
        self.descriptor.size.y
    }

    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    pub fn handle(&self) -> GpuHandle {
        self.handle.get()
    }

    /// True while the GPU object exists in the current context
    pub fn is_valid(&self) -> bool {
        self.handle.get().is_live_in(self.device.context_generation())
    }

    /// Replace the full pixel contents
    pub fn upload(&self, pixels: &[u8]) -> Result<()> {
        self.device.upload_texture(self.handle.get(), pixels)
    }

    /// Forget the GPU handle without calling into the context
    pub fn invalidate(&self) {
        self.handle.set(GpuHandle::INVALID);
    }

    /// Create a fresh GPU object from the retained descriptor
    pub fn recreate(&self, pixels: Option<&[u8]>) -> Result<()> {
        let handle = self.device.create_texture(&self.descriptor, pixels)?;
        self.handle.set(handle);
        Ok(())
    }

    /// Delete the GPU object now
    pub fn release(&self) {
        let handle = self.handle.replace(GpuHandle::INVALID);
        self.device.delete(handle);
    }
}

impl Content for Texture {
    const TYPE_NAME: &'static str = "Texture";

    fn content_state(&self) -> &ContentState {
        &self.state
    }
}

impl GraphicsContextResource for Texture {
    fn on_lost_context(&self) {
        self.invalidate();
    }

    fn on_new_context(&self, _device: &GraphicsDevice) {
        if let Err(err) = self.recreate(None) {
            tracing::error!(
                width = self.width(),
                height = self.height(),
                "Failed to recreate texture: {err}"
            );
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Some(id) = self.managed_id.get() {
            self.device.unregister_managed_resource(id);
        }
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::ContextListener;

    struct NoListener;

    impl ContextListener for NoListener {
        fn on_lost_context(&mut self) {}
        fn on_new_context(&mut self) {}
    }

    #[test]
    fn test_texture_lifecycle() {
        let device = GraphicsDevice::headless();
        let desc = TextureDescriptor::new(4, 2, TextureFormat::Rgba8);
        let texture = Texture::new(&device, desc, Some(&[255u8; 32])).unwrap();

        assert!(texture.is_valid());
        assert_eq!(texture.size(), UVec2::new(4, 2));
        assert_eq!(device.live_objects(), 1);

        texture.release();
        assert!(!texture.is_valid());
        assert_eq!(device.live_objects(), 0);
    }

    #[test]
    fn test_managed_texture_round_trip() {
        let device = GraphicsDevice::headless();
        let desc = TextureDescriptor::new(8, 8, TextureFormat::Alpha8);
        let texture = Texture::new_managed(&device, desc, None).unwrap();
        let before = texture.handle();

        device.lose_context(&mut NoListener);
        assert!(!texture.handle().is_valid());
        assert_eq!(texture.descriptor(), &desc);

        device.restore_context(&mut NoListener);
        assert!(texture.is_valid());
        assert_ne!(texture.handle(), before);
        assert_eq!(texture.descriptor(), &desc);
    }

    #[test]
    fn test_drop_unregisters() {
        let device = GraphicsDevice::headless();
        let desc = TextureDescriptor::new(1, 1, TextureFormat::Rgb8);
        let texture = Texture::new_managed(&device, desc, None).unwrap();
        assert_eq!(device.managed_resource_count(), 1);

        drop(texture);
        assert_eq!(device.managed_resource_count(), 0);
        assert_eq!(device.live_objects(), 0);
    }
}
