use crate::error::Result;
use crate::graphics::{
    GpuHandle, GraphicsContextResource, GraphicsDevice, ManagedResourceId, TextureDescriptor,
};
use glam::UVec2;
use std::cell::Cell;
use std::rc::Rc;

/// Managed off-screen render target (framebuffer plus color storage)
#[derive(Debug)]
pub struct RenderTarget {
    id: ManagedResourceId,
    device: Rc<GraphicsDevice>,
    handle: Cell<GpuHandle>,
    descriptor: TextureDescriptor,
}

impl RenderTarget {
    pub fn new(device: &Rc<GraphicsDevice>, descriptor: TextureDescriptor) -> Result<Rc<Self>> {
        let handle = device.create_render_target(&descriptor)?;
        let target = Rc::new(Self {
            id: device.allocate_resource_id(),
            device: Rc::clone(device),
            handle: Cell::new(handle),
            descriptor,
        });
        let weak = Rc::downgrade(&target);
        device.register_managed_resource(target.id, weak);
        Ok(target)
    }

    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    pub fn size(&self) -> UVec2 {
        self.descriptor.size
    }

    pub fn handle(&self) -> GpuHandle {
        self.handle.get()
    }

    pub fn is_valid(&self) -> bool {
        self.handle.get().is_live_in(self.device.context_generation())
    }
}

impl GraphicsContextResource for RenderTarget {
    fn on_lost_context(&self) {
        self.handle.set(GpuHandle::INVALID);
    }

    fn on_new_context(&self, device: &GraphicsDevice) {
        match device.create_render_target(&self.descriptor) {
            Ok(handle) => self.handle.set(handle),
            Err(err) => tracing::error!(
                width = self.descriptor.size.x,
                height = self.descriptor.size.y,
                "Failed to recreate render target: {err}"
            ),
        }
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        self.device.unregister_managed_resource(self.id);
        self.device.delete(self.handle.replace(GpuHandle::INVALID));
    }
}
