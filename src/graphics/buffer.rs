use crate::error::{ContentError, Result};
use crate::graphics::{
    BufferUsage, GpuHandle, GraphicsContextResource, GraphicsDevice, ManagedResourceId,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Managed GPU buffer.
///
/// Size and usage survive a lost context. With a shadow copy the contents
/// are re-uploaded on restore; without one the storage comes back zeroed and
/// the owner must refill it.
#[derive(Debug)]
pub struct GpuBuffer {
    id: ManagedResourceId,
    device: Rc<GraphicsDevice>,
    handle: Cell<GpuHandle>,
    size: usize,
    usage: BufferUsage,
    shadow: Option<RefCell<Vec<u8>>>,
}

impl GpuBuffer {
    pub fn new(device: &Rc<GraphicsDevice>, size: usize, usage: BufferUsage) -> Result<Rc<Self>> {
        Self::create(device, size, usage, None)
    }

    /// Buffer that keeps a CPU copy of its contents for restores
    pub fn with_shadow(
        device: &Rc<GraphicsDevice>,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<Rc<Self>> {
        let buffer = Self::create(device, data.len(), usage, Some(RefCell::new(vec![0; data.len()])))?;
        buffer.write(0, data)?;
        Ok(buffer)
    }

    fn create(
        device: &Rc<GraphicsDevice>,
        size: usize,
        usage: BufferUsage,
        shadow: Option<RefCell<Vec<u8>>>,
    ) -> Result<Rc<Self>> {
        let handle = device.create_buffer(size, usage)?;
        let buffer = Rc::new(Self {
            id: device.allocate_resource_id(),
            device: Rc::clone(device),
            handle: Cell::new(handle),
            size,
            usage,
            shadow,
        });
        let weak = Rc::downgrade(&buffer);
        device.register_managed_resource(buffer.id, weak);
        Ok(buffer)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn handle(&self) -> GpuHandle {
        self.handle.get()
    }

    pub fn is_valid(&self) -> bool {
        self.handle.get().is_live_in(self.device.context_generation())
    }

    pub fn write(&self, offset: usize, data: &[u8]) -> Result<()> {
        let end = match offset.checked_add(data.len()) {
            Some(end) if end <= self.size => end,
            _ => {
                return Err(ContentError::Gpu(format!(
                    "Write of {} bytes at {offset} exceeds buffer size {}",
                    data.len(),
                    self.size
                )))
            }
        };
        if let Some(shadow) = &self.shadow {
            shadow.borrow_mut()[offset..end].copy_from_slice(data);
        }
        self.device.write_buffer(self.handle.get(), offset, data)
    }

    fn rebuild(&self) -> Result<()> {
        let handle = self.device.create_buffer(self.size, self.usage)?;
        self.handle.set(handle);
        if let Some(shadow) = &self.shadow {
            self.device.write_buffer(handle, 0, &shadow.borrow())?;
        }
        Ok(())
    }
}

impl GraphicsContextResource for GpuBuffer {
    fn on_lost_context(&self) {
        self.handle.set(GpuHandle::INVALID);
    }

    fn on_new_context(&self, _device: &GraphicsDevice) {
        if let Err(err) = self.rebuild() {
            tracing::error!(size = self.size, "Failed to recreate GPU buffer: {err}");
        }
    }
}

impl Drop for GpuBuffer {
    fn drop(&mut self) {
        self.device.unregister_managed_resource(self.id);
        self.device.delete(self.handle.replace(GpuHandle::INVALID));
    }
}
