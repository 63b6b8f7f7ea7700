//! Graphics device and the lost/new context protocol
//!
//! Mobile and embedded GL platforms destroy the graphics context when the
//! application is suspended. Every GPU-backed object keeps enough CPU-side
//! state to rebuild itself and implements [`GraphicsContextResource`]:
//!
//! - `on_lost_context` drops the GPU handle without touching the dead context
//! - `on_new_context` recreates the GPU object from the retained state
//!
//! Objects opt in by registering with the [`GraphicsDevice`]. Within one pass
//! resources are visited in registration order, with no dependency ordering,
//! so composite resources re-resolve what they depend on inside their own
//! callbacks.

use crate::error::{ContentError, Result};
use crate::graphics::{
    BufferUsage, GpuBackend, GpuHandle, GpuObjectInfo, HeadlessBackend, TextureDescriptor,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// GPU-backed object that survives context loss
pub trait GraphicsContextResource {
    /// Invalidate the GPU handle. The context is already gone; no GPU calls.
    fn on_lost_context(&self);

    /// Recreate the GPU object from retained CPU-side state
    fn on_new_context(&self, device: &GraphicsDevice);
}

/// Receives the context events after the registered resources
pub trait ContextListener {
    fn on_lost_context(&mut self);
    fn on_new_context(&mut self);
}

/// Registration id of a managed resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ManagedResourceId(u64);

impl ManagedResourceId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

struct ManagedEntry {
    id: ManagedResourceId,
    resource: Weak<dyn GraphicsContextResource>,
}

pub struct GraphicsDevice {
    backend: RefCell<Box<dyn GpuBackend>>,
    managed: RefCell<Vec<ManagedEntry>>,
    next_resource_id: Cell<u64>,
}

impl GraphicsDevice {
    pub fn new(backend: impl GpuBackend + 'static) -> Rc<Self> {
        Rc::new(Self {
            backend: RefCell::new(Box::new(backend)),
            managed: RefCell::new(Vec::new()),
            next_resource_id: Cell::new(1),
        })
    }

    /// Device over a [`HeadlessBackend`]
    pub fn headless() -> Rc<Self> {
        Self::new(HeadlessBackend::new())
    }

    /// Rendering is only allowed while this is true
    pub fn has_context(&self) -> bool {
        self.backend.borrow().has_context()
    }

    pub fn context_generation(&self) -> u32 {
        self.backend.borrow().context_generation()
    }

    pub fn create_texture(
        &self,
        desc: &TextureDescriptor,
        pixels: Option<&[u8]>,
    ) -> Result<GpuHandle> {
        self.backend.borrow_mut().create_texture(desc, pixels)
    }

    pub fn upload_texture(&self, handle: GpuHandle, pixels: &[u8]) -> Result<()> {
        self.backend.borrow_mut().upload_texture(handle, pixels)
    }

    pub fn create_buffer(&self, size: usize, usage: BufferUsage) -> Result<GpuHandle> {
        self.backend.borrow_mut().create_buffer(size, usage)
    }

    pub fn write_buffer(&self, handle: GpuHandle, offset: usize, data: &[u8]) -> Result<()> {
        self.backend.borrow_mut().write_buffer(handle, offset, data)
    }

    pub fn compile_shader(&self, vertex_source: &str, fragment_source: &str) -> Result<GpuHandle> {
        self.backend
            .borrow_mut()
            .compile_shader(vertex_source, fragment_source)
    }

    pub fn create_render_target(&self, desc: &TextureDescriptor) -> Result<GpuHandle> {
        self.backend.borrow_mut().create_render_target(desc)
    }

    pub fn delete(&self, handle: GpuHandle) {
        if handle.is_valid() {
            self.backend.borrow_mut().delete(handle);
        }
    }

    pub fn live_objects(&self) -> usize {
        self.backend.borrow().live_objects()
    }

    pub fn object_info(&self, handle: GpuHandle) -> Option<GpuObjectInfo> {
        self.backend.borrow().object_info(handle)
    }

    pub fn allocate_resource_id(&self) -> ManagedResourceId {
        let id = self.next_resource_id.get();
        self.next_resource_id.set(id + 1);
        ManagedResourceId(id)
    }

    /// Add a resource to the lifecycle fan-out.
    ///
    /// # Panics
    /// If the id or the resource itself is already registered.
    pub fn register_managed_resource(
        &self,
        id: ManagedResourceId,
        resource: Weak<dyn GraphicsContextResource>,
    ) {
        if let Err(err) = self.try_register_managed_resource(id, resource) {
            panic!("{err}");
        }
    }

    pub fn try_register_managed_resource(
        &self,
        id: ManagedResourceId,
        resource: Weak<dyn GraphicsContextResource>,
    ) -> Result<()> {
        let mut managed = self.managed.borrow_mut();
        if managed
            .iter()
            .any(|entry| entry.id == id || Weak::ptr_eq(&entry.resource, &resource))
        {
            return Err(ContentError::ResourceAlreadyRegistered(id.raw()));
        }
        managed.push(ManagedEntry { id, resource });
        Ok(())
    }

    /// Remove a resource from the fan-out; returns false if it was not registered
    pub fn unregister_managed_resource(&self, id: ManagedResourceId) -> bool {
        let mut managed = self.managed.borrow_mut();
        let before = managed.len();
        managed.retain(|entry| entry.id != id);
        managed.len() != before
    }

    pub fn managed_resource_count(&self) -> usize {
        self.managed.borrow().len()
    }

    // Callbacks may register or drop resources, so passes run over a snapshot.
    fn managed_snapshot(&self) -> Vec<Rc<dyn GraphicsContextResource>> {
        self.managed
            .borrow()
            .iter()
            .filter_map(|entry| entry.resource.upgrade())
            .collect()
    }

    /// Platform reported the context gone.
    ///
    /// Registered resources are invalidated first, then `listener`.
    pub fn lose_context(&self, listener: &mut dyn ContextListener) {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("device_lost_context").entered();

        self.backend.borrow_mut().context_lost();
        let resources = self.managed_snapshot();
        tracing::info!(
            resources = resources.len(),
            "Graphics context lost; invalidating managed resources"
        );
        for resource in &resources {
            resource.on_lost_context();
        }
        listener.on_lost_context();
    }

    /// Platform handed back a fresh context
    pub fn restore_context(&self, listener: &mut dyn ContextListener) {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("device_new_context").entered();

        self.backend.borrow_mut().context_restored();
        let resources = self.managed_snapshot();
        tracing::info!(
            generation = self.context_generation(),
            resources = resources.len(),
            "Graphics context restored; rebuilding managed resources"
        );
        for resource in &resources {
            resource.on_new_context(self);
        }
        listener.on_new_context();
    }
}

impl fmt::Debug for GraphicsDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = self.backend.try_borrow().ok();
        f.debug_struct("GraphicsDevice")
            .field("has_context", &backend.as_ref().map(|b| b.has_context()))
            .field(
                "context_generation",
                &backend.as_ref().map(|b| b.context_generation()),
            )
            .field(
                "managed_resources",
                &self.managed.try_borrow().map(|m| m.len()).ok(),
            )
            .finish()
    }
}
