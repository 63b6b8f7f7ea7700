use crate::error::Result;
use crate::graphics::{GpuHandle, GraphicsContextResource, GraphicsDevice, ManagedResourceId};
use std::cell::Cell;
use std::rc::Rc;

/// Managed shader program; keeps its sources and recompiles on restore
#[derive(Debug)]
pub struct ShaderProgram {
    id: ManagedResourceId,
    device: Rc<GraphicsDevice>,
    handle: Cell<GpuHandle>,
    vertex_source: String,
    fragment_source: String,
}

impl ShaderProgram {
    pub fn new(
        device: &Rc<GraphicsDevice>,
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
    ) -> Result<Rc<Self>> {
        let vertex_source = vertex_source.into();
        let fragment_source = fragment_source.into();
        let handle = device.compile_shader(&vertex_source, &fragment_source)?;

        let program = Rc::new(Self {
            id: device.allocate_resource_id(),
            device: Rc::clone(device),
            handle: Cell::new(handle),
            vertex_source,
            fragment_source,
        });
        let weak = Rc::downgrade(&program);
        device.register_managed_resource(program.id, weak);
        Ok(program)
    }

    pub fn handle(&self) -> GpuHandle {
        self.handle.get()
    }

    pub fn is_valid(&self) -> bool {
        self.handle.get().is_live_in(self.device.context_generation())
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }
}

impl GraphicsContextResource for ShaderProgram {
    fn on_lost_context(&self) {
        self.handle.set(GpuHandle::INVALID);
    }

    fn on_new_context(&self, device: &GraphicsDevice) {
        match device.compile_shader(&self.vertex_source, &self.fragment_source) {
            Ok(handle) => self.handle.set(handle),
            Err(err) => tracing::error!("Failed to recompile shader program: {err}"),
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.device.unregister_managed_resource(self.id);
        self.device.delete(self.handle.replace(GpuHandle::INVALID));
    }
}
