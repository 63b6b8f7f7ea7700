/// Handle to a GPU-side object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GpuHandle {
    id: u64,
    context_generation: u32,
}

impl GpuHandle {
    /// Sentinel held by objects whose GPU side was lost
    pub const INVALID: GpuHandle = GpuHandle {
        id: 0,
        context_generation: 0,
    };

    pub fn new(id: u64, context_generation: u32) -> Self {
        Self {
            id,
            context_generation,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Generation of the context that created this handle
    pub fn context_generation(&self) -> u32 {
        self.context_generation
    }

    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    /// Check if handle belongs to the given context generation
    pub fn is_live_in(&self, current_generation: u32) -> bool {
        self.is_valid() && self.context_generation == current_generation
    }
}

impl Default for GpuHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Hands out GPU handles. Ids are never reused, even across contexts.
#[derive(Debug)]
pub struct HandleAllocator {
    next_id: u64,
    generation: u32,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            generation: 1,
        }
    }

    pub fn allocate(&mut self) -> GpuHandle {
        let handle = GpuHandle::new(self.next_id, self.generation);
        self.next_id += 1;
        handle
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Start a new context generation; older handles stop being live
    pub fn advance_generation(&mut self) -> u32 {
        self.generation += 1;
        self.generation
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}
