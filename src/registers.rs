//! Register allocator for the shader generators
//!
//! Hands out ids for the GLSL variables holding intermediate distance values.
//! Freed ids are recycled before the counter grows, so the number of live
//! registers in the generated shader is bounded by the deepest operator
//! fan-in along a root-to-leaf path, not by the primitive count. The
//! generators are responsible for balanced allocate/free pairing.
//!
//! Author: Moroya Sakamoto

/// Monotone counter plus free-list. No upper bound is enforced here.
#[derive(Debug, Default)]
pub struct RegisterAllocator {
    next: usize,
    free_list: Vec<usize>,
    allocated: usize,
    freed: usize,
}

impl RegisterAllocator {
    /// Fresh allocator with no ids handed out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a register id, recycling a freed one when available.
    pub fn allocate(&mut self) -> usize {
        self.allocated += 1;
        if let Some(id) = self.free_list.pop() {
            return id;
        }
        let id = self.next;
        self.next += 1;
        id
    }

    /// Return a register id for reuse.
    pub fn free(&mut self, id: usize) {
        self.freed += 1;
        self.free_list.push(id);
    }

    /// Forget all state, as if freshly constructed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Total `allocate` calls since construction or reset.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Total `free` calls since construction or reset.
    pub fn freed(&self) -> usize {
        self.freed
    }
}
