//! Slots and resource handles

use crate::foundation::collections::ResourceKey;
use slotmap::Key;

/// Non-owning handle to a pooled resource
///
/// Handles are cheap to copy and carry a generation, so a handle kept past the
/// destruction of its resource is recognized as stale instead of aliasing a
/// newer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    key: ResourceKey,
}

impl ResourceHandle {
    pub(crate) fn new(key: ResourceKey) -> Self {
        Self { key }
    }

    pub(crate) fn key(self) -> ResourceKey {
        self.key
    }

    /// A handle that never refers to a live resource
    pub fn null() -> Self {
        Self { key: ResourceKey::null() }
    }

    /// Check whether this is the null handle
    pub fn is_null(self) -> bool {
        self.key.is_null()
    }
}

impl Default for ResourceHandle {
    fn default() -> Self {
        Self::null()
    }
}

/// One resource of a pool together with its in-use flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub(crate) handle: ResourceHandle,
    pub(crate) in_use: bool,
}

impl Slot {
    pub(crate) fn free(handle: ResourceHandle) -> Self {
        Self { handle, in_use: false }
    }

    pub(crate) fn taken(handle: ResourceHandle) -> Self {
        Self { handle, in_use: true }
    }

    /// Handle of the resource held by this slot
    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }

    /// Whether the resource is currently checked out
    pub fn is_in_use(&self) -> bool {
        self.in_use
    }
}
