//! Slot storage for a single named pool
//!
//! A [`Pool`] only keeps bookkeeping: the ordered slot list and the template
//! used to grow. The resources themselves live in the registry's arena so a
//! resource can change owner (adoption, quarantine) without being moved.

use super::resource::ResourceTemplate;
use super::slot::{ResourceHandle, Slot};

/// Boxed template as stored by a pool
pub(crate) type BoxedTemplate<T> = Box<dyn ResourceTemplate<T>>;

/// A named pool of fungible resources
pub struct Pool<T> {
    name: String,
    template: Option<BoxedTemplate<T>>,
    slots: Vec<Slot>,
}

impl<T> Pool<T> {
    pub(crate) fn new(name: impl Into<String>, template: Option<BoxedTemplate<T>>) -> Self {
        Self {
            name: name.into(),
            template,
            slots: Vec::new(),
        }
    }

    /// Name the pool is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of slots, free and in use
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool holds no slots at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots ready to be acquired
    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.in_use).count()
    }

    /// Number of slots currently checked out
    pub fn in_use_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.in_use).count()
    }

    /// Whether the pool can manufacture new resources
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Slots in insertion order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Whether this pool owns the resource behind `handle`
    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.position(handle).is_some()
    }

    pub(crate) fn set_template(&mut self, template: BoxedTemplate<T>) {
        self.template = Some(template);
    }

    pub(crate) fn manufacture(&self) -> Option<T> {
        self.template.as_ref().map(|template| template.manufacture())
    }

    pub(crate) fn position(&self, handle: ResourceHandle) -> Option<usize> {
        self.slots.iter().position(|slot| slot.handle == handle)
    }

    /// First-fit: mark the earliest free slot in use and return its handle
    pub(crate) fn claim_first_free(&mut self) -> Option<ResourceHandle> {
        let slot = self.slots.iter_mut().find(|slot| !slot.in_use)?;
        slot.in_use = true;
        Some(slot.handle)
    }

    pub(crate) fn slot_of_mut(&mut self, handle: ResourceHandle) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.handle == handle)
    }

    pub(crate) fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub(crate) fn remove(&mut self, handle: ResourceHandle) -> Option<Slot> {
        let index = self.position(handle)?;
        Some(self.slots.remove(index))
    }

    /// Handles of every in-use slot, in insertion order
    pub(crate) fn in_use_handles(&self) -> Vec<ResourceHandle> {
        self.slots.iter().filter(|slot| slot.in_use).map(|slot| slot.handle).collect()
    }

    /// Remove free slots past the first `keep_free`, returning their handles
    pub(crate) fn split_off_free(&mut self, keep_free: usize) -> Vec<ResourceHandle> {
        let mut kept_free = 0;
        let mut removed = Vec::new();
        self.slots.retain(|slot| {
            if slot.in_use {
                return true;
            }
            if kept_free < keep_free {
                kept_free += 1;
                return true;
            }
            removed.push(slot.handle);
            false
        });
        removed
    }

    pub(crate) fn take_slots(&mut self) -> Vec<Slot> {
        std::mem::take(&mut self.slots)
    }
}

impl<T> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name)
            .field("has_template", &self.has_template())
            .field("slots", &self.slots.len())
            .field("in_use", &self.in_use_count())
            .finish()
    }
}
