//! Resource capabilities
//!
//! A pooled resource only has to know how to switch itself on and off and how
//! to release whatever it holds outside the pool. Manufacturing is the job of a
//! separate [`ResourceTemplate`], so one resource type can be built from
//! several templates (a "small asteroid" and a "large asteroid" pool can share
//! the same `Asteroid` type).

use std::sync::Arc;

/// Lifecycle hooks the registry calls on pooled resources
///
/// All hooks default to no-ops. They must not call back into the registry.
pub trait Poolable {
    /// Called when the resource is handed out by an acquire
    fn activate(&mut self) {}

    /// Called when the resource is parked in a pool, including right after manufacture
    fn deactivate(&mut self) {}

    /// Called once, just before the registry drops the resource for good
    fn destroy(&mut self) {}
}

impl<R: Poolable + ?Sized> Poolable for Box<R> {
    fn activate(&mut self) {
        (**self).activate();
    }

    fn deactivate(&mut self) {
        (**self).deactivate();
    }

    fn destroy(&mut self) {
        (**self).destroy();
    }
}

/// Prototype that manufactures fresh resources for a pool
///
/// Any `Fn() -> T` closure or function is a template.
pub trait ResourceTemplate<T>: Send + Sync {
    /// Build a new resource instance
    fn manufacture(&self) -> T;
}

impl<T, F> ResourceTemplate<T> for F
where
    F: Fn() -> T + Send + Sync,
{
    fn manufacture(&self) -> T {
        self()
    }
}

/// Template that clones a prototype value
#[derive(Debug, Clone)]
pub struct CloneTemplate<T> {
    prototype: T,
}

impl<T> CloneTemplate<T> {
    /// Create a template from a prototype
    pub fn new(prototype: T) -> Self {
        Self { prototype }
    }

    /// Get the prototype every manufactured resource is cloned from
    pub fn prototype(&self) -> &T {
        &self.prototype
    }
}

impl<T: Clone + Send + Sync> ResourceTemplate<T> for CloneTemplate<T> {
    fn manufacture(&self) -> T {
        self.prototype.clone()
    }
}

/// Template shared between several pools or a [`crate::TemplateCatalog`]
pub struct SharedTemplate<T>(Arc<dyn ResourceTemplate<T>>);

impl<T> SharedTemplate<T> {
    /// Wrap a template so it can be handed to many pools
    pub fn new(template: impl ResourceTemplate<T> + 'static) -> Self {
        Self(Arc::new(template))
    }
}

impl<T> Clone for SharedTemplate<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> std::fmt::Debug for SharedTemplate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTemplate")
            .field("holders", &Arc::strong_count(&self.0))
            .finish()
    }
}

impl<T> ResourceTemplate<T> for SharedTemplate<T> {
    fn manufacture(&self) -> T {
        self.0.manufacture()
    }
}
