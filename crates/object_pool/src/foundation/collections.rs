//! Specialized collection types

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generation-checked key of a resource owned by a registry
    pub struct ResourceKey;
}

/// Arena holding every resource a registry owns, free or checked out
pub type ResourceArena<T> = SlotMap<ResourceKey, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_key_is_not_reused() {
        let mut arena: ResourceArena<u32> = ResourceArena::with_key();
        let first = arena.insert(1);
        arena.remove(first);

        let second = arena.insert(2);
        assert_ne!(first, second);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&2));
    }
}
