//! Handle types for the physics arenas
//!
//! Colliders and bodies live in slot maps and are addressed by
//! generation-checked keys, so a handle that outlives its object resolves to
//! `None` instead of aliasing whatever reused the slot.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a collider owned by the collision system
    pub struct ColliderKey;

    /// Handle to a physics body owned by the movement system
    pub struct BodyKey;
}

/// Integer handle returned when registering a callback
///
/// Handles are never reused within one registry, so unregistering a stale
/// handle is a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackHandle(pub u32);

/// Ordered callback registry keyed by [`CallbackHandle`]
pub struct CallbackRegistry<F: ?Sized> {
    next_handle: u32,
    entries: Vec<(CallbackHandle, Box<F>)>,
}

impl<F: ?Sized> CallbackRegistry<F> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            next_handle: 1,
            entries: Vec::new(),
        }
    }

    /// Store a callback and return its handle
    pub fn register(&mut self, callback: Box<F>) -> CallbackHandle {
        let handle = CallbackHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.entries.push((handle, callback));
        handle
    }

    /// Remove a callback; returns `false` for unknown handles
    pub fn unregister(&mut self, handle: CallbackHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    /// Iterate callbacks mutably in registration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<F>> {
        self.entries.iter_mut().map(|(_, callback)| callback)
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: ?Sized> Default for CallbackRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_handles_are_unique() {
        let mut registry: CallbackRegistry<dyn FnMut(u32)> = CallbackRegistry::new();
        let a = registry.register(Box::new(|_| {}));
        let b = registry.register(Box::new(|_| {}));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert!(registry.unregister(a));
        assert!(!registry.unregister(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_stale_key_resolves_to_none() {
        let mut map: SlotMap<ColliderKey, u32> = SlotMap::with_key();
        let key = map.insert(7);
        map.remove(key);
        let _reused = map.insert(8);
        assert!(map.get(key).is_none());
    }
}
