//! Recycling of tween allocations
//!
//! Finished animations hand their box back to a per-type free list so a
//! steady stream of short tweens does not churn the allocator. Each list is
//! bounded; releases beyond the capacity are simply dropped.

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use tracing::trace;

/// Default number of pooled instances kept per concrete type
pub const DEFAULT_POOL_CAPACITY: usize = 64;

/// Per-type free lists of boxed animatables
pub struct TweenPool {
    free: FxHashMap<TypeId, Vec<Box<dyn Any>>>,
    capacity: usize,
}

impl TweenPool {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: FxHashMap::default(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take a pooled instance, or a fresh default one on a miss
    pub fn acquire<U: Default + 'static>(&mut self) -> Box<U> {
        let reused = self
            .free
            .get_mut(&TypeId::of::<U>())
            .and_then(|list| list.pop())
            .and_then(|boxed| boxed.downcast::<U>().ok());

        match reused {
            Some(instance) => instance,
            None => {
                trace!(ty = std::any::type_name::<U>(), "pool miss");
                Box::default()
            }
        }
    }

    /// Hand an instance back. The caller is expected to have recycled it.
    pub fn release<U: 'static>(&mut self, instance: Box<U>) {
        let list = self.free.entry(TypeId::of::<U>()).or_default();
        if list.len() < self.capacity {
            list.push(instance);
        }
    }

    /// Number of pooled instances of `U`
    pub fn pooled<U: 'static>(&self) -> usize {
        self.free.get(&TypeId::of::<U>()).map_or(0, Vec::len)
    }

    /// Drop every pooled instance
    pub fn clear(&mut self) {
        self.free.clear();
    }
}

impl Default for TweenPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TweenPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenPool")
            .field("types", &self.free.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
