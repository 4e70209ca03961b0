// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend traits for spatial indexing implementations.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::types::{Aabb, Circle};

/// Spatial backend abstraction used by `IndexGeneric`.
///
/// Backends track slot numbers handed out by the index together with their
/// geometry. The index owns proxies and payloads; a backend only decides where a
/// slot lives and which slots a query can see.
///
/// The trait is object safe, so `Box<dyn Backend>` works as a backend too.
pub trait Backend {
    /// Whether the backend can place a proxy with this geometry.
    ///
    /// Called before `insert` and `update`; a rejected box is never passed on.
    fn accepts(&self, _aabb: &Aabb) -> bool {
        true
    }

    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb);

    /// Update an existing slot's AABB.
    fn update(&mut self, slot: usize, aabb: Aabb);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Query slots whose AABB intersects the circle. Each slot is yielded at most once.
    fn query_circle<'a>(&'a self, circle: Circle) -> Box<dyn Iterator<Item = usize> + 'a>;
}

/// Backends that can list every intersecting pair of stored slots in one pass.
pub trait PairEnumerator: Backend {
    /// Every unordered pair of intersecting slots exactly once, as `(lower, higher)`,
    /// sorted ascending.
    fn collision_pairs(&self) -> Vec<(usize, usize)>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn accepts(&self, aabb: &Aabb) -> bool {
        (**self).accepts(aabb)
    }
    fn insert(&mut self, slot: usize, aabb: Aabb) {
        (**self).insert(slot, aabb);
    }
    fn update(&mut self, slot: usize, aabb: Aabb) {
        (**self).update(slot, aabb);
    }
    fn remove(&mut self, slot: usize) {
        (**self).remove(slot);
    }
    fn clear(&mut self) {
        (**self).clear();
    }
    fn query_circle<'a>(&'a self, circle: Circle) -> Box<dyn Iterator<Item = usize> + 'a> {
        (**self).query_circle(circle)
    }
}
