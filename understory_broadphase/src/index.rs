// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, PairEnumerator};
use crate::backends::any::{AnyBackend, BackendConfig};
use crate::backends::flatvec::FlatVec;
use crate::backends::noop::NoOp;
use crate::backends::quadtree::{Quadtree, QuadtreeConfig};
use crate::backends::spatial_hash::{SpatialHash, SpatialHashConfig};
use crate::error::BroadphaseError;
use crate::types::{Aabb, Circle};

/// Generational handle for proxies.
///
/// A key stays valid until its proxy is removed (or the index is cleared).
/// Slots are reused, but each reuse bumps the slot's generation, so a stale key
/// never resolves to a later proxy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }

    /// The slot number this key addresses; the value backends see.
    pub const fn slot(self) -> usize {
        self.idx()
    }

    /// Generation of the slot when this key was issued.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// A registered AABB together with its caller-supplied payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Proxy<P> {
    aabb: Aabb,
    payload: P,
}

impl<P: Copy> Proxy<P> {
    /// Current geometry.
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// The payload given at insertion.
    pub fn payload(&self) -> P {
        self.payload
    }
}

#[derive(Clone, Debug)]
struct Slot<P> {
    generation: u32,
    proxy: Option<Proxy<P>>,
}

impl<P> Slot<P> {
    /// Take the proxy out and advance the generation.
    ///
    /// The generation saturates; a slot that reaches `u32::MAX` is retired.
    fn vacate(&mut self) -> Option<Proxy<P>> {
        let proxy = self.proxy.take()?;
        self.generation = self.generation.saturating_add(1);
        Some(proxy)
    }

    /// Retired slots are never handed out again, so no key can be reissued.
    fn is_retired(&self) -> bool {
        self.generation == u32::MAX
    }
}

/// A broadphase index parameterized by a spatial backend.
///
/// The index owns every proxy; the backend only sees slot numbers and AABBs.
#[derive(Debug)]
pub struct IndexGeneric<P: Copy + Debug, B: Backend> {
    slots: Vec<Slot<P>>,
    free_list: Vec<usize>,
    len: usize,
    backend: B,
}

impl<P, B> IndexGeneric<P, B>
where
    P: Copy + Debug,
    B: Backend + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::from_backend(B::default())
    }
}

impl<P, B> Default for IndexGeneric<P, B>
where
    P: Copy + Debug,
    B: Backend + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, B> IndexGeneric<P, B>
where
    P: Copy + Debug,
    B: Backend,
{
    /// Create an empty index over an already constructed backend.
    ///
    /// The backend must be empty.
    pub fn from_backend(backend: B) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            backend,
        }
    }

    /// The backend, for introspection.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reserve space for at least `n` more proxies.
    pub fn reserve(&mut self, n: usize) {
        self.slots.reserve(n.saturating_sub(self.free_list.len()));
    }

    /// Number of live proxies.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no proxies.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Register a proxy and return its handle.
    ///
    /// # Errors
    ///
    /// [`BroadphaseError::InvalidAabb`] if the box has a negative extent, and
    /// [`BroadphaseError::OutOfBounds`] if the backend cannot place it (a
    /// quadtree given a box entirely outside its world).
    pub fn add_proxy(&mut self, aabb: Aabb, payload: P) -> Result<Key, BroadphaseError> {
        self.check(&aabb)?;
        let idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            self.slots.push(Slot {
                generation: 1,
                proxy: None,
            });
            self.slots.len() - 1
        };
        let slot = &mut self.slots[idx];
        slot.proxy = Some(Proxy { aabb, payload });
        let key = Key::new(idx, slot.generation);
        self.backend.insert(idx, aabb);
        self.len += 1;
        Ok(key)
    }

    /// Unregister a proxy and hand back its payload.
    ///
    /// # Errors
    ///
    /// [`BroadphaseError::StaleKey`] if `key` does not refer to a live proxy.
    pub fn remove_proxy(&mut self, key: Key) -> Result<P, BroadphaseError> {
        let slot = self.slot_mut(key)?;
        let proxy = slot.vacate().ok_or(BroadphaseError::StaleKey(key))?;
        let retired = slot.is_retired();
        self.backend.remove(key.idx());
        if retired {
            tracing::debug!(slot = key.idx(), "retired slot after exhausting its generations");
        } else {
            self.free_list.push(key.idx());
        }
        self.len -= 1;
        Ok(proxy.payload)
    }

    /// Move a proxy to new geometry, keeping its key.
    ///
    /// # Errors
    ///
    /// [`BroadphaseError::StaleKey`] for a dead key, otherwise the same errors as
    /// [`add_proxy`](Self::add_proxy). On error the proxy keeps its old geometry.
    pub fn update_proxy(&mut self, key: Key, aabb: Aabb) -> Result<(), BroadphaseError> {
        if !self.contains_key(key) {
            return Err(BroadphaseError::StaleKey(key));
        }
        self.check(&aabb)?;
        if let Some(proxy) = self.slot_mut(key)?.proxy.as_mut() {
            proxy.aabb = aabb;
        }
        self.backend.update(key.idx(), aabb);
        Ok(())
    }

    /// Remove every proxy. Outstanding keys become stale.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (i, slot) in self.slots.iter_mut().enumerate().rev() {
            slot.vacate();
            if !slot.is_retired() {
                self.free_list.push(i);
            }
        }
        self.len = 0;
        self.backend.clear();
    }

    /// Whether `key` refers to a live proxy.
    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// The proxy behind `key`, if it is live.
    pub fn get(&self, key: Key) -> Option<&Proxy<P>> {
        let slot = self.slots.get(key.idx())?;
        if slot.generation != key.1 {
            return None;
        }
        slot.proxy.as_ref()
    }

    /// Current geometry of a live proxy.
    pub fn aabb(&self, key: Key) -> Option<Aabb> {
        self.get(key).map(Proxy::aabb)
    }

    /// Payload of a live proxy.
    pub fn payload(&self, key: Key) -> Option<P> {
        self.get(key).map(Proxy::payload)
    }

    /// Every live proxy with its key, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &Proxy<P>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.proxy
                .as_ref()
                .map(|p| (Key::new(i, slot.generation), p))
        })
    }

    /// Proxies whose AABB intersects the circle centered at `(x, y)`.
    ///
    /// Each proxy is yielded once; order is unspecified.
    pub fn query_range(
        &self,
        x: i32,
        y: i32,
        radius: i32,
    ) -> impl Iterator<Item = (Key, P)> + '_ {
        self.query_circle(Circle::new(x, y, radius))
    }

    /// Proxies whose AABB intersects `circle`.
    pub fn query_circle(&self, circle: Circle) -> impl Iterator<Item = (Key, P)> + '_ {
        self.backend.query_circle(circle).filter_map(move |i| {
            let slot = self.slots.get(i)?;
            let proxy = slot.proxy.as_ref()?;
            Some((Key::new(i, slot.generation), proxy.payload))
        })
    }

    /// Proxies whose (closed) AABB contains the point.
    pub fn query_point(&self, x: i32, y: i32) -> impl Iterator<Item = (Key, P)> + '_ {
        self.query_circle(Circle::new(x, y, 0))
    }

    fn check(&self, aabb: &Aabb) -> Result<(), BroadphaseError> {
        if !aabb.is_valid() {
            tracing::debug!(?aabb, "rejected proxy with negative extent");
            return Err(BroadphaseError::InvalidAabb(*aabb));
        }
        if !self.backend.accepts(aabb) {
            tracing::debug!(?aabb, "backend rejected proxy outside its world");
            return Err(BroadphaseError::OutOfBounds(*aabb));
        }
        Ok(())
    }

    fn slot_mut(&mut self, key: Key) -> Result<&mut Slot<P>, BroadphaseError> {
        self.slots
            .get_mut(key.idx())
            .filter(|slot| slot.generation == key.1 && slot.proxy.is_some())
            .ok_or(BroadphaseError::StaleKey(key))
    }
}

impl<P, B> IndexGeneric<P, B>
where
    P: Copy + Debug,
    B: PairEnumerator,
{
    /// Every pair of proxies whose AABBs intersect, each pair once.
    ///
    /// Pairs are ordered `(lower, higher)` by key and sorted.
    pub fn query_collision_pairs(&self) -> Vec<(Key, Key)> {
        self.backend
            .collision_pairs()
            .into_iter()
            .filter_map(|(a, b)| Some((self.key_at(a)?, self.key_at(b)?)))
            .collect()
    }

    fn key_at(&self, idx: usize) -> Option<Key> {
        let slot = self.slots.get(idx)?;
        slot.proxy.as_ref().map(|_| Key::new(idx, slot.generation))
    }
}

/// Default index using a flat vector backend.
pub type Index<P> = IndexGeneric<P, FlatVec>;

impl<P: Copy + Debug> Index<P> {
    /// Create a quadtree-backed index.
    ///
    /// # Panics
    ///
    /// Panics if the world width or height is not positive.
    pub fn with_quadtree(config: QuadtreeConfig) -> IndexGeneric<P, Quadtree> {
        IndexGeneric::from_backend(Quadtree::new(config))
    }

    /// Create a spatial-hash-backed index.
    ///
    /// # Panics
    ///
    /// Panics if the cell width or height is not positive.
    pub fn with_spatial_hash(config: SpatialHashConfig) -> IndexGeneric<P, SpatialHash> {
        IndexGeneric::from_backend(SpatialHash::new(config))
    }

    /// Create an index that tracks keys but finds nothing.
    pub fn with_noop() -> IndexGeneric<P, NoOp> {
        IndexGeneric::from_backend(NoOp)
    }

    /// Create an index whose backend is picked at runtime.
    pub fn with_backend(config: BackendConfig) -> IndexGeneric<P, AnyBackend> {
        IndexGeneric::from_backend(config.build())
    }
}
