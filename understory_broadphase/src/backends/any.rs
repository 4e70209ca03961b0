// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend chosen at runtime.
//!
//! [`BackendConfig`] describes which strategy to build and with which
//! parameters; [`AnyBackend`] holds the result and forwards every call to it.
//! Use this when the strategy comes from user settings or a benchmark matrix.
//! When the strategy is known at compile time, name the concrete backend instead.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::backend::{Backend, PairEnumerator};
use crate::backends::flatvec::FlatVec;
use crate::backends::noop::NoOp;
use crate::backends::quadtree::{Quadtree, QuadtreeConfig};
use crate::backends::spatial_hash::{SpatialHash, SpatialHashConfig};
use crate::types::{Aabb, Circle};

/// Which backend to build, with its construction parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    /// A [`Quadtree`] over a bounded world.
    Quadtree(QuadtreeConfig),
    /// A [`SpatialHash`] with the given cell size.
    SpatialHash(SpatialHashConfig),
    /// The linear-scan [`FlatVec`].
    FlatVec,
    /// The [`NoOp`] baseline.
    NoOp,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::SpatialHash(SpatialHashConfig::default())
    }
}

impl BackendConfig {
    /// Build the configured backend.
    pub fn build(self) -> AnyBackend {
        match self {
            Self::Quadtree(config) => AnyBackend::Quadtree(Quadtree::new(config)),
            Self::SpatialHash(config) => AnyBackend::SpatialHash(SpatialHash::new(config)),
            Self::FlatVec => AnyBackend::FlatVec(FlatVec::default()),
            Self::NoOp => AnyBackend::NoOp(NoOp),
        }
    }

    /// Short lowercase name, handy for logs and benchmark labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quadtree(_) => "quadtree",
            Self::SpatialHash(_) => "spatial_hash",
            Self::FlatVec => "flatvec",
            Self::NoOp => "noop",
        }
    }
}

/// One of the crate's backends, selected at runtime.
#[derive(Debug)]
pub enum AnyBackend {
    /// See [`Quadtree`].
    Quadtree(Quadtree),
    /// See [`SpatialHash`].
    SpatialHash(SpatialHash),
    /// See [`FlatVec`].
    FlatVec(FlatVec),
    /// See [`NoOp`].
    NoOp(NoOp),
}

impl Default for AnyBackend {
    fn default() -> Self {
        BackendConfig::default().build()
    }
}

impl From<BackendConfig> for AnyBackend {
    fn from(config: BackendConfig) -> Self {
        config.build()
    }
}

impl AnyBackend {
    fn inner(&self) -> &dyn Backend {
        match self {
            Self::Quadtree(b) => b,
            Self::SpatialHash(b) => b,
            Self::FlatVec(b) => b,
            Self::NoOp(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Backend {
        match self {
            Self::Quadtree(b) => b,
            Self::SpatialHash(b) => b,
            Self::FlatVec(b) => b,
            Self::NoOp(b) => b,
        }
    }
}

impl Backend for AnyBackend {
    fn accepts(&self, aabb: &Aabb) -> bool {
        self.inner().accepts(aabb)
    }
    fn insert(&mut self, slot: usize, aabb: Aabb) {
        self.inner_mut().insert(slot, aabb);
    }
    fn update(&mut self, slot: usize, aabb: Aabb) {
        self.inner_mut().update(slot, aabb);
    }
    fn remove(&mut self, slot: usize) {
        self.inner_mut().remove(slot);
    }
    fn clear(&mut self) {
        self.inner_mut().clear();
    }
    fn query_circle<'a>(&'a self, circle: Circle) -> Box<dyn Iterator<Item = usize> + 'a> {
        self.inner().query_circle(circle)
    }
}

impl PairEnumerator for AnyBackend {
    fn collision_pairs(&self) -> Vec<(usize, usize)> {
        match self {
            Self::Quadtree(b) => b.collision_pairs(),
            Self::SpatialHash(b) => b.collision_pairs(),
            Self::FlatVec(b) => b.collision_pairs(),
            Self::NoOp(b) => b.collision_pairs(),
        }
    }
}
