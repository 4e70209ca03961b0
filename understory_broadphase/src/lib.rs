// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Broadphase: a pluggable broadphase index over integer AABBs.
//!
//! A broadphase answers "which of my rectangles might touch this region?" so that
//! exact (narrowphase) tests only run on candidates. Typical use is once per
//! simulation step: move proxies, then ask for everything near an actor or for
//! every overlapping pair.
//!
//! - Register, move, and remove axis-aligned boxes ([`Aabb`]) with a `Copy` payload.
//! - Query by circle ([`IndexGeneric::query_range`]) or point.
//! - List every overlapping pair once ([`IndexGeneric::query_collision_pairs`]).
//!
//! Proxies are addressed by generational [`Key`]s. Removing a proxy makes its key
//! stale; the slot may be reused but old keys never resolve to the new proxy.
//!
//! # Example
//!
//! ```rust
//! use understory_broadphase::{Aabb, Index, SpatialHashConfig};
//!
//! let mut idx = Index::<u32>::with_spatial_hash(SpatialHashConfig::default());
//! let a = idx.add_proxy(Aabb::new(0, 0, 10, 10), 1).unwrap();
//! let b = idx.add_proxy(Aabb::new(5, 5, 10, 10), 2).unwrap();
//! let _far = idx.add_proxy(Aabb::new(100, 100, 5, 5), 3).unwrap();
//!
//! // Everything within 3 units of (7, 7).
//! let mut hits: Vec<_> = idx.query_range(7, 7, 3).map(|(_, p)| p).collect();
//! hits.sort();
//! assert_eq!(hits, [1, 2]);
//!
//! // Every overlapping pair, once.
//! assert_eq!(idx.query_collision_pairs(), [(a, b)]);
//! ```
//!
//! A quadtree covers a fixed world and refuses boxes entirely outside it:
//!
//! ```rust
//! use understory_broadphase::{Aabb, BroadphaseError, Index, QuadtreeConfig};
//!
//! let mut idx = Index::<&str>::with_quadtree(QuadtreeConfig {
//!     world_width: 100,
//!     world_height: 100,
//!     max_depth: 3,
//! });
//! let k = idx.add_proxy(Aabb::new(10, 10, 4, 4), "crate").unwrap();
//!
//! let far = Aabb::new(500, 500, 1, 1);
//! assert_eq!(idx.update_proxy(k, far), Err(BroadphaseError::OutOfBounds(far)));
//! assert_eq!(idx.aabb(k), Some(Aabb::new(10, 10, 4, 4)));
//! ```
//!
//! ## Choosing a backend
//!
//! - [`SpatialHash`]: sparse uniform grid. Unbounded, handles negative coordinates,
//!   cheap updates. Pick a cell size so most boxes span a handful of cells.
//! - [`Quadtree`]: fixed-depth tree over a bounded world. Copes with wildly
//!   different box sizes; boxes straddling quadrant borders stay high in the tree.
//! - [`FlatVec`] (the default for [`Index`]): linear scans. Fine for a few dozen
//!   proxies and the reference the others are tested against.
//! - [`NoOp`]: finds nothing. Measures the index layer alone.
//! - [`AnyBackend`]: any of the above, chosen at runtime from a [`BackendConfig`].
//!
//! `Box<dyn Backend>` is a backend too.
//!
//! ## Features
//!
//! - `kurbo`: conversions between [`Aabb`] and `kurbo::Rect`.
//! - `std` / `libm`: forwarded to Kurbo's float backend.
//!
//! This crate is `no_std` and logs through [`tracing`] without installing a subscriber.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod error;
pub mod index;
pub mod types;

#[cfg(test)]
mod comparison_tests;

pub use backend::{Backend, PairEnumerator};
pub use backends::any::{AnyBackend, BackendConfig};
pub use backends::flatvec::FlatVec;
pub use backends::noop::NoOp;
pub use backends::quadtree::{Quadrant, Quadtree, QuadtreeConfig};
pub use backends::spatial_hash::{Cell, CellRange, SpatialHash, SpatialHashConfig};
pub use error::BroadphaseError;
pub use index::{Index, IndexGeneric, Key, Proxy};
pub use types::{Aabb, Circle};
