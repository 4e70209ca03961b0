// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans. Small, simple, and the reference
//!   the other backends are tested against.
//! - `quadtree`: fixed-depth quadtree over a bounded world, built eagerly.
//! - `spatial_hash`: sparse uniform grid with origin/foreign buckets; unbounded,
//!   negative coordinates welcome.
//! - `noop`: stores nothing; a timing baseline for the index layer.
//! - `any`: runtime choice between the above.
//!
//! Every backend here also implements [`PairEnumerator`](crate::PairEnumerator).

pub mod any;
pub mod flatvec;
pub mod noop;
pub mod quadtree;
pub mod spatial_hash;

pub use any::{AnyBackend, BackendConfig};
pub use quadtree::{Quadrant, Quadtree, QuadtreeConfig};
pub use spatial_hash::{Cell, CellRange, SpatialHash, SpatialHashConfig};
