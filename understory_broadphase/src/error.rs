// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for index mutations.

use thiserror::Error;

use crate::index::Key;
use crate::types::Aabb;

/// Errors returned by [`IndexGeneric`](crate::IndexGeneric) mutations.
///
/// None of these are transient; retrying the same call fails the same way.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BroadphaseError {
    /// The backend cannot place this box, e.g. it lies entirely outside a quadtree's world.
    #[error("{0:?} does not intersect the indexed world")]
    OutOfBounds(Aabb),
    /// The box has a negative width or height.
    #[error("{0:?} has a negative extent")]
    InvalidAabb(Aabb),
    /// The key does not refer to a proxy currently owned by this index.
    #[error("{0:?} does not refer to a live proxy")]
    StaleKey(Key),
}
