// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! No-op backend: accepts every call, stores nothing, finds nothing.
//!
//! Useful as a timing baseline that measures the cost of the index layer alone
//! (key allocation and payload storage) without any spatial bookkeeping.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::iter;

use crate::backend::{Backend, PairEnumerator};
use crate::types::{Aabb, Circle};

/// Backend that performs no spatial bookkeeping and answers every query with nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOp;

impl Backend for NoOp {
    fn insert(&mut self, _slot: usize, _aabb: Aabb) {}
    fn update(&mut self, _slot: usize, _aabb: Aabb) {}
    fn remove(&mut self, _slot: usize) {}
    fn clear(&mut self) {}
    fn query_circle<'a>(&'a self, _circle: Circle) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(iter::empty())
    }
}

impl PairEnumerator for NoOp {
    fn collision_pairs(&self) -> Vec<(usize, usize)> {
        Vec::new()
    }
}
