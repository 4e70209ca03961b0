// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend with sparse, lazily allocated cells.
//!
//! A proxy is registered in every cell its AABB overlaps. Each cell splits its
//! entries into an *origin* list (the cell holds the proxy's top-left corner, its
//! home cell) and a *foreign* list (the proxy merely passes through). Queries and
//! pair enumeration use the split to visit each proxy or pair exactly once without
//! a result-side visited set:
//!
//! - A range query scanning the cell rectangle `R` reports a foreign entry only in
//!   the first cell of `R` that the proxy covers, namely its home cell clamped into `R`.
//! - Two proxies meet in several cells only if both are foreign in all but at most
//!   one of them. A foreign/foreign pair is reported only in the first cell both
//!   cover: the componentwise max of their home cells.
//!
//! Both rules depend only on cell coordinates, not on iteration order.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::backend::{Backend, PairEnumerator};
use crate::types::{Aabb, Circle};

/// Construction parameters for [`SpatialHash`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpatialHashConfig {
    /// Cell width in world units.
    pub cell_width: i32,
    /// Cell height in world units.
    pub cell_height: i32,
}

impl Default for SpatialHashConfig {
    fn default() -> Self {
        Self {
            cell_width: 64,
            cell_height: 64,
        }
    }
}

/// Integer grid cell coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Cell {
    /// Create a cell coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Inclusive rectangle of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    /// Top-left cell.
    pub min: Cell,
    /// Bottom-right cell (inclusive).
    pub max: Cell,
}

impl CellRange {
    /// Whether `cell` lies in the range.
    pub fn contains(&self, cell: Cell) -> bool {
        self.min.x <= cell.x && cell.x <= self.max.x && self.min.y <= cell.y && cell.y <= self.max.y
    }

    /// Number of cells in the range.
    pub fn area(&self) -> u64 {
        let w = i64::from(self.max.x) - i64::from(self.min.x) + 1;
        let h = i64::from(self.max.y) - i64::from(self.min.y) + 1;
        w.max(0).unsigned_abs() * h.max(0).unsigned_abs()
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Cell::new(x, y)))
    }

    /// First cell of this range covered by a proxy whose home cell is `home`,
    /// assuming the proxy covers at least one cell of the range.
    fn first_covered(&self, home: Cell) -> Cell {
        Cell::new(home.x.max(self.min.x), home.y.max(self.min.y))
    }
}

#[derive(Default, Debug)]
struct Bucket {
    origin: Vec<usize>,
    foreign: Vec<usize>,
}

impl Bucket {
    fn is_empty(&self) -> bool {
        self.origin.is_empty() && self.foreign.is_empty()
    }
}

/// Sparse uniform grid backend.
///
/// Cells are created on first use and dropped when their last entry leaves, so
/// memory follows the occupied area rather than the world extent. Negative
/// coordinates are supported; cells use floor division.
pub struct SpatialHash {
    cell_w: i32,
    cell_h: i32,
    slots: Vec<Option<Aabb>>,
    cells: HashMap<Cell, Bucket, FxBuildHasher>,
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(SpatialHashConfig::default())
    }
}

impl SpatialHash {
    /// Create an empty grid with the given cell size.
    ///
    /// # Panics
    ///
    /// Panics if the cell width or height is not positive.
    pub fn new(config: SpatialHashConfig) -> Self {
        assert!(
            config.cell_width > 0 && config.cell_height > 0,
            "cell sizes must be positive"
        );
        tracing::debug!(
            cell_width = config.cell_width,
            cell_height = config.cell_height,
            "created spatial hash"
        );
        Self {
            cell_w: config.cell_width,
            cell_h: config.cell_height,
            slots: Vec::new(),
            cells: HashMap::default(),
        }
    }

    /// Cell width and height.
    pub fn cell_size(&self) -> (i32, i32) {
        (self.cell_w, self.cell_h)
    }

    /// Number of allocated (non-empty) cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell containing the point.
    #[inline]
    pub fn cell_of(&self, x: i32, y: i32) -> Cell {
        Cell::new(x.div_euclid(self.cell_w), y.div_euclid(self.cell_h))
    }

    /// Cells overlapped by `aabb`.
    pub fn range_of(&self, aabb: &Aabb) -> CellRange {
        CellRange {
            min: self.cell_of(aabb.x, aabb.y),
            max: self.cell_of(aabb.right(), aabb.bottom()),
        }
    }

    /// Cells overlapped by the bounding square of `circle`.
    ///
    /// Computed from the square's corners rather than [`Circle::bounds`], so radii
    /// too large for an `i32` extent still reach the right cells.
    pub fn range_of_circle(&self, circle: &Circle) -> CellRange {
        let r = circle.radius.max(0);
        CellRange {
            min: self.cell_of(circle.x.saturating_sub(r), circle.y.saturating_sub(r)),
            max: self.cell_of(circle.x.saturating_add(r), circle.y.saturating_add(r)),
        }
    }

    /// Home cell of a stored slot.
    pub fn home_cell(&self, slot: usize) -> Option<Cell> {
        self.aabb(slot).map(|a| self.cell_of(a.x, a.y))
    }

    /// Cells a stored slot is registered in.
    pub fn cell_range(&self, slot: usize) -> Option<CellRange> {
        self.aabb(slot).map(|a| self.range_of(&a))
    }

    /// `(origin, foreign)` entry counts of an allocated cell.
    pub fn bucket_sizes(&self, cell: Cell) -> Option<(usize, usize)> {
        self.cells
            .get(&cell)
            .map(|b| (b.origin.len(), b.foreign.len()))
    }

    fn aabb(&self, slot: usize) -> Option<Aabb> {
        self.slots.get(slot).copied().flatten()
    }

    fn register(&mut self, slot: usize, aabb: &Aabb) {
        let range = self.range_of(aabb);
        for cell in range.iter() {
            let bucket = self.cells.entry(cell).or_default();
            if cell == range.min {
                bucket.origin.push(slot);
            } else {
                bucket.foreign.push(slot);
            }
        }
    }

    fn unregister(&mut self, slot: usize, aabb: &Aabb) {
        let range = self.range_of(aabb);
        for cell in range.iter() {
            let Some(bucket) = self.cells.get_mut(&cell) else {
                continue;
            };
            let list = if cell == range.min {
                &mut bucket.origin
            } else {
                &mut bucket.foreign
            };
            if let Some(pos) = list.iter().position(|&s| s == slot) {
                list.swap_remove(pos);
            }
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    fn scan_bucket(
        &self,
        cell: Cell,
        bucket: &Bucket,
        range: &CellRange,
        circle: &Circle,
        out: &mut Vec<usize>,
    ) {
        for &s in &bucket.origin {
            if let Some(a) = self.aabb(s)
                && a.intersects_circle(circle)
            {
                out.push(s);
            }
        }
        for &s in &bucket.foreign {
            let Some(a) = self.aabb(s) else { continue };
            if range.first_covered(self.cell_of(a.x, a.y)) == cell && a.intersects_circle(circle) {
                out.push(s);
            }
        }
    }
}

impl Backend for SpatialHash {
    fn insert(&mut self, slot: usize, aabb: Aabb) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(aabb);
        self.register(slot, &aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb) {
        self.remove(slot);
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(old) = self.aabb(slot) {
            self.unregister(slot, &old);
            self.slots[slot] = None;
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.cells.clear();
        tracing::trace!("cleared spatial hash");
    }

    fn query_circle<'a>(&'a self, circle: Circle) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        if circle.radius < 0 {
            return Box::new(out.into_iter());
        }
        let range = self.range_of_circle(&circle);
        // Walk whichever is smaller: the cells under the circle or the occupied cells.
        if range.area() <= self.cells.len() as u64 {
            for cell in range.iter() {
                if let Some(bucket) = self.cells.get(&cell) {
                    self.scan_bucket(cell, bucket, &range, &circle, &mut out);
                }
            }
        } else {
            for (&cell, bucket) in &self.cells {
                if range.contains(cell) {
                    self.scan_bucket(cell, bucket, &range, &circle, &mut out);
                }
            }
        }
        Box::new(out.into_iter())
    }
}

impl PairEnumerator for SpatialHash {
    fn collision_pairs(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut push = |a: usize, b: usize| out.push((a.min(b), a.max(b)));
        for (&cell, bucket) in &self.cells {
            // Origin entries meet everything else in this cell exactly once.
            for (i, &a) in bucket.origin.iter().enumerate() {
                let Some(aa) = self.aabb(a) else { continue };
                for &b in bucket.origin[i + 1..].iter().chain(&bucket.foreign) {
                    if self.aabb(b).is_some_and(|bb| aa.intersects(&bb)) {
                        push(a, b);
                    }
                }
            }
            for (i, &a) in bucket.foreign.iter().enumerate() {
                let Some(aa) = self.aabb(a) else { continue };
                let home_a = self.cell_of(aa.x, aa.y);
                for &b in &bucket.foreign[i + 1..] {
                    let Some(bb) = self.aabb(b) else { continue };
                    let home_b = self.cell_of(bb.x, bb.y);
                    let first_shared = Cell::new(home_a.x.max(home_b.x), home_a.y.max(home_b.y));
                    if first_shared == cell && aa.intersects(&bb) {
                        push(a, b);
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }
}

impl Debug for SpatialHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|e| e.is_some()).count();
        f.debug_struct("SpatialHash")
            .field("cell_w", &self.cell_w)
            .field("cell_h", &self.cell_h)
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}
