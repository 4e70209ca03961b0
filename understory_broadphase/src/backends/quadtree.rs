// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-depth quadtree backend.
//!
//! The full tree is built up front: every node down to `max_depth` exists for the
//! lifetime of the backend, so memory is paid regardless of occupancy and nodes are
//! never split or merged. A proxy is stored in the deepest node whose bounds
//! [`contain`](Aabb::contains) it. Proxies straddling a quadrant boundary float up
//! to the shallowest ancestor that holds them whole, which makes the tree root-heavy
//! for large proxies.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, PairEnumerator};
use crate::types::{Aabb, Circle};

/// Construction parameters for [`Quadtree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuadtreeConfig {
    /// World width; the root covers `[0, world_width]`.
    pub world_width: i32,
    /// World height; the root covers `[0, world_height]`.
    pub world_height: i32,
    /// Number of subdivision levels below the root.
    ///
    /// The tree holds `4^0 + 4^1 + ... + 4^max_depth` nodes.
    pub max_depth: u8,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            world_width: 1024,
            world_height: 1024,
            max_depth: 4,
        }
    }
}

/// Position of a child node within its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Top-left.
    NorthWest,
    /// Top-right.
    NorthEast,
    /// Bottom-left.
    SouthWest,
    /// Bottom-right.
    SouthEast,
}

impl Quadrant {
    /// All quadrants in child storage order.
    pub const ALL: [Self; 4] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthWest,
        Self::SouthEast,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const ROOT: Self = Self(0);

    const fn get(self) -> usize {
        self.0
    }
}

struct Node {
    bounds: Aabb,
    children: Option<[NodeIdx; 4]>,
    items: Vec<usize>,
}

impl Node {
    fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            children: None,
            items: Vec::new(),
        }
    }
}

/// Split `b` into NW, NE, SW, SE quadrants that tile it exactly.
///
/// Bounds are closed, so the east and south halves start one unit past the
/// west and north halves. Returns `None` for boxes too thin to split.
fn quadrants(b: Aabb) -> Option<[Aabb; 4]> {
    if b.width < 1 || b.height < 1 {
        return None;
    }
    let hw = b.width / 2;
    let hh = b.height / 2;
    let ew = b.width - hw - 1;
    let sh = b.height - hh - 1;
    let ex = b.x + hw + 1;
    let sy = b.y + hh + 1;
    Some([
        Aabb::new(b.x, b.y, hw, hh),
        Aabb::new(ex, b.y, ew, hh),
        Aabb::new(b.x, sy, hw, sh),
        Aabb::new(ex, sy, ew, sh),
    ])
}

/// Quadtree backend with a fixed subdivision depth.
pub struct Quadtree {
    max_depth: u8,
    arena: Vec<Node>,
    slots: Vec<Option<Aabb>>,
}

impl Default for Quadtree {
    fn default() -> Self {
        Self::new(QuadtreeConfig::default())
    }
}

impl Quadtree {
    /// Build the complete tree for the given world.
    ///
    /// # Panics
    ///
    /// Panics if the world width or height is not positive.
    pub fn new(config: QuadtreeConfig) -> Self {
        assert!(
            config.world_width > 0 && config.world_height > 0,
            "world size must be positive"
        );
        let root = Aabb::new(0, 0, config.world_width, config.world_height);
        let mut arena = vec![Node::new(root)];
        let mut stack = vec![(NodeIdx::ROOT, 0_u8)];
        while let Some((idx, depth)) = stack.pop() {
            if depth >= config.max_depth {
                continue;
            }
            let Some(quads) = quadrants(arena[idx.get()].bounds) else {
                continue;
            };
            let first = arena.len();
            arena.extend(quads.into_iter().map(Node::new));
            let children = [
                NodeIdx(first),
                NodeIdx(first + 1),
                NodeIdx(first + 2),
                NodeIdx(first + 3),
            ];
            arena[idx.get()].children = Some(children);
            stack.extend(children.into_iter().map(|c| (c, depth + 1)));
        }
        tracing::debug!(
            world_width = config.world_width,
            world_height = config.world_height,
            max_depth = config.max_depth,
            nodes = arena.len(),
            "built quadtree"
        );
        Self {
            max_depth: config.max_depth,
            arena,
            slots: Vec::new(),
        }
    }

    /// Root bounds (the world).
    pub fn bounds(&self) -> Aabb {
        self.arena[NodeIdx::ROOT.get()].bounds
    }

    /// Configured subdivision depth.
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Number of nodes in the tree, occupied or not.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of slots stored across all nodes.
    pub fn item_count(&self) -> usize {
        self.arena.iter().map(|n| n.items.len()).sum()
    }

    /// Route from the root to the node storing `slot`. Empty means the root itself.
    pub fn path_of(&self, slot: usize) -> Option<Vec<Quadrant>> {
        let aabb = self.slots.get(slot).copied().flatten()?;
        let mut path = Vec::new();
        let mut node = NodeIdx::ROOT;
        loop {
            let n = &self.arena[node.get()];
            if n.items.contains(&slot) {
                return Some(path);
            }
            let children = n.children?;
            let (quadrant, child) = Quadrant::ALL
                .into_iter()
                .zip(children)
                .find(|(_, c)| self.arena[c.get()].bounds.contains(&aabb))?;
            path.push(quadrant);
            node = child;
        }
    }

    fn ensure_slot(&mut self, slot: usize, aabb: Aabb) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(aabb);
    }

    fn place(&mut self, slot: usize, aabb: &Aabb) {
        let mut node = NodeIdx::ROOT;
        while let Some(children) = self.arena[node.get()].children {
            // Siblings are disjoint, so at most one can contain the box.
            match children
                .into_iter()
                .find(|c| self.arena[c.get()].bounds.contains(aabb))
            {
                Some(child) => node = child,
                None => break,
            }
        }
        self.arena[node.get()].items.push(slot);
    }

    /// Erase `slot` from the first node holding it among those intersecting `old`.
    fn remove_node(&mut self, slot: usize, old: &Aabb) -> bool {
        let mut stack = vec![NodeIdx::ROOT];
        while let Some(i) = stack.pop() {
            let n = &mut self.arena[i.get()];
            if !n.bounds.intersects(old) {
                continue;
            }
            if let Some(pos) = n.items.iter().position(|&s| s == slot) {
                n.items.swap_remove(pos);
                return true;
            }
            if let Some(children) = n.children {
                stack.extend(children);
            }
        }
        false
    }

    fn aabb(&self, slot: usize) -> Option<Aabb> {
        self.slots.get(slot).copied().flatten()
    }
}

impl Backend for Quadtree {
    fn accepts(&self, aabb: &Aabb) -> bool {
        self.bounds().intersects(aabb)
    }

    fn insert(&mut self, slot: usize, aabb: Aabb) {
        self.ensure_slot(slot, aabb);
        self.place(slot, &aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb) {
        self.remove(slot);
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(old) = self.aabb(slot) {
            let found = self.remove_node(slot, &old);
            debug_assert!(found, "slot {slot} missing from the quadtree");
            self.slots[slot] = None;
        }
    }

    fn clear(&mut self) {
        for node in &mut self.arena {
            node.items.clear();
        }
        self.slots.clear();
        tracing::trace!(nodes = self.arena.len(), "cleared quadtree");
    }

    fn query_circle<'a>(&'a self, circle: Circle) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        let mut stack = vec![NodeIdx::ROOT];
        while let Some(i) = stack.pop() {
            let n = &self.arena[i.get()];
            let visible = n.bounds.intersects_circle(&circle);
            // The root also keeps proxies poking outside the world, so its own
            // items are always tested.
            if !visible && i != NodeIdx::ROOT {
                continue;
            }
            for &s in &n.items {
                if let Some(a) = self.aabb(s)
                    && a.intersects_circle(&circle)
                {
                    out.push(s);
                }
            }
            if visible && let Some(children) = n.children {
                stack.extend(children);
            }
        }
        Box::new(out.into_iter())
    }
}

impl PairEnumerator for Quadtree {
    /// Two stored boxes can only intersect when one lives in an ancestor of (or the
    /// same node as) the other, since sibling bounds are disjoint.
    fn collision_pairs(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        // Items of the nodes on the current root-to-node path.
        let mut ancestors: Vec<(usize, Aabb)> = Vec::new();
        let mut stack = vec![(NodeIdx::ROOT, 0_usize)];
        while let Some((i, depth_len)) = stack.pop() {
            ancestors.truncate(depth_len);
            let n = &self.arena[i.get()];
            let local: Vec<(usize, Aabb)> = n
                .items
                .iter()
                .filter_map(|&s| self.aabb(s).map(|a| (s, a)))
                .collect();
            for (k, (a, aa)) in local.iter().enumerate() {
                for (b, bb) in local[k + 1..].iter().chain(ancestors.iter()) {
                    if aa.intersects(bb) {
                        out.push(((*a).min(*b), (*a).max(*b)));
                    }
                }
            }
            ancestors.extend(local);
            if let Some(children) = n.children {
                let len = ancestors.len();
                stack.extend(children.into_iter().map(|c| (c, len)));
            }
        }
        out.sort_unstable();
        out
    }
}

impl Debug for Quadtree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.slots.iter().filter(|e| e.is_some()).count();
        f.debug_struct("Quadtree")
            .field("bounds", &self.bounds())
            .field("max_depth", &self.max_depth)
            .field("nodes", &self.arena.len())
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}
