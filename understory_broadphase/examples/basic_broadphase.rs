// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Broadphase: add, move, query, and list pairs.

use understory_broadphase::{Aabb, Index, SpatialHashConfig};

fn main() {
    let mut idx = Index::<u32>::with_spatial_hash(SpatialHashConfig::default());
    let k1 = idx.add_proxy(Aabb::new(0, 0, 10, 10), 1).unwrap();
    let _k2 = idx.add_proxy(Aabb::new(5, 5, 10, 10), 2).unwrap();
    let _k3 = idx.add_proxy(Aabb::new(100, 100, 5, 5), 3).unwrap();

    println!("pairs: {:?}", idx.query_collision_pairs());

    // Move box 1 away from box 2
    idx.update_proxy(k1, Aabb::new(200, 0, 10, 10)).unwrap();
    println!("pairs after move: {:?}", idx.query_collision_pairs());

    // Query a circle
    let hits: Vec<_> = idx.query_range(7, 7, 3).collect();
    println!("hits near (7,7): {:?}", hits);
}
