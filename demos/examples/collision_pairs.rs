// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broadphase candidates followed by an exact narrowphase.
//!
//! Builds the same scene in a quadtree and a spatial hash, lists candidate pairs
//! from each, and confirms them with kurbo's float intersection. Both backends
//! must report the same candidates.
//!
//! Run:
//! - `cargo run -p understory_broadphase_demos --example collision_pairs`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_broadphase::{
    Aabb, Index, IndexGeneric, Key, PairEnumerator, QuadtreeConfig, SpatialHashConfig,
};

fn scene() -> Vec<(&'static str, Rect)> {
    vec![
        ("crate", Rect::new(10.0, 10.0, 40.0, 40.0)),
        ("barrel", Rect::new(35.5, 30.0, 55.0, 50.0)),
        ("player", Rect::new(200.0, 120.0, 216.0, 152.0)),
        ("sword", Rect::new(214.2, 130.0, 240.0, 134.0)),
        // Bounding boxes touch after rounding outward, shapes do not.
        ("torch", Rect::new(400.0, 400.0, 409.6, 409.6)),
        ("rope", Rect::new(409.8, 395.0, 420.0, 405.0)),
        ("wall", Rect::new(0.0, 300.0, 512.0, 316.0)),
        ("door", Rect::new(250.0, 290.0, 270.0, 320.0)),
    ]
}

fn candidates<B: PairEnumerator>(
    idx: &mut IndexGeneric<&'static str, B>,
    scene: &[(&'static str, Rect)],
) -> Vec<(Key, Key)> {
    for &(name, rect) in scene {
        idx.add_proxy(Aabb::from_rect(rect), name)
            .expect("scene fits in the world");
    }
    idx.query_collision_pairs()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scene = scene();
    let mut tree = Index::<&'static str>::with_quadtree(QuadtreeConfig {
        world_width: 512,
        world_height: 512,
        max_depth: 4,
    });
    let mut hash = Index::<&'static str>::with_spatial_hash(SpatialHashConfig {
        cell_width: 32,
        cell_height: 32,
    });
    let from_tree = candidates(&mut tree, &scene);
    let from_hash = candidates(&mut hash, &scene);
    assert_eq!(from_tree, from_hash, "backends disagree on candidates");

    for (a, b) in from_hash {
        let (Some(ra), Some(rb)) = (hash.get(a), hash.get(b)) else {
            continue;
        };
        let (na, nb) = (ra.payload(), rb.payload());
        let exact = scene[a.slot()].1.intersect(scene[b.slot()].1);
        let verdict = if exact.area() > 0.0 { "overlap" } else { "miss" };
        println!("{na:>6} / {nb:<6} broadphase candidate, narrowphase {verdict}");
    }
}
