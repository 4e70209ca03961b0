// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized comparisons of every backend against the linear scan.

use alloc::vec::Vec;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::{Backend, PairEnumerator};
use crate::backends::any::{AnyBackend, BackendConfig};
use crate::backends::flatvec::FlatVec;
use crate::backends::quadtree::QuadtreeConfig;
use crate::backends::spatial_hash::{SpatialHash, SpatialHashConfig};
use crate::index::{Index, IndexGeneric, Key};
use crate::types::{Aabb, Circle};

const WORLD: i32 = 512;

fn configs() -> [BackendConfig; 4] {
    [
        BackendConfig::Quadtree(QuadtreeConfig {
            world_width: WORLD,
            world_height: WORLD,
            max_depth: 4,
        }),
        BackendConfig::Quadtree(QuadtreeConfig {
            world_width: WORLD,
            world_height: 300,
            max_depth: 6,
        }),
        BackendConfig::SpatialHash(SpatialHashConfig {
            cell_width: 32,
            cell_height: 32,
        }),
        BackendConfig::SpatialHash(SpatialHashConfig {
            cell_width: 7,
            cell_height: 13,
        }),
    ]
}

/// A box that always touches the world, sometimes poking out of it.
fn random_aabb(rng: &mut StdRng) -> Aabb {
    let w = rng.random_range(0..60);
    let h = rng.random_range(0..60);
    let x = rng.random_range(-w..WORLD);
    let y = rng.random_range(-h..300);
    Aabb::new(x, y, w, h)
}

fn random_circle(rng: &mut StdRng) -> Circle {
    let radius = match rng.random_range(0..10) {
        0 => 0,
        1 => rng.random_range(200..800),
        _ => rng.random_range(1..40),
    };
    Circle::new(
        rng.random_range(-40..WORLD + 40),
        rng.random_range(-40..340),
        radius,
    )
}

fn hits<B: Backend>(idx: &IndexGeneric<u32, B>, circle: Circle) -> Vec<(Key, u32)> {
    let mut v: Vec<_> = idx.query_circle(circle).collect();
    v.sort_unstable();
    v
}

fn assert_same_answers(
    idx: &IndexGeneric<u32, AnyBackend>,
    reference: &Index<u32>,
    rng: &mut StdRng,
    label: &str,
) {
    for _ in 0..100 {
        let circle = random_circle(rng);
        let got = hits(idx, circle);
        let want = hits(reference, circle);
        assert_eq!(got, want, "{label}: query {circle:?}");
    }
}

#[test]
fn queries_match_linear_scan() {
    for (seed, config) in configs().into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(0xB0A0 + seed as u64);
        let mut idx = Index::<u32>::with_backend(config);
        let mut reference = Index::<u32>::new();
        for i in 0..400 {
            let aabb = random_aabb(&mut rng);
            let a = idx.add_proxy(aabb, i).unwrap();
            let b = reference.add_proxy(aabb, i).unwrap();
            assert_eq!(a, b, "keys are allocated independently of the backend");
        }
        assert_same_answers(&idx, &reference, &mut rng, config.name());
    }
}

#[test]
fn mixed_updates_match_linear_scan() {
    for (seed, config) in configs().into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(0x5EED + seed as u64);
        let mut idx = Index::<u32>::with_backend(config);
        let mut reference = Index::<u32>::new();
        let mut live: Vec<Key> = Vec::new();
        let mut next_payload = 0_u32;
        for round in 0..20 {
            for _ in 0..50 {
                match rng.random_range(0..4) {
                    0 | 1 if !live.is_empty() => {
                        let k = live[rng.random_range(0..live.len())];
                        let aabb = random_aabb(&mut rng);
                        idx.update_proxy(k, aabb).unwrap();
                        reference.update_proxy(k, aabb).unwrap();
                    }
                    2 if !live.is_empty() => {
                        let k = live.swap_remove(rng.random_range(0..live.len()));
                        assert_eq!(idx.remove_proxy(k), reference.remove_proxy(k));
                    }
                    _ => {
                        let aabb = random_aabb(&mut rng);
                        let k = idx.add_proxy(aabb, next_payload).unwrap();
                        assert_eq!(reference.add_proxy(aabb, next_payload), Ok(k));
                        live.push(k);
                        next_payload += 1;
                    }
                }
            }
            assert_eq!(idx.len(), reference.len(), "round {round}");
            assert_same_answers(&idx, &reference, &mut rng, config.name());
        }
    }
}

#[test]
fn pairs_match_linear_scan() {
    for (seed, config) in configs().into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(0x9A1 + seed as u64);
        let mut idx = Index::<u32>::with_backend(config);
        let mut reference = Index::<u32>::new();
        let mut keys = Vec::new();
        for i in 0..300 {
            let aabb = random_aabb(&mut rng);
            keys.push(idx.add_proxy(aabb, i).unwrap());
            reference.add_proxy(aabb, i).unwrap();
        }
        // Punch holes so slot order and key order both get exercised.
        for k in keys.iter().step_by(7) {
            idx.remove_proxy(*k).unwrap();
            reference.remove_proxy(*k).unwrap();
        }
        let got = idx.query_collision_pairs();
        let want = reference.query_collision_pairs();
        assert!(!want.is_empty(), "dense enough to overlap");
        assert_eq!(got, want, "{}", config.name());
    }
}

fn payloads<B: Backend>(idx: &IndexGeneric<u32, B>, circle: Circle) -> Vec<u32> {
    let mut v: Vec<_> = idx.query_circle(circle).map(|(_, p)| p).collect();
    v.sort_unstable();
    v
}

fn payload_pairs<B: PairEnumerator>(idx: &IndexGeneric<u32, B>) -> Vec<(u32, u32)> {
    let mut v: Vec<_> = idx
        .query_collision_pairs()
        .into_iter()
        .map(|(a, b)| {
            let (pa, pb) = (idx.payload(a).unwrap(), idx.payload(b).unwrap());
            (pa.min(pb), pa.max(pb))
        })
        .collect();
    v.sort_unstable();
    v
}

#[test]
fn update_matches_remove_then_add() {
    for (seed, config) in configs().into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(0xD0DE + seed as u64);
        let mut moved = Index::<u32>::with_backend(config);
        let mut readded = Index::<u32>::with_backend(config);
        let mut moved_keys = Vec::new();
        let mut readded_keys = Vec::new();
        for p in 0..150_u32 {
            let aabb = random_aabb(&mut rng);
            moved_keys.push(moved.add_proxy(aabb, p).unwrap());
            readded_keys.push(readded.add_proxy(aabb, p).unwrap());
        }
        for round in 0..10 {
            for _ in 0..60 {
                let p: u32 = rng.random_range(0..150);
                let aabb = random_aabb(&mut rng);
                moved.update_proxy(moved_keys[p as usize], aabb).unwrap();
                assert_eq!(readded.remove_proxy(readded_keys[p as usize]), Ok(p));
                readded_keys[p as usize] = readded.add_proxy(aabb, p).unwrap();
            }
            for _ in 0..50 {
                let circle = random_circle(&mut rng);
                assert_eq!(
                    payloads(&moved, circle),
                    payloads(&readded, circle),
                    "{} round {round}: {circle:?}",
                    config.name()
                );
            }
            assert_eq!(
                payload_pairs(&moved),
                payload_pairs(&readded),
                "{} round {round}",
                config.name()
            );
        }
        assert_eq!(moved.len(), readded.len());
    }
}

#[test]
fn spatial_hash_pairs_with_negative_coordinates() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut hash = SpatialHash::new(SpatialHashConfig {
        cell_width: 16,
        cell_height: 16,
    });
    let mut flat = FlatVec::default();
    for slot in 0..250 {
        let aabb = Aabb::new(
            rng.random_range(-200..200),
            rng.random_range(-200..200),
            rng.random_range(0..50),
            rng.random_range(0..50),
        );
        hash.insert(slot, aabb);
        flat.insert(slot, aabb);
    }
    assert_eq!(hash.collision_pairs(), flat.collision_pairs());
}

#[test]
fn insert_then_remove_everything_leaves_nothing_behind() {
    for (seed, config) in configs().into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(0xC1EA + seed as u64);
        let mut idx = Index::<u32>::with_backend(config);
        let keys: Vec<_> = (0..200)
            .map(|i| idx.add_proxy(random_aabb(&mut rng), i).unwrap())
            .collect();
        for k in keys {
            idx.remove_proxy(k).unwrap();
        }
        assert!(idx.is_empty(), "{}", config.name());
        assert_eq!(idx.query_circle(Circle::new(0, 0, 10_000)).count(), 0);
        match idx.backend() {
            AnyBackend::Quadtree(tree) => assert_eq!(tree.item_count(), 0),
            AnyBackend::SpatialHash(hash) => assert_eq!(hash.cell_count(), 0),
            other => unreachable!("unexpected backend {other:?}"),
        }
    }
}
