// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving actors through a broadphase, one simulation step at a time.
//!
//! Actors are kurbo rectangles drifting with constant velocity and bouncing off
//! the world edges. Every step moves each proxy, then asks which actors are near
//! the player and which pairs overlap.
//!
//! Pick the backend with the first argument (`quadtree`, `spatial_hash`,
//! `flatvec`, or `noop`) and raise the log level with `RUST_LOG=debug`.
//!
//! Run:
//! - `cargo run -p understory_broadphase_demos --example actor_sweep -- quadtree`

use kurbo::{Rect, Vec2};
use tracing_subscriber::EnvFilter;
use understory_broadphase::{Aabb, BackendConfig, Index, QuadtreeConfig, SpatialHashConfig};

const WORLD: f64 = 800.0;
const ACTORS: usize = 200;
const STEPS: usize = 10;

struct Actor {
    rect: Rect,
    velocity: Vec2,
}

impl Actor {
    fn step(&mut self) {
        let moved = self.rect + self.velocity;
        if moved.x0 < 0.0 || moved.x1 > WORLD {
            self.velocity.x = -self.velocity.x;
        }
        if moved.y0 < 0.0 || moved.y1 > WORLD {
            self.velocity.y = -self.velocity.y;
        }
        self.rect = self.rect + self.velocity;
    }
}

fn backend_from_args() -> BackendConfig {
    let world = WORLD as i32;
    match std::env::args().nth(1).as_deref() {
        Some("quadtree") => BackendConfig::Quadtree(QuadtreeConfig {
            world_width: world,
            world_height: world,
            max_depth: 4,
        }),
        Some("flatvec") => BackendConfig::FlatVec,
        Some("noop") => BackendConfig::NoOp,
        _ => BackendConfig::SpatialHash(SpatialHashConfig {
            cell_width: 48,
            cell_height: 48,
        }),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = backend_from_args();
    let mut idx = Index::<usize>::with_backend(config);

    // Deterministic scatter so runs are comparable across backends.
    let mut actors: Vec<Actor> = (0..ACTORS)
        .map(|i| {
            let f = i as f64;
            let x = (f * 97.0) % (WORLD - 40.0);
            let y = (f * 61.0) % (WORLD - 40.0);
            let size = 6.0 + (f * 13.0) % 24.0;
            Actor {
                rect: Rect::new(x, y, x + size, y + size),
                velocity: Vec2::new((f % 7.0) - 3.0, (f % 5.0) - 2.0),
            }
        })
        .collect();

    let keys: Vec<_> = actors
        .iter()
        .enumerate()
        .map(|(i, a)| {
            idx.add_proxy(Aabb::from_rect(a.rect), i)
                .expect("actors start inside the world")
        })
        .collect();

    for step in 0..STEPS {
        for (actor, &key) in actors.iter_mut().zip(&keys) {
            actor.step();
            idx.update_proxy(key, Aabb::from_rect(actor.rect))
                .expect("actors bounce before leaving the world");
        }

        let player = actors[0].rect.center();
        let near = idx
            .query_range(player.x as i32, player.y as i32, 60)
            .filter(|&(_, i)| i != 0)
            .count();
        let pairs = idx.query_collision_pairs();
        tracing::info!(step, near, pairs = pairs.len(), backend = config.name());
        println!(
            "step {step:2}: {near:3} actors near the player, {:4} overlapping pairs",
            pairs.len()
        );
    }
}
