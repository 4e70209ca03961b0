// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_broadphase::{
    Aabb, Backend, Index, IndexGeneric, Key, PairEnumerator, QuadtreeConfig, SpatialHashConfig,
};

const WORLD: i32 = 2048;

fn quadtree() -> QuadtreeConfig {
    QuadtreeConfig {
        world_width: WORLD,
        world_height: WORLD,
        max_depth: 5,
    }
}

fn spatial_hash() -> SpatialHashConfig {
    SpatialHashConfig {
        cell_width: 32,
        cell_height: 32,
    }
}

fn gen_grid_rects(n: usize, cell: i32) -> Vec<Aabb> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n as i32 {
        for x in 0..n as i32 {
            out.push(Aabb::new(x * cell, y * cell, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound.max(1) as u64) as i32
    }
}

fn gen_random_rects(count: usize, max_size: i32) -> Vec<Aabb> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let w = 1 + rng.below(max_size);
            let h = 1 + rng.below(max_size);
            Aabb::new(2 + rng.below(WORLD - w - 4), 2 + rng.below(WORLD - h - 4), w, h)
        })
        .collect()
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: i32) -> Vec<Aabb> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let cx = spread + rng.below(WORLD - 2 * spread);
        let cy = spread + rng.below(WORLD - 2 * spread);
        for _ in 0..per_cluster {
            let dx = rng.below(spread) - spread / 2;
            let dy = rng.below(spread) - spread / 2;
            out.push(Aabb::new(cx + dx, cy + dy, 12, 12));
        }
    }
    out
}

fn fill<B: Backend>(idx: &mut IndexGeneric<u32, B>, rects: &[Aabb]) -> Vec<Key> {
    rects
        .iter()
        .zip(0_u32..)
        .map(|(r, i)| idx.add_proxy(*r, i).expect("benchmark rects lie inside the world"))
        .collect()
}

fn bench_insert_query<B: Backend>(
    c: &mut Criterion,
    name: &str,
    make: impl Fn() -> IndexGeneric<u32, B> + Copy,
) {
    let mut group = c.benchmark_group(format!("{name}_insert_query"));
    for &n in &[32_usize, 64] {
        let rects = gen_grid_rects(n, 10);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter_batched(
                make,
                |mut idx| {
                    fill(&mut idx, &rects);
                    black_box(idx.query_range(300, 300, 200).count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_random_rects(4096, 24);
    group.bench_function("random", |b| {
        b.iter_batched(
            make,
            |mut idx| {
                fill(&mut idx, &rects);
                black_box(idx.query_range(1000, 1000, 200).count());
            },
            BatchSize::SmallInput,
        )
    });
    let rects = gen_clustered_rects(16, 256, 128);
    group.bench_function("clustered", |b| {
        b.iter_batched(
            make,
            |mut idx| {
                fill(&mut idx, &rects);
                black_box(idx.query_range(1000, 1000, 200).count());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_update_heavy<B: Backend>(
    c: &mut Criterion,
    name: &str,
    make: impl Fn() -> IndexGeneric<u32, B> + Copy,
) {
    let mut group = c.benchmark_group(format!("{name}_update_heavy"));
    let rects = gen_random_rects(4096, 24);
    group.bench_function("jitter_every_proxy", |b| {
        b.iter_batched(
            || {
                let mut idx = make();
                let keys = fill(&mut idx, &rects);
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (j, (k, r)) in keys.into_iter().zip(&rects).enumerate() {
                    let dx = (j % 5) as i32 - 2;
                    let dy = ((j * 7) % 5) as i32 - 2;
                    idx.update_proxy(k, r.translate(dx, dy))
                        .expect("jitter stays inside the world");
                }
                black_box(idx.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query_heavy<B: Backend>(
    c: &mut Criterion,
    name: &str,
    make: impl Fn() -> IndexGeneric<u32, B> + Copy,
) {
    let mut group = c.benchmark_group(format!("{name}_query_heavy"));
    let rects = gen_grid_rects(128, 8);
    let mut idx = make();
    fill(&mut idx, &rects);
    group.bench_function("many_small_circles", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in 0..256 {
                let x = (q % 64) * 16;
                let y = (q / 64) * 16;
                total += idx.query_range(x, y, 24).count();
            }
            black_box(total);
        })
    });
    group.finish();
}

fn bench_pairs<B: PairEnumerator>(
    c: &mut Criterion,
    name: &str,
    make: impl Fn() -> IndexGeneric<u32, B> + Copy,
) {
    let mut group = c.benchmark_group(format!("{name}_pairs"));
    for (label, rects) in [
        ("random", gen_random_rects(2048, 24)),
        ("clustered", gen_clustered_rects(8, 256, 128)),
    ] {
        let mut idx = make();
        fill(&mut idx, &rects);
        group.bench_function(label, |b| {
            b.iter(|| black_box(idx.query_collision_pairs().len()))
        });
    }
    group.finish();
}

fn bench_quadtree(c: &mut Criterion) {
    let make = || Index::<u32>::with_quadtree(quadtree());
    bench_insert_query(c, "quadtree", make);
    bench_update_heavy(c, "quadtree", make);
    bench_query_heavy(c, "quadtree", make);
    bench_pairs(c, "quadtree", make);
}

fn bench_spatial_hash(c: &mut Criterion) {
    let make = || Index::<u32>::with_spatial_hash(spatial_hash());
    bench_insert_query(c, "spatial_hash", make);
    bench_update_heavy(c, "spatial_hash", make);
    bench_query_heavy(c, "spatial_hash", make);
    bench_pairs(c, "spatial_hash", make);
}

fn bench_flatvec(c: &mut Criterion) {
    let make = Index::<u32>::new;
    bench_insert_query(c, "flatvec", make);
    bench_query_heavy(c, "flatvec", make);
}

fn bench_noop(c: &mut Criterion) {
    let make = Index::<u32>::with_noop;
    bench_insert_query(c, "noop", make);
    bench_update_heavy(c, "noop", make);
}

criterion_group!(
    benches,
    bench_quadtree,
    bench_spatial_hash,
    bench_flatvec,
    bench_noop,
);
criterion_main!(benches);
