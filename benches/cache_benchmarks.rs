// Criterion benchmarks exercising the full cache family under a Zipf-skewed
// mixed read/write workload.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polycache::config::{ArcCacheConfig, HashLfuCacheConfig, HashLruCacheConfig, LruKCacheConfig};
use polycache::{ArcCache, CachePolicy, HashLfuCache, HashLruCache, LfuCache, LruCache, LruKCache};
use std::num::NonZeroUsize;

const CACHE_SIZE: usize = 1_000;
const NUM_OPERATIONS: usize = 10_000;

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn make_lru(cap: usize) -> LruCache<usize, usize> {
    LruCache::new(nz(cap))
}

fn make_lfu(cap: usize) -> LfuCache<usize, usize> {
    LfuCache::new(nz(cap))
}

fn make_arc(half_capacity: usize) -> ArcCache<usize, usize> {
    ArcCache::from_config(ArcCacheConfig::new(nz(half_capacity), 2))
}

fn make_lru_k(main_cap: usize, history_cap: usize, k: usize) -> LruKCache<usize, usize> {
    LruKCache::from_config(LruKCacheConfig::new(nz(main_cap), nz(history_cap), k))
}

fn make_hash_lru(total_cap: usize, shards: usize) -> HashLruCache<usize, usize> {
    HashLruCache::from_config(HashLruCacheConfig::new(nz(total_cap), shards))
}

fn make_hash_lfu(total_cap: usize, shards: usize) -> HashLfuCache<usize, usize> {
    HashLfuCache::from_config(HashLfuCacheConfig::new(nz(total_cap), shards))
}

// Simple linear congruential generator for reproducible benchmarks.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345) & 0x7fff_ffff;
        self.state
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (0x7fff_ffff_u64 as f64)
    }
}

// Generates a Zipf-skewed key sequence over `0..n` via inverse transform
// sampling, so a small "hot set" dominates accesses the way real key
// distributions tend to.
fn zipf_sample(n: usize, skew: f64) -> Vec<usize> {
    let mut rng = SimpleRng::new(42);

    let mut norm: f64 = 0.0;
    for i in 1..=n {
        norm += 1.0 / (i as f64).powf(skew);
    }

    let mut samples = Vec::with_capacity(NUM_OPERATIONS);
    for _ in 0..NUM_OPERATIONS {
        let u: f64 = rng.next_f64();
        let mut sum: f64 = 0.0;
        let mut sample: usize = 1;

        while sample <= n {
            sum += 1.0 / (sample as f64).powf(skew) / norm;
            if sum >= u {
                break;
            }
            sample += 1;
        }

        samples.push(sample.saturating_sub(1) % n);
    }

    samples
}

fn benchmark_caches(c: &mut Criterion) {
    let samples = zipf_sample(CACHE_SIZE * 2, 0.8);

    let mut group = c.benchmark_group("Cache Mixed Access");

    group.bench_function("LRU", |b| {
        b.iter(|| {
            let cache = make_lru(CACHE_SIZE);
            for &idx in &samples {
                if idx % 4 == 0 {
                    cache.put(idx, idx);
                } else {
                    black_box(cache.try_get(&idx));
                }
            }
        });
    });

    group.bench_function("LFU", |b| {
        b.iter(|| {
            let cache = make_lfu(CACHE_SIZE);
            for &idx in &samples {
                if idx % 4 == 0 {
                    cache.put(idx, idx);
                } else {
                    black_box(cache.try_get(&idx));
                }
            }
        });
    });

    group.bench_function("ARC", |b| {
        b.iter(|| {
            let cache = make_arc(CACHE_SIZE / 2);
            for &idx in &samples {
                if idx % 4 == 0 {
                    cache.put(idx, idx);
                } else {
                    black_box(cache.try_get(&idx));
                }
            }
        });
    });

    group.bench_function("LRU-K", |b| {
        b.iter(|| {
            let cache = make_lru_k(CACHE_SIZE, CACHE_SIZE, 2);
            for &idx in &samples {
                if idx % 4 == 0 {
                    cache.put(idx, idx);
                } else {
                    black_box(cache.try_get(&idx));
                }
            }
        });
    });

    group.bench_function("Sharded LRU (4 shards)", |b| {
        b.iter(|| {
            let cache = make_hash_lru(CACHE_SIZE, 4);
            for &idx in &samples {
                if idx % 4 == 0 {
                    cache.put(idx, idx);
                } else {
                    black_box(cache.try_get(&idx));
                }
            }
        });
    });

    group.bench_function("Sharded LFU (4 shards)", |b| {
        b.iter(|| {
            let cache = make_hash_lfu(CACHE_SIZE, 4);
            for &idx in &samples {
                if idx % 4 == 0 {
                    cache.put(idx, idx);
                } else {
                    black_box(cache.try_get(&idx));
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_caches);
criterion_main!(benches);
