//! Performance benchmarks for the pure aggregation paths.
//!
//! These benchmarks measure:
//! - Catalogue grouping at different catalogue sizes
//! - Exact base-unit formatting
//! - A cache hit through the read-through layer

use alloy_primitives::U256;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use explorer_gateway::cache::{
    CacheKey, InMemoryCacheStore, ReadThroughCache, ResourceKind, SystemClock,
};
use explorer_gateway::domain::{format_units, format_units_str, NATIVE_DECIMALS};
use explorer_gateway::error::ServiceError;
use explorer_gateway::metrics::Metrics;
use explorer_gateway::models::CatalogueItem;
use explorer_gateway::services::group_catalogue;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const COLLECTIONS: [&str; 4] = ["Diamond NFT", "Carbon NFT", "Green NFT", "Gold NFT"];

fn catalogue(size: usize) -> Vec<CatalogueItem> {
    (0..size)
        .map(|i| CatalogueItem {
            address: Some(format!("0x{:040x}", i)),
            name: Some(COLLECTIONS[i % COLLECTIONS.len()].to_string()),
            symbol: Some(format!("SYM{}", i % 8)),
            total_supply: (i as u64) * 10,
            holders: i as u64,
        })
        .collect()
}

fn bench_group_catalogue(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_catalogue");

    for size in [10, 100, 1000] {
        let items = catalogue(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| group_catalogue(items));
        });
    }

    group.finish();
}

fn bench_format_units(c: &mut Criterion) {
    let amount = U256::from(1_234_567_890_123_456_789_000u128);
    c.bench_function("format_units_u256", |b| {
        b.iter(|| format_units(amount, NATIVE_DECIMALS));
    });

    c.bench_function("format_units_str", |b| {
        b.iter(|| format_units_str("1500000000000000000", NATIVE_DECIMALS));
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = ReadThroughCache::new(
        Arc::new(InMemoryCacheStore::new()),
        Arc::new(SystemClock),
        Metrics::new(),
    );
    let key = CacheKey::new(ResourceKind::Balance, "mainnet", ["0xabc"]);
    let ttl = Duration::from_secs(3600);

    rt.block_on(async {
        cache
            .read_through(&key, ttl, || async {
                Ok::<Value, ServiceError>(json!({"address": "0xabc", "balance": "1.5"}))
            })
            .await
            .unwrap();
    });

    c.bench_function("read_through_cache_hit", |b| {
        b.to_async(&rt).iter(|| async {
            let _ = cache
                .read_through(&key, ttl, || async {
                    Ok::<Value, ServiceError>(Value::Null)
                })
                .await;
        });
    });
}

criterion_group!(
    benches,
    bench_group_catalogue,
    bench_format_units,
    bench_cache_hit
);
criterion_main!(benches);
