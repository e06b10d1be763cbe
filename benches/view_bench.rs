use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lobbymon::models::LobbyRecord;
use lobbymon::view::{reconcile, SortOrder, ViewQuery};

fn synthetic_lobbies(n: usize) -> Vec<LobbyRecord> {
    let regions = ["eu", "us-east", "us-west", "ap", "sa"];
    (0..n)
        .map(|i| LobbyRecord {
            lobby_id: format!("lobby-{i}"),
            ip: format!("10.{}.{}.{}", i / 65536 % 256, i / 256 % 256, i % 256),
            port: format!("{}", 27000 + i % 1000),
            players: (i * 7 % 17) as u32,
            max_players: 16,
            region: regions[i % regions.len()].to_string(),
            steam_id: format!("7656119{i:010}"),
            version: "1.4.2".to_string(),
        })
        .collect()
}

fn benchmark_reconcile_sort(c: &mut Criterion) {
    let items = synthetic_lobbies(1000);
    let query = ViewQuery {
        sort: SortOrder::PlayersDesc,
        ..Default::default()
    };

    c.bench_function("reconcile sort 1k", |b| {
        b.iter(|| reconcile(black_box(&items), black_box(&query), 1, 12))
    });
}

fn benchmark_reconcile_filtered(c: &mut Criterion) {
    let items = synthetic_lobbies(1000);
    let query = ViewQuery {
        search: "270".to_string(),
        region: Some("eu".to_string()),
        sort: SortOrder::PlayersDesc,
    };

    c.bench_function("reconcile filter+sort 1k", |b| {
        b.iter(|| reconcile(black_box(&items), black_box(&query), 3, 12))
    });
}

fn benchmark_reconcile_large(c: &mut Criterion) {
    let items = synthetic_lobbies(10_000);
    let query = ViewQuery::default();

    c.bench_function("reconcile sort 10k", |b| {
        b.iter(|| reconcile(black_box(&items), black_box(&query), 1, 12))
    });
}

criterion_group!(
    benches,
    benchmark_reconcile_sort,
    benchmark_reconcile_filtered,
    benchmark_reconcile_large
);
criterion_main!(benches);
