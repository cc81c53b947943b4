//! 密码哈希与登录路径性能基准测试
//!
//! 登录耗时由 Argon2 决定，未知用户与已知用户应处于同一量级。

use std::sync::Arc;

use chrono::Duration;
use criterion::{Criterion, criterion_group, criterion_main};
use urlshortener::services::{AccountService, SessionConfig, SessionService};
use urlshortener::storage::MemoryStore;
use urlshortener::utils::password::{hash_password, verify_password};

fn bench_hash(c: &mut Criterion) {
    c.bench_function("password/hash", |b| {
        b.iter(|| hash_password("correct horse battery").expect("hash should succeed"));
    });
}

fn bench_verify(c: &mut Criterion) {
    let hash = hash_password("correct horse battery").expect("hash should succeed");
    let mut group = c.benchmark_group("password/verify");

    group.bench_function("match", |b| {
        b.iter(|| assert!(verify_password("correct horse battery", &hash).unwrap()));
    });
    group.bench_function("mismatch", |b| {
        b.iter(|| assert!(!verify_password("wrong", &hash).unwrap()));
    });

    group.finish();
}

fn bench_login(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("failed to build runtime");
    let sessions = Arc::new(SessionService::new(&SessionConfig::new(
        b"bench_secret".to_vec(),
        Duration::minutes(60),
    )));
    let accounts = AccountService::new(Arc::new(MemoryStore::new()), sessions);
    rt.block_on(accounts.register("alice", "s3cret"))
        .expect("register should succeed");

    let mut group = c.benchmark_group("account/login");
    group.sample_size(20);

    group.bench_function("known_user", |b| {
        b.to_async(&rt)
            .iter(|| async { accounts.login("alice", "s3cret").await.unwrap() });
    });
    group.bench_function("unknown_user", |b| {
        b.to_async(&rt)
            .iter(|| async { accounts.login("nobody", "s3cret").await.unwrap_err() });
    });

    group.finish();
}

criterion_group!(benches, bench_hash, bench_verify, bench_login);
criterion_main!(benches);
