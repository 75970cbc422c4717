//! Authorization engine benchmarks
//!
//! Decision hot path per token class, and the config reads it depends on.

use cellguard_authz::{
    Acl, AccessContext, AuthorizationEngine, BoxRef, CellRef, EngineConfig, FullUnitScope,
    Privilege, ResourceBinding, TokenClass,
};
use cellguard_config::{ConfigSources, ConfigStore};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

const UNIT_URL: &str = "https://unit.example.com/";
const CELL_URL: &str = "https://unit.example.com/alice/";

fn read_only_acl(_: &AccessContext, _: &Acl, privilege: &Privilege, _: &str) -> bool {
    *privilege == Privilege::READ
}

fn create_engine(enable_metrics: bool) -> AuthorizationEngine {
    let store = ConfigStore::load(ConfigSources::bundled()).unwrap();
    AuthorizationEngine::new(
        EngineConfig { enable_metrics },
        Arc::new(store),
        Arc::new(read_only_acl),
        Arc::new(FullUnitScope),
    )
}

fn bench_authorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("authorize");

    let cell = CellRef::new("alice", CELL_URL);
    let binding = ResourceBinding::in_box(cell, BoxRef::new("box1"), Acl::empty());

    for class in [
        TokenClass::UnitLevel,
        TokenClass::Valid,
        TokenClass::Invalid,
        TokenClass::Anonymous,
    ] {
        for enable_metrics in [false, true] {
            let engine = create_engine(enable_metrics);
            let ac = AccessContext::new(class, CELL_URL);
            let id = format!("{:?}/metrics={}", class, enable_metrics);

            group.bench_function(BenchmarkId::new("write", id), |b| {
                b.iter(|| engine.authorize(black_box(&ac), &Privilege::WRITE, black_box(&binding)))
            });
        }
    }

    group.finish();
}

fn bench_classify_issuer(c: &mut Criterion) {
    let engine = create_engine(false);

    c.bench_function("classify_issuer_local_unit", |b| {
        b.iter(|| engine.classify_issuer(black_box("https://unit.example.com/unitadmin/"), UNIT_URL))
    });
}

fn bench_config_reads(c: &mut Criterion) {
    let store = ConfigStore::load(ConfigSources::bundled()).unwrap();
    let mut group = c.benchmark_group("config");

    group.bench_function("get", |b| {
        b.iter(|| store.get(black_box("cellguard.unit.unitScheme")))
    });
    group.bench_function("property_limits", |b| {
        b.iter(|| store.userdata_property_limits().unwrap())
    });
    group.bench_function("reload", |b| b.iter(|| store.reload().unwrap()));

    group.finish();
}

criterion_group!(benches, bench_authorize, bench_classify_issuer, bench_config_reads);
criterion_main!(benches);
