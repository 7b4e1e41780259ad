//! Criterion benchmarks for catalog construction and resolution.
//!
//! Uses the built-in registries and the dry-run factory so only the
//! resolution overhead is measured.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_moo_config::catalog::{ArgumentValue, Catalog, CatalogBuilder, CatalogConfig};
use u_moo_config::category::{Category, Mode};
use u_moo_config::registry::Registry;
use u_moo_config::resolve::{DryRunFactory, Materializer, ResolveContext};
use u_moo_config::run::{RunConfig, RunPlanner};

// ===========================================================================
// Catalog build
// ===========================================================================

fn bench_catalog_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_build");

    for mode in [Mode::MultiObjective, Mode::SingleObjective] {
        let registry = Registry::builtin(mode);
        let config = CatalogConfig::default().with_mode(mode);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{mode:?}")),
            &(registry, config),
            |b, (r, c)| {
                b.iter(|| {
                    let catalog = CatalogBuilder::new(black_box(r), black_box(c)).build_all();
                    black_box(catalog)
                })
            },
        );
    }
    group.finish();
}

// ===========================================================================
// Variant creation
// ===========================================================================

fn bench_create_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_variants");
    let base = Catalog::builtin(&CatalogConfig::multi_objective()).unwrap();

    for &n in &[10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut catalog = base.clone();
                for i in 0..n {
                    catalog
                        .create_variant(
                            Category::Algorithm,
                            "nsga2",
                            [("pop_size", ArgumentValue::literal(i as i64))],
                            None,
                        )
                        .unwrap();
                }
                black_box(catalog)
            })
        });
    }
    group.finish();
}

// ===========================================================================
// Materialization
// ===========================================================================

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    let catalog = Catalog::builtin(&CatalogConfig::multi_objective()).unwrap();
    let factory = DryRunFactory::builtin(Mode::MultiObjective);
    let ctx = ResolveContext::new().with_n_obj(3);

    for id in ["nsga2", "nsga3", "moead"] {
        group.bench_with_input(BenchmarkId::from_parameter(id), &id, |b, id| {
            let materializer = Materializer::new(&catalog, &factory);
            b.iter(|| {
                let algorithm = materializer.materialize(Category::Algorithm, black_box(id), &ctx);
                black_box(algorithm)
            })
        });
    }
    group.finish();
}

fn bench_run_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_plan");
    group.sample_size(20);
    let catalog = Catalog::builtin(&CatalogConfig::multi_objective()).unwrap();
    let factory = DryRunFactory::builtin(Mode::MultiObjective);
    let config = RunConfig::new(
        ["zdt1", "zdt2", "zdt3", "dtlz1", "dtlz2"],
        ["nsga2", "nsga3", "agemoea", "smsemoa"],
    )
    .with_indicators(["igd", "igd+", "hv"])
    .with_n_seeds(10)
    .with_seed(42);

    group.bench_function("5x4", |b| {
        let planner = RunPlanner::new(&catalog, &factory);
        b.iter(|| black_box(planner.plan(black_box(&config))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_catalog_build,
    bench_create_variants,
    bench_materialize,
    bench_run_plan
);
criterion_main!(benches);
