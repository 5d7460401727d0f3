use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use scaffold_core::{FeatureSet, TokenValues};
use scaffold_files::{MaterializeOptions, MemorySink, PlanBuilder, apply, apply_to_disk};
use scaffold_templates::bundle::{GALASA_VERSION, RELEASE_REPOSITORY_URL, builtin_registry, slots};
use std::hint::black_box;
use tempfile::TempDir;

const TEST_SLOTS: &[&str] = &[
    slots::TEST_POM,
    slots::SAMPLE_TEST,
    slots::EXTENDED_TEST,
    slots::SAMPLE_TEXT,
];

fn feature_values(index: usize) -> TokenValues {
    TokenValues::new()
        .with("ParentPackage", "dev.galasa.bench")
        .with("Package", format!("dev.galasa.bench.feature{index}"))
        .with("PackagePath", format!("dev/galasa/bench/feature{index}"))
        .with("ClassName", format!("TestFeature{index}"))
        .with("GalasaVersion", GALASA_VERSION)
        .with("MavenRepositoryUrl", RELEASE_REPOSITORY_URL)
}

fn build_plan(root: &std::path::Path, features: usize) -> scaffold_files::Plan {
    let registry = builtin_registry().unwrap();
    let units = registry
        .resolve_all(TEST_SLOTS.iter().copied(), &FeatureSet::parse("maven"))
        .unwrap();

    let mut builder = PlanBuilder::new(root);
    for index in 0..features {
        builder = builder.add_units(units.iter().copied(), &feature_values(index));
    }
    builder.build().unwrap()
}

/// Benchmark planning for projects with a growing number of features
fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    for features in [1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("features", features),
            &features,
            |b, &features| b.iter(|| build_plan(black_box("out".as_ref()), features)),
        );
    }

    group.finish();
}

/// Benchmark applying a plan to the in-memory sink
fn bench_apply_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_memory");

    for features in [1, 10, 100] {
        let plan = build_plan("out".as_ref(), features);
        group.bench_with_input(BenchmarkId::new("features", features), &plan, |b, plan| {
            b.iter(|| {
                let mut sink = MemorySink::new();
                apply(black_box(plan), &mut sink, &MaterializeOptions::default())
            });
        });
    }

    group.finish();
}

/// Benchmark writing a plan to disk, atomic and direct
fn bench_apply_disk(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_disk");
    group.sample_size(20);

    for atomic in [true, false] {
        let options = MaterializeOptions::default()
            .with_overwrite(true)
            .with_atomic_writes(atomic);
        let name = if atomic { "atomic" } else { "direct" };

        group.bench_function(name, |b| {
            b.iter_with_setup(
                || {
                    let temp = TempDir::new().unwrap();
                    let plan = build_plan(temp.path(), 10);
                    (temp, plan)
                },
                |(_temp, plan)| apply_to_disk(black_box(&plan), &options),
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_apply_memory, bench_apply_disk);
criterion_main!(benches);
