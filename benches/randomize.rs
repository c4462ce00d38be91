//! Benchmark: one randomization run per profile kind.
//!
//! Compares:
//! - "Full" (randomize + custom draws + clamp)
//! - a profile file excluding N fields, which adds parsing and the merge pass

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use settings_rando::schema::schema;
use settings_rando::{
    GenerationProfile, GenerationSettings, ProfileError, ProfileStore, RandomizationEngine,
};
use std::hint::black_box;

/// In-memory store so the benchmark measures the engine, not the disk.
struct MemoryStore(Vec<String>);

impl ProfileStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>, ProfileError> {
        Ok(vec!["Bench".to_string()])
    }

    fn read(&self, _name: &str) -> Result<Vec<String>, ProfileError> {
        Ok(self.0.clone())
    }

    fn write(&self, _name: &str, _lines: &[String]) -> Result<(), ProfileError> {
        Ok(())
    }
}

fn exclude_profile(fields: usize) -> MemoryStore {
    let mut lines = vec!["EXCLUDE # generated".to_string()];
    lines.extend(schema().fields().iter().take(fields).map(|f| f.path()));
    MemoryStore(lines)
}

fn benchmark_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomize");
    let settings = GenerationSettings::default();

    let empty = MemoryStore(Vec::new());
    group.bench_function("full", |b| {
        let engine = RandomizationEngine::new(&empty);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        b.iter(|| {
            let mut out = settings.clone();
            engine
                .run(black_box(&mut out), &mut rng, &GenerationProfile::Full)
                .unwrap();
            out
        });
    });

    let profile = GenerationProfile::File("Bench".to_string());
    for fields in [1usize, 10, schema().fields().len()] {
        let store = exclude_profile(fields);
        group.bench_with_input(BenchmarkId::new("profile", fields), &fields, |b, _| {
            let engine = RandomizationEngine::new(&store);
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            b.iter(|| {
                let mut out = settings.clone();
                engine
                    .run(black_box(&mut out), &mut rng, &profile)
                    .unwrap();
                out
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_runs);
criterion_main!(benches);
