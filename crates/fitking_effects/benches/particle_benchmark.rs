//! Benchmark for particle generation and per-frame sampling.
//!
//! TARGET: a 30-particle field sampled well under one frame budget
//!
//! Run with: cargo bench --package fitking_effects --bench particle_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fitking_effects::effects::{generate_particles, Effect};
use fitking_effects::{ElementSpec, Page, ParticleField, ParticleFieldProps, Rect, Tag, UIRenderer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_generation");

    for count in [30_usize, 300, 3_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| black_box(generate_particles(count, &mut rng)));
        });
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let particles = generate_particles(ParticleFieldProps::DEFAULT_COUNT, &mut rng);

    c.bench_function("particle_sample_30", |b| {
        let mut elapsed = 0.0_f64;
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            for p in &particles {
                black_box(p.sample(elapsed));
            }
        });
    });
}

fn bench_field_frame(c: &mut Criterion) {
    let mut page = Page::default();
    let hero = page.create_element(
        ElementSpec::new(Tag::Section).with_bounds(Rect::new(0.0, 0.0, 1920.0, 900.0)),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let field = ParticleField::mount_with(&page, hero, ParticleFieldProps::default(), &mut rng)
        .expect("hero section exists");
    let mut renderer = UIRenderer::new();

    c.bench_function("particle_field_tick_and_render", |b| {
        b.iter(|| {
            page.tick(1.0 / 60.0);
            renderer.begin_frame();
            field.render(&page, &mut renderer);
            black_box(renderer.end_frame().len())
        });
    });
}

criterion_group!(benches, bench_generation, bench_sampling, bench_field_frame);
criterion_main!(benches);
