use std::time::Duration;

use arborist::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};

#[derive(Component, Default, Clone)]
struct A(#[expect(unused)] u32);

#[derive(Component, Default, Clone)]
struct B(#[expect(unused)] u64);

#[derive(Default)]
struct Both;

impl System for Both {
    type Components = (A, B);
}

fn benchmark(c: &mut Criterion) {
    c.bench_function("bulk_remove", |bencher| {
        bencher.iter(|| {
            let mut world = World::new();

            world.create_system::<Both>();

            let entities: Vec<_> = (0..10_000)
                .map(|_| world.create_entity().with(|_: &mut A| {}).id())
                .collect();

            for &entity in &entities {
                world.add_component::<B>(entity);
            }

            world.flush();

            for entity in entities {
                world.remove_component::<B>(entity);
            }

            world.flush();
            world.trim();
        })
    });
}

criterion_group!(
    name = this;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5));
    targets = benchmark,
);
criterion_main!(this);
