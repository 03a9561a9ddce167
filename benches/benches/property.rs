// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `trellis_property` reads and writes.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;

use trellis_property::{
    DependencyObject, DependencyObjectExt, ErasedValue, OwnerType, Property, PropertyChangedArgs,
    PropertyMetadataBuilder, PropertyRegistry, PropertyStore,
};

struct Widget;

#[derive(Clone, Default)]
struct Elem {
    store: PropertyStore,
    changes: u32,
}

impl DependencyObject for Elem {
    fn property_store(&self) -> &PropertyStore {
        &self.store
    }

    fn property_store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }

    fn on_property_changed(&mut self, _args: &PropertyChangedArgs<'_>) {
        self.changes += 1;
    }
}

fn bench_property(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: PropertyStore={} Elem={} ErasedValue={}",
            size_of::<PropertyStore>(),
            size_of::<Elem>(),
            size_of::<ErasedValue>(),
        );
    });

    let owner = OwnerType::of::<Widget>();
    let mut registry = PropertyRegistry::new();
    let width: Property<f64> =
        registry.register(owner, "Width", PropertyMetadataBuilder::new(0.0_f64).build());
    let clamped: Property<f64> = registry.register(
        owner,
        "Opacity",
        PropertyMetadataBuilder::new(1.0_f64)
            .coerce(|_, v: f64| v.clamp(0.0, 1.0))
            .on_changed(|_, _, _| {})
            .build(),
    );
    let text: Property<String> =
        registry.register(owner, "Text", PropertyMetadataBuilder::new(String::new()).build());

    let mut group = c.benchmark_group("property/get");

    group.bench_function("default", |b| {
        let element = Elem::default();
        b.iter(|| black_box(element.get_value(width, &registry)));
    });

    group.bench_function("local", |b| {
        let mut element = Elem::default();
        element.set_value(width, 100.0, &registry);
        b.iter(|| black_box(element.get_value(width, &registry)));
    });

    group.bench_function("string_clone", |b| {
        let mut element = Elem::default();
        element.set_value(text, "hello world hello world".to_string(), &registry);
        b.iter(|| black_box(element.get_value(text, &registry)));
    });

    group.bench_function("string_ref", |b| {
        let mut element = Elem::default();
        element.set_value(text, "hello world hello world".to_string(), &registry);
        b.iter(|| black_box(element.get_value_ref(text, &registry).len()));
    });

    group.finish();

    let mut group = c.benchmark_group("property/set");

    group.bench_function("f64/no_callback", |b| {
        b.iter_batched(
            Elem::default,
            |mut element| {
                black_box(element.set_value(width, 123.0, &registry));
                black_box(element);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("f64/coerce_and_callback", |b| {
        b.iter_batched(
            Elem::default,
            |mut element| {
                black_box(element.set_value(clamped, 0.5, &registry));
                black_box(element.changes);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("f64/unchanged", |b| {
        let mut element = Elem::default();
        element.set_value(width, 123.0, &registry);
        b.iter(|| black_box(element.set_value(width, 123.0, &registry)));
    });

    group.bench_function("by_name", |b| {
        b.iter_batched(
            || (Elem::default(), ErasedValue::new(42.0_f64)),
            |(mut element, value)| {
                let changed = element.set_value_by_name(owner, "Width", value, &registry);
                black_box(changed.is_ok());
                black_box(element);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("clear", |b| {
        b.iter_batched(
            || {
                let mut element = Elem::default();
                element.set_value(width, 5.0, &registry);
                element
            },
            |mut element| {
                black_box(element.clear_value(width, &registry));
                black_box(element);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_property);
criterion_main!(benches);
