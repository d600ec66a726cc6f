//! Criterion registration for every kernel variant x backend pairing.
//!
//! Fixtures are built once per group and reused across timed invocations,
//! so the add benches compound into their destination - that is the
//! steady-state shape being measured, not a bug. Sum closures return the
//! f64 to criterion so the kernel call cannot be eliminated as dead code;
//! add closures read back one mutated element for the same reason.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arraybench::fixture::{AddFixture, SumFixture};
use arraybench::kernels::{add, sum};

fn bench_sum(c: &mut Criterion) {
    let mut fx = SumFixture::new().expect("sum fixture allocation");
    fx.fill(|i| (i % 100) as f64);

    let mut group = c.benchmark_group("sum");
    group.bench_function("scalar_array", |b| b.iter(|| sum::sum_scalar(black_box(&fx.array))));
    group.bench_function("unrolled_array", |b| {
        b.iter(|| sum::sum_unrolled(black_box(&fx.array)))
    });
    group.bench_function("long_stride_array", |b| {
        b.iter(|| sum::sum_long_stride(black_box(&fx.array)))
    });
    group.bench_function("accessor_array", |b| {
        b.iter(|| sum::sum_accessor(black_box(fx.array.accessor())))
    });
    group.bench_function("accessor_unrolled_array", |b| {
        b.iter(|| sum::sum_accessor_unrolled(black_box(fx.array.accessor())))
    });
    group.bench_function("scalar_buffer", |b| b.iter(|| sum::sum_scalar(black_box(&fx.buffer))));
    group.bench_function("scalar_region", |b| b.iter(|| sum::sum_scalar(black_box(&fx.region))));
    group.bench_function("unrolled_region", |b| {
        b.iter(|| sum::sum_unrolled(black_box(&fx.region)))
    });
    group.bench_function("accessor_region", |b| {
        b.iter(|| sum::sum_accessor(black_box(fx.region.accessor())))
    });
    group.bench_function("accessor_unrolled_region", |b| {
        b.iter(|| sum::sum_accessor_unrolled(black_box(fx.region.accessor())))
    });
    group.bench_function("scalar_raw", |b| b.iter(|| sum::sum_scalar_raw(black_box(&fx.raw))));
    group.bench_function("unrolled_raw", |b| {
        b.iter(|| sum::sum_unrolled_raw(black_box(&fx.raw)))
    });
    group.bench_function("vector_array", |b| {
        b.iter(|| sum::sum_vectorized(black_box(&fx.array)))
    });
    group.bench_function("vector_region", |b| {
        b.iter(|| sum::sum_vectorized(black_box(&fx.region)))
    });
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let mut fx = AddFixture::new().expect("add fixture allocation");
    fx.fill_inputs(|i| (i % 100) as f64);

    let mut group = c.benchmark_group("add");
    group.bench_function("scalar_array_array", |b| {
        b.iter(|| {
            add::add_scalar(&mut fx.output_array, &fx.input_array);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("unrolled_array_array", |b| {
        b.iter(|| {
            add::add_unrolled(&mut fx.output_array, &fx.input_array);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("long_stride_array_array", |b| {
        b.iter(|| {
            add::add_long_stride(&mut fx.output_array, &fx.input_array);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("scalar_region_region", |b| {
        b.iter(|| {
            add::add_scalar(&mut fx.output_region, &fx.input_region);
            black_box(fx.output_region.get(0))
        })
    });
    group.bench_function("scalar_region_array", |b| {
        b.iter(|| {
            add::add_scalar(&mut fx.output_array, &fx.input_region);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("unrolled_region_array", |b| {
        b.iter(|| {
            add::add_unrolled(&mut fx.output_array, &fx.input_region);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("scalar_raw_array", |b| {
        b.iter(|| {
            add::add_scalar_from_raw(&mut fx.output_array, &fx.input_raw);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("unrolled_raw_array", |b| {
        b.iter(|| {
            add::add_unrolled_from_raw(&mut fx.output_array, &fx.input_raw);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("scalar_raw_raw", |b| {
        b.iter(|| {
            add::add_scalar_raw(&mut fx.output_raw, &fx.input_raw);
            black_box(unsafe { fx.output_raw.get(0) })
        })
    });
    group.bench_function("unrolled_raw_raw", |b| {
        b.iter(|| {
            add::add_unrolled_raw(&mut fx.output_raw, &fx.input_raw);
            black_box(unsafe { fx.output_raw.get(0) })
        })
    });
    group.bench_function("vector_array_array", |b| {
        b.iter(|| {
            add::add_vectorized(&mut fx.output_array, &fx.input_array);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("vector_region_array", |b| {
        b.iter(|| {
            add::add_vectorized(&mut fx.output_array, &fx.input_region);
            black_box(fx.output_array.get(0))
        })
    });
    group.bench_function("vector_array_region", |b| {
        b.iter(|| {
            add::add_vectorized(&mut fx.output_region, &fx.input_array);
            black_box(fx.output_region.get(0))
        })
    });
    group.bench_function("vector_region_region", |b| {
        b.iter(|| {
            add::add_vectorized(&mut fx.output_region, &fx.input_region);
            black_box(fx.output_region.get(0))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_sum, bench_add);
criterion_main!(benches);
