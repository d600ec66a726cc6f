//! Quick benchmark runner.
//!
//! Prints a rough throughput table with `Instant` timing. For
//! statistically sound numbers (warmup, outlier handling, distributions)
//! run the criterion bench: `cargo bench`.

use arraybench::fixture::{AddFixture, SumFixture, SIZE};
use arraybench::kernels::{add, sum};
use arraybench::simd::vector_width;
use std::hint::black_box;
use std::time::Instant;

const WARMUP: usize = 1_000;
const ITERATIONS: usize = 20_000;

fn main() {
    println!("=== Elementwise f64 Kernel Benchmark ===\n");

    #[cfg(target_arch = "x86_64")]
    println!(
        "CPU Features: AVX2={}, AVX-512={}",
        is_x86_feature_detected!("avx2"),
        is_x86_feature_detected!("avx512f")
    );
    println!("Vector width: {} lanes, {} elements per backend\n", vector_width(), SIZE);

    let mut sum_fx = SumFixture::new().expect("sum fixture allocation");
    sum_fx.fill(|i| (i % 100) as f64);

    let mut add_fx = AddFixture::new().expect("add fixture allocation");
    add_fx.fill_inputs(|i| (i % 100) as f64);

    println!("sum ({} doubles, {} iterations)", SIZE, ITERATIONS);
    println!("{}", "-".repeat(60));
    // Sum reads 8 bytes per element per pass.
    let sum_bytes = SIZE * 8;
    let sum_rows: Vec<(&str, (f64, f64))> = vec![
        ("scalar/array", bench(sum_bytes, || sum::sum_scalar(&sum_fx.array))),
        ("unrolled/array", bench(sum_bytes, || sum::sum_unrolled(&sum_fx.array))),
        ("long-stride/array", bench(sum_bytes, || sum::sum_long_stride(&sum_fx.array))),
        ("accessor/array", bench(sum_bytes, || sum::sum_accessor(sum_fx.array.accessor()))),
        ("scalar/buffer", bench(sum_bytes, || sum::sum_scalar(&sum_fx.buffer))),
        ("scalar/region", bench(sum_bytes, || sum::sum_scalar(&sum_fx.region))),
        ("accessor/region", bench(sum_bytes, || sum::sum_accessor(sum_fx.region.accessor()))),
        ("scalar/raw", bench(sum_bytes, || sum::sum_scalar_raw(&sum_fx.raw))),
        ("unrolled/raw", bench(sum_bytes, || sum::sum_unrolled_raw(&sum_fx.raw))),
        ("vector/array", bench(sum_bytes, || sum::sum_vectorized(&sum_fx.array))),
        ("vector/region", bench(sum_bytes, || sum::sum_vectorized(&sum_fx.region))),
    ];
    print_rows(&sum_rows);

    println!("\nadd ({} doubles, {} iterations)", SIZE, ITERATIONS);
    println!("{}", "-".repeat(60));
    // Add reads 16 and writes 8 bytes per element per pass.
    let add_bytes = SIZE * 24;
    let add_rows: Vec<(&str, (f64, f64))> = vec![
        (
            "scalar/array-array",
            bench(add_bytes, || {
                add::add_scalar(&mut add_fx.output_array, &add_fx.input_array);
                add_fx.output_array.get(0)
            }),
        ),
        (
            "unrolled/array-array",
            bench(add_bytes, || {
                add::add_unrolled(&mut add_fx.output_array, &add_fx.input_array);
                add_fx.output_array.get(0)
            }),
        ),
        (
            "scalar/region-region",
            bench(add_bytes, || {
                add::add_scalar(&mut add_fx.output_region, &add_fx.input_region);
                add_fx.output_region.get(0)
            }),
        ),
        (
            "scalar/raw-raw",
            bench(add_bytes, || {
                add::add_scalar_raw(&mut add_fx.output_raw, &add_fx.input_raw);
                unsafe { add_fx.output_raw.get(0) }
            }),
        ),
        (
            "vector/array-array",
            bench(add_bytes, || {
                add::add_vectorized(&mut add_fx.output_array, &add_fx.input_array);
                add_fx.output_array.get(0)
            }),
        ),
        (
            "vector/region-array",
            bench(add_bytes, || {
                add::add_vectorized(&mut add_fx.output_array, &add_fx.input_region);
                add_fx.output_array.get(0)
            }),
        ),
    ];
    print_rows(&add_rows);
}

/// Times one kernel closure: warmup passes, then averaged timed passes.
/// Returns (ns per pass, GB/s). The closure's result goes through
/// `black_box` so the kernel call cannot be eliminated as dead code.
fn bench<F: FnMut() -> f64>(bytes_per_pass: usize, mut f: F) -> (f64, f64) {
    for _ in 0..WARMUP {
        black_box(f());
    }

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        black_box(f());
    }
    let elapsed = start.elapsed().as_secs_f64();

    let per_pass = elapsed / ITERATIONS as f64;
    let gbps = bytes_per_pass as f64 / per_pass / 1e9;
    (per_pass * 1e9, gbps)
}

fn print_rows(rows: &[(&str, (f64, f64))]) {
    let baseline = rows[0].1 .0;
    for (name, (ns, gbps)) in rows {
        println!(
            "{:22} {:9.1} ns  {:7.2} GB/s  ({:.1}x)",
            name,
            ns,
            gbps,
            baseline / ns
        );
    }
}
