use arraybench::backend::{
    BackendError, CompiledAccessor, ExternalBuffer, HeapArray, RawBuf, TypedRegion,
};
use arraybench::fixture::{AddFixture, SumFixture};
use arraybench::kernels::{add, sum};
use arraybench::{add as fast_add, sum as fast_sum};

/// Relative tolerance for results that reassociate the accumulation
/// (unrolled, vectorized) against the strict left-to-right reference.
const REL_TOL: f64 = 1e-9;

fn assert_close(expected: f64, actual: f64, name: &str) {
    let scale = expected.abs().max(1.0);
    assert!(
        (expected - actual).abs() <= REL_TOL * scale,
        "{}: expected {}, got {}",
        name,
        expected,
        actual
    );
}

// ============================================================
// Backend access: bit round-trips and bounds
// ============================================================

/// Values with awkward bit patterns: get-after-set must return every one
/// of them bit-for-bit.
fn probe_values() -> Vec<f64> {
    vec![
        0.0,
        -0.0,
        1.0,
        -1.5,
        f64::MIN_POSITIVE,
        f64::MAX,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::from_bits(0x7ff8_0000_0000_1234), // NaN with payload
        std::f64::consts::PI,
    ]
}

#[test]
fn roundtrip_bits_array() {
    let mut b = HeapArray::new(16);
    for (i, v) in probe_values().into_iter().enumerate() {
        b.set(i, v);
        assert_eq!(b.get(i).to_bits(), v.to_bits(), "index {i}");
    }
}

#[test]
fn roundtrip_bits_buffer() {
    let mut b = ExternalBuffer::new(16).expect("alloc");
    for (i, v) in probe_values().into_iter().enumerate() {
        b.set(i, v);
        assert_eq!(b.get(i).to_bits(), v.to_bits(), "index {i}");
    }
}

#[test]
fn roundtrip_bits_region() {
    let mut b = TypedRegion::new(16).expect("alloc");
    for (i, v) in probe_values().into_iter().enumerate() {
        b.set(i, v);
        assert_eq!(b.get(i).to_bits(), v.to_bits(), "index {i}");
    }
}

#[test]
fn roundtrip_bits_region_accessor() {
    let mut b = TypedRegion::new(16).expect("alloc");
    let values = probe_values();
    {
        let mut acc = b.accessor_mut();
        for (i, v) in values.iter().enumerate() {
            acc.set(i, *v);
        }
    }
    let acc = b.accessor();
    for (i, v) in values.iter().enumerate() {
        assert_eq!(acc.get(i).to_bits(), v.to_bits(), "index {i}");
    }
}

#[test]
fn roundtrip_bits_raw() {
    let mut b = RawBuf::new(16).expect("alloc");
    for (i, v) in probe_values().into_iter().enumerate() {
        // in contract: i < 16
        unsafe {
            b.set(i, v);
            assert_eq!(b.get(i).to_bits(), v.to_bits(), "index {i}");
        }
    }
}

#[test]
fn roundtrip_bits_array_accessor() {
    let mut b = HeapArray::new(16);
    let values = probe_values();
    for (i, v) in values.iter().enumerate() {
        b.set(i, *v);
    }
    let acc = b.accessor();
    for (i, v) in values.iter().enumerate() {
        assert_eq!(acc.get(i).to_bits(), v.to_bits(), "index {i}");
    }
}

// A request so large its byte size cannot be expressed in a usize is a
// resource-exhaustion error, not a wrapped-arithmetic 8-byte allocation.

#[test]
fn oversized_allocation_surfaces_as_error() {
    let len = usize::MAX / 8 + 2;
    assert!(matches!(
        ExternalBuffer::new(len),
        Err(BackendError::AllocationFailed { .. })
    ));
    assert!(matches!(
        RawBuf::new(len),
        Err(BackendError::AllocationFailed { .. })
    ));
    assert!(matches!(
        TypedRegion::new(len),
        Err(BackendError::AllocationFailed { .. })
    ));
}

// One-past-end is rejected by every checked backend, on reads and writes.
// The raw-pointer backend performs no such check by design; its accessors
// are unsafe and out-of-range indices are out of contract rather than
// detected.

#[test]
#[should_panic(expected = "out of")]
fn array_rejects_one_past_end() {
    let b = HeapArray::new(8);
    b.get(8);
}

#[test]
#[should_panic(expected = "out of range")]
fn buffer_rejects_one_past_end() {
    let b = ExternalBuffer::new(8).expect("alloc");
    b.get(8);
}

#[test]
#[should_panic(expected = "out of range")]
fn region_rejects_one_past_end() {
    let b = TypedRegion::new(8).expect("alloc");
    b.get(8);
}

#[test]
#[should_panic(expected = "out of range")]
fn region_accessor_rejects_one_past_end() {
    let b = TypedRegion::new(8).expect("alloc");
    b.accessor().get(8);
}

#[test]
#[should_panic(expected = "out of range")]
fn array_accessor_rejects_one_past_end() {
    let b = HeapArray::new(8);
    b.accessor().get(8);
}

#[test]
#[should_panic(expected = "out of")]
fn array_rejects_one_past_end_write() {
    let mut b = HeapArray::new(8);
    b.set(8, 1.0);
}

#[test]
#[should_panic(expected = "out of range")]
fn buffer_rejects_one_past_end_write() {
    let mut b = ExternalBuffer::new(8).expect("alloc");
    b.set(8, 1.0);
}

#[test]
#[should_panic(expected = "out of range")]
fn region_rejects_one_past_end_write() {
    let mut b = TypedRegion::new(8).expect("alloc");
    b.set(8, 1.0);
}

#[test]
#[should_panic(expected = "out of range")]
fn region_accessor_mut_rejects_one_past_end_write() {
    let mut b = TypedRegion::new(8).expect("alloc");
    b.accessor_mut().set(8, 1.0);
}

// ============================================================
// Sum kernels
// ============================================================

#[test]
fn sum_of_one_through_eight_is_exact_for_every_variant() {
    let mut fx = SumFixture::with_len(8).expect("fixture");
    fx.fill(|i| (i + 1) as f64);

    // Integer-valued inputs: no rounding anywhere, every variant must be
    // exactly 36.
    assert_eq!(sum::sum_scalar(&fx.array), 36.0);
    assert_eq!(sum::sum_scalar(&fx.buffer), 36.0);
    assert_eq!(sum::sum_scalar(&fx.region), 36.0);
    assert_eq!(sum::sum_unrolled(&fx.array), 36.0);
    assert_eq!(sum::sum_unrolled(&fx.region), 36.0);
    assert_eq!(sum::sum_long_stride(&fx.array), 36.0);
    assert_eq!(sum::sum_accessor(fx.region.accessor()), 36.0);
    assert_eq!(sum::sum_accessor_unrolled(fx.region.accessor()), 36.0);
    assert_eq!(sum::sum_accessor(fx.array.accessor()), 36.0);
    assert_eq!(sum::sum_accessor_unrolled(fx.array.accessor()), 36.0);
    assert_eq!(sum::sum_scalar_raw(&fx.raw), 36.0);
    assert_eq!(sum::sum_unrolled_raw(&fx.raw), 36.0);
    assert_eq!(sum::sum_vectorized(&fx.array), 36.0);
    assert_eq!(sum::sum_vectorized(&fx.region), 36.0);
}

#[test]
fn sum_of_1024_ones_is_exact_for_every_variant() {
    let mut fx = SumFixture::with_len(1024).expect("fixture");
    fx.fill(|_| 1.0);

    // Summing 1024 ones never rounds, so even the reassociating variants
    // must hit 1024.0 exactly.
    assert_eq!(sum::sum_scalar(&fx.array), 1024.0);
    assert_eq!(sum::sum_scalar(&fx.buffer), 1024.0);
    assert_eq!(sum::sum_scalar(&fx.region), 1024.0);
    assert_eq!(sum::sum_unrolled(&fx.array), 1024.0);
    assert_eq!(sum::sum_long_stride(&fx.region), 1024.0);
    assert_eq!(sum::sum_accessor(fx.region.accessor()), 1024.0);
    assert_eq!(sum::sum_scalar_raw(&fx.raw), 1024.0);
    assert_eq!(sum::sum_unrolled_raw(&fx.raw), 1024.0);
    assert_eq!(sum::sum_vectorized(&fx.array), 1024.0);
    assert_eq!(sum::sum_vectorized(&fx.region), 1024.0);
    assert_eq!(fast_sum(&fx.array), 1024.0);
}

#[test]
fn sum_of_zeros_is_zero_for_every_variant() {
    let fx = SumFixture::with_len(256).expect("fixture");
    assert_eq!(sum::sum_scalar(&fx.array), 0.0);
    assert_eq!(sum::sum_unrolled(&fx.array), 0.0);
    assert_eq!(sum::sum_vectorized(&fx.array), 0.0);
    assert_eq!(sum::sum_vectorized(&fx.region), 0.0);
    assert_eq!(sum::sum_accessor(fx.region.accessor()), 0.0);
    assert_eq!(sum::sum_scalar_raw(&fx.raw), 0.0);
}

#[test]
fn scalar_and_accessor_sums_are_bit_identical() {
    let mut fx = SumFixture::with_len(1024).expect("fixture");
    // Fractional values that force rounding during accumulation.
    fx.fill(|i| 0.1 + (i as f64) * 0.007);

    // Same accumulation order, different access path: the results must
    // match bit-for-bit, not just within tolerance.
    let direct = sum::sum_scalar(&fx.region);
    let mediated = sum::sum_accessor(fx.region.accessor());
    assert_eq!(direct.to_bits(), mediated.to_bits());

    let direct_unrolled = sum::sum_unrolled(&fx.region);
    let mediated_unrolled = sum::sum_accessor_unrolled(fx.region.accessor());
    assert_eq!(direct_unrolled.to_bits(), mediated_unrolled.to_bits());

    // Same property over the managed array's accessor.
    let direct = sum::sum_scalar(&fx.array);
    let mediated = sum::sum_accessor(fx.array.accessor());
    assert_eq!(direct.to_bits(), mediated.to_bits());

    let direct_unrolled = sum::sum_unrolled(&fx.array);
    let mediated_unrolled = sum::sum_accessor_unrolled(fx.array.accessor());
    assert_eq!(direct_unrolled.to_bits(), mediated_unrolled.to_bits());
}

#[test]
fn scalar_sum_agrees_across_backends_bit_for_bit() {
    let mut fx = SumFixture::with_len(512).expect("fixture");
    fx.fill(|i| (i as f64).sin());

    let reference = sum::sum_scalar(&fx.array);
    assert_eq!(reference.to_bits(), sum::sum_scalar(&fx.buffer).to_bits());
    assert_eq!(reference.to_bits(), sum::sum_scalar(&fx.region).to_bits());
    assert_eq!(reference.to_bits(), sum::sum_scalar_raw(&fx.raw).to_bits());
    assert_eq!(reference.to_bits(), sum::sum_long_stride(&fx.array).to_bits());
}

#[test]
fn reassociating_sums_stay_within_tolerance() {
    let mut fx = SumFixture::with_len(1024).expect("fixture");
    fx.fill(|i| 0.1 + (i as f64) * 0.007);

    let reference = sum::sum_scalar(&fx.array);
    assert_close(reference, sum::sum_unrolled(&fx.array), "unrolled");
    assert_close(reference, sum::sum_unrolled_raw(&fx.raw), "unrolled_raw");
    assert_close(reference, sum::sum_vectorized(&fx.array), "vectorized/array");
    assert_close(reference, sum::sum_vectorized(&fx.region), "vectorized/region");
}

// ============================================================
// Add kernels
// ============================================================

#[test]
fn add_identity_on_zero_destination() {
    let mut fx = AddFixture::with_len(8).expect("fixture");
    fx.fill_inputs(|i| (i + 1) as f64);

    add::add_scalar(&mut fx.output_array, &fx.input_array);
    for i in 0..8 {
        assert_eq!(fx.output_array.get(i), (i + 1) as f64);
    }
}

#[test]
fn add_compounds_across_invocations() {
    let mut fx = AddFixture::with_len(64).expect("fixture");
    fx.fill_inputs(|i| (i % 7) as f64);
    fx.fill_outputs(|i| i as f64);

    // Two invocations must accumulate, not reset: dst = original + 2*src.
    add::add_scalar(&mut fx.output_array, &fx.input_array);
    add::add_scalar(&mut fx.output_array, &fx.input_array);
    for i in 0..64 {
        assert_eq!(fx.output_array.get(i), i as f64 + 2.0 * ((i % 7) as f64));
    }
}

#[test]
fn add_variants_agree_with_reference() {
    let len = 256;
    let mut fx = AddFixture::with_len(len).expect("fixture");
    fx.fill_inputs(|i| 0.3 + (i as f64) * 0.011);
    fx.fill_outputs(|i| (i as f64) * 0.5);

    // dst[i] must land on original_dst[i] + src[i] for every variant.
    let expected: Vec<f64> = (0..len)
        .map(|i| (i as f64) * 0.5 + (0.3 + (i as f64) * 0.011))
        .collect();

    let mut scalar_dst = HeapArray::new(len);
    let mut unrolled_dst = HeapArray::new(len);
    let mut long_dst = HeapArray::new(len);
    let mut vector_dst = HeapArray::new(len);
    for i in 0..len {
        scalar_dst.set(i, (i as f64) * 0.5);
        unrolled_dst.set(i, (i as f64) * 0.5);
        long_dst.set(i, (i as f64) * 0.5);
        vector_dst.set(i, (i as f64) * 0.5);
    }

    add::add_scalar(&mut scalar_dst, &fx.input_array);
    add::add_unrolled(&mut unrolled_dst, &fx.input_array);
    add::add_long_stride(&mut long_dst, &fx.input_array);
    add::add_vectorized(&mut vector_dst, &fx.input_array);

    for i in 0..len {
        assert_close(expected[i], scalar_dst.get(i), "scalar");
        assert_close(expected[i], unrolled_dst.get(i), "unrolled");
        assert_close(expected[i], long_dst.get(i), "long_stride");
        assert_close(expected[i], vector_dst.get(i), "vectorized");
    }
}

#[test]
fn add_mixed_backend_pairs() {
    let len = 64;
    let fill_src = |i: usize| (i + 1) as f64;

    // Every (dst, src) pairing of checked backend kinds computes the same
    // elementwise result. Integer-valued inputs keep it exact.
    let mut src_array = HeapArray::new(len);
    let mut src_buffer = ExternalBuffer::new(len).expect("alloc");
    let mut src_region = TypedRegion::new(len).expect("alloc");
    for i in 0..len {
        src_array.set(i, fill_src(i));
        src_buffer.set(i, fill_src(i));
        src_region.set(i, fill_src(i));
    }

    let check = |dst: &dyn Fn(usize) -> f64, name: &str| {
        for i in 0..len {
            assert_eq!(dst(i), fill_src(i), "{name} index {i}");
        }
    };

    let mut dst: HeapArray = HeapArray::new(len);
    add::add_scalar(&mut dst, &src_buffer);
    check(&|i| dst.get(i), "array<-buffer");

    let mut dst = HeapArray::new(len);
    add::add_scalar(&mut dst, &src_region);
    check(&|i| dst.get(i), "array<-region");

    let mut dst = ExternalBuffer::new(len).expect("alloc");
    add::add_scalar(&mut dst, &src_array);
    check(&|i| dst.get(i), "buffer<-array");

    let mut dst = ExternalBuffer::new(len).expect("alloc");
    add::add_unrolled(&mut dst, &src_region);
    check(&|i| dst.get(i), "buffer<-region");

    let mut dst = TypedRegion::new(len).expect("alloc");
    add::add_scalar(&mut dst, &src_array);
    check(&|i| dst.get(i), "region<-array");

    let mut dst = TypedRegion::new(len).expect("alloc");
    add::add_unrolled(&mut dst, &src_buffer);
    check(&|i| dst.get(i), "region<-buffer");
}

#[test]
fn add_raw_variants() {
    let len = 64;
    let mut fx = AddFixture::with_len(len).expect("fixture");
    fx.fill_inputs(|i| (i + 1) as f64);
    fx.fill_outputs(|i| i as f64);

    add::add_scalar_from_raw(&mut fx.output_array, &fx.input_raw);
    for i in 0..len {
        assert_eq!(fx.output_array.get(i), (2 * i + 1) as f64);
    }

    add::add_unrolled_from_raw(&mut fx.output_region, &fx.input_raw);
    for i in 0..len {
        assert_eq!(fx.output_region.get(i), (2 * i + 1) as f64);
    }

    add::add_scalar_raw(&mut fx.output_raw, &fx.input_raw);
    add::add_unrolled_raw(&mut fx.output_raw, &fx.input_raw);
    for i in 0..len {
        assert_eq!(unsafe { fx.output_raw.get(i) }, (3 * i + 2) as f64);
    }
}

#[test]
fn add_vectorized_backend_pairings() {
    let len = 128;
    let mut fx = AddFixture::with_len(len).expect("fixture");
    fx.fill_inputs(|i| (i % 9) as f64);

    // The four dense pairings the vector kernel is written once for.
    add::add_vectorized(&mut fx.output_array, &fx.input_array);
    add::add_vectorized(&mut fx.output_array, &fx.input_region);
    add::add_vectorized(&mut fx.output_region, &fx.input_array);
    add::add_vectorized(&mut fx.output_region, &fx.input_region);

    for i in 0..len {
        assert_eq!(fx.output_array.get(i), 2.0 * ((i % 9) as f64));
        assert_eq!(fx.output_region.get(i), 2.0 * ((i % 9) as f64));
    }
}

#[test]
fn top_level_add_then_sum_roundtrip() {
    let mut src = HeapArray::new(1024);
    let mut dst = HeapArray::new(1024);
    src.as_mut_slice().fill(1.0);

    fast_add(&mut dst, &src);
    fast_add(&mut dst, &src);
    assert_eq!(fast_sum(&dst), 2048.0);
}
