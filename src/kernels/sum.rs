//! Sum-reduction kernels.
//!
//! Every variant reads each element exactly once and returns the total.
//! `sum_scalar` is the reference accumulation order; the unrolled and
//! vectorized variants reassociate (4 or W partial accumulators combined
//! at the end), so their results can differ from scalar in the last bits.

use crate::backend::{CompiledAccessor, DenseF64, RawBuf, SrcBackend};

/// Baseline: one accumulator, strict left-to-right order.
///
/// Every other variant's result is compared against this one.
pub fn sum_scalar<B: SrcBackend>(input: &B) -> f64 {
    let mut sum = 0.0;
    for i in 0..input.len() {
        sum += input.get(i);
    }
    sum
}

/// Manually unrolled by 4: four independent accumulators advancing at
/// stride 4, combined only at the end.
///
/// The 4-way reassociation means the result is NOT bit-identical to
/// [`sum_scalar`] in general; compare with a tolerance.
pub fn sum_unrolled<B: SrcBackend>(input: &B) -> f64 {
    let n = input.len();
    let main = (n / 4) * 4;

    let mut sum1 = 0.0;
    let mut sum2 = 0.0;
    let mut sum3 = 0.0;
    let mut sum4 = 0.0;
    let mut i = 0;
    while i < main {
        sum1 += input.get(i);
        sum2 += input.get(i + 1);
        sum3 += input.get(i + 2);
        sum4 += input.get(i + 3);
        i += 4;
    }
    let mut sum = sum1 + sum2 + sum3 + sum4;
    for j in main..n {
        sum += input.get(j);
    }
    sum
}

/// Negative control: same accumulation order as [`sum_scalar`], but the
/// index goes through [`std::hint::black_box`] every iteration so LLVM
/// cannot unroll or vectorize the loop. Expected to be the slowest
/// variant; that delta is the measurement, not a correctness property.
pub fn sum_long_stride<B: SrcBackend>(input: &B) -> f64 {
    let mut sum = 0.0;
    let n = input.len() as u64;
    let mut i: u64 = 0;
    while i < n {
        sum += input.get(std::hint::black_box(i) as usize);
        i += 1;
    }
    sum
}

/// Scalar sum through a precompiled accessor (region or array).
///
/// Same accumulation order as [`sum_scalar`], so the result is
/// bit-identical; only the access path differs (one-time index-to-offset
/// resolution instead of a direct typed read).
pub fn sum_accessor<A: CompiledAccessor>(input: A) -> f64 {
    let mut sum = 0.0;
    for i in 0..input.len() {
        sum += input.get(i);
    }
    sum
}

/// Unrolled-by-4 sum through a precompiled accessor (region or array).
/// Reassociates the same way [`sum_unrolled`] does.
pub fn sum_accessor_unrolled<A: CompiledAccessor>(input: A) -> f64 {
    let n = input.len();
    let main = (n / 4) * 4;

    let mut sum1 = 0.0;
    let mut sum2 = 0.0;
    let mut sum3 = 0.0;
    let mut sum4 = 0.0;
    let mut i = 0;
    while i < main {
        sum1 += input.get(i);
        sum2 += input.get(i + 1);
        sum3 += input.get(i + 2);
        sum4 += input.get(i + 3);
        i += 4;
    }
    let mut sum = sum1 + sum2 + sum3 + sum4;
    for j in main..n {
        sum += input.get(j);
    }
    sum
}

/// Explicitly vectorized sum.
///
/// Picks the widest path available on this CPU (AVX-512 > AVX2 > scalar),
/// keeps one vector of lane accumulators through the main loop, reduces
/// the lanes at the end, and finishes any `len % W` remainder with scalar
/// adds. The fixtures size their backends so that remainder is empty, but
/// the kernel does not assume it.
pub fn sum_vectorized<B: DenseF64>(input: &B) -> f64 {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512f") {
            return unsafe { sum_f64x8(input.as_f64_ptr(), input.len()) };
        }
        if is_x86_feature_detected!("avx2") {
            return unsafe { sum_f64x4(input.as_f64_ptr(), input.len()) };
        }
    }
    sum_scalar(input)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn sum_f64x4(input: *const f64, len: usize) -> f64 {
    use crate::simd::F64x4;

    let main = (len / F64x4::WIDTH) * F64x4::WIDTH;
    let mut acc = F64x4::zero();
    let mut i = 0;
    while i < main {
        acc = acc.add(F64x4::load(input.add(i)));
        i += F64x4::WIDTH;
    }
    let mut sum = acc.reduce_sum();
    for j in main..len {
        sum += *input.add(j);
    }
    sum
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn sum_f64x8(input: *const f64, len: usize) -> f64 {
    use crate::simd::F64x8;

    let main = (len / F64x8::WIDTH) * F64x8::WIDTH;
    let mut acc = F64x8::zero();
    let mut i = 0;
    while i < main {
        acc = acc.add(F64x8::load(input.add(i)));
        i += F64x8::WIDTH;
    }
    let mut sum = acc.reduce_sum();
    for j in main..len {
        sum += *input.add(j);
    }
    sum
}

/// Scalar sum over the unchecked raw-pointer backend.
///
/// No bounds test inside the loop. In-range indexing is discharged here:
/// `i` stays below `input.len()` and [`RawBuf`] owns that many elements.
pub fn sum_scalar_raw(input: &RawBuf) -> f64 {
    let mut sum = 0.0;
    for i in 0..input.len() {
        sum += unsafe { input.get(i) };
    }
    sum
}

/// Unrolled-by-4 sum over the unchecked raw-pointer backend.
pub fn sum_unrolled_raw(input: &RawBuf) -> f64 {
    let n = input.len();
    let main = (n / 4) * 4;

    let mut sum1 = 0.0;
    let mut sum2 = 0.0;
    let mut sum3 = 0.0;
    let mut sum4 = 0.0;
    let mut i = 0;
    while i < main {
        unsafe {
            sum1 += input.get(i);
            sum2 += input.get(i + 1);
            sum3 += input.get(i + 2);
            sum4 += input.get(i + 3);
        }
        i += 4;
    }
    let mut sum = sum1 + sum2 + sum3 + sum4;
    for j in main..n {
        sum += unsafe { input.get(j) };
    }
    sum
}
