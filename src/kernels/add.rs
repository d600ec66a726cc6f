//! Elementwise add kernels: `dst[i] += src[i]` for every index.
//!
//! The kernels are generic over a readable source and a writable
//! destination as two independent type parameters, so any pairing of
//! backend kinds composes without a per-pair implementation. Repeated
//! invocation compounds into `dst` on purpose - that is the steady-state
//! shape a benchmark harness measures.
//!
//! Precondition on every kernel here: `dst` and `src` must not alias.
//! Backends each own their allocation, so two distinct backend values
//! never do.

use crate::backend::{DenseF64, DenseF64Mut, DstBackend, RawBuf, SrcBackend};

/// Baseline: one element per iteration, in index order.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_scalar<D: DstBackend, S: SrcBackend>(dst: &mut D, src: &S) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    for i in 0..src.len() {
        dst.set(i, dst.get(i) + src.get(i));
    }
}

/// Manually unrolled by 4, with a scalar tail for `len % 4`.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_unrolled<D: DstBackend, S: SrcBackend>(dst: &mut D, src: &S) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    let n = src.len();
    let main = (n / 4) * 4;

    let mut i = 0;
    while i < main {
        dst.set(i, dst.get(i) + src.get(i));
        dst.set(i + 1, dst.get(i + 1) + src.get(i + 1));
        dst.set(i + 2, dst.get(i + 2) + src.get(i + 2));
        dst.set(i + 3, dst.get(i + 3) + src.get(i + 3));
        i += 4;
    }
    for j in main..n {
        dst.set(j, dst.get(j) + src.get(j));
    }
}

/// Negative control: index order identical to [`add_scalar`], but the
/// index goes through [`std::hint::black_box`] every iteration to keep
/// LLVM from unrolling or vectorizing the loop.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_long_stride<D: DstBackend, S: SrcBackend>(dst: &mut D, src: &S) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    let n = src.len() as u64;
    let mut i: u64 = 0;
    while i < n {
        let idx = std::hint::black_box(i) as usize;
        dst.set(idx, dst.get(idx) + src.get(idx));
        i += 1;
    }
}

/// Explicitly vectorized add.
///
/// Per stride-W block: load W lanes from `src`, load W lanes from `dst`,
/// add lane-wise, store back into `dst`. Picks AVX-512, then AVX2, then
/// the scalar fallback; any `len % W` remainder is finished with scalar
/// adds rather than assumed away.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_vectorized<D: DenseF64Mut, S: DenseF64>(dst: &mut D, src: &S) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    let len = src.len();

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512f") {
            unsafe { add_f64x8(dst.as_f64_mut_ptr(), src.as_f64_ptr(), len) };
            return;
        }
        if is_x86_feature_detected!("avx2") {
            unsafe { add_f64x4(dst.as_f64_mut_ptr(), src.as_f64_ptr(), len) };
            return;
        }
    }
    add_scalar(dst, src);
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn add_f64x4(dst: *mut f64, src: *const f64, len: usize) {
    use crate::simd::F64x4;

    let main = (len / F64x4::WIDTH) * F64x4::WIDTH;
    let mut i = 0;
    while i < main {
        let s = F64x4::load(src.add(i));
        let d = F64x4::load(dst.add(i));
        d.add(s).store(dst.add(i));
        i += F64x4::WIDTH;
    }
    for j in main..len {
        *dst.add(j) += *src.add(j);
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn add_f64x8(dst: *mut f64, src: *const f64, len: usize) {
    use crate::simd::F64x8;

    let main = (len / F64x8::WIDTH) * F64x8::WIDTH;
    let mut i = 0;
    while i < main {
        let s = F64x8::load(src.add(i));
        let d = F64x8::load(dst.add(i));
        d.add(s).store(dst.add(i));
        i += F64x8::WIDTH;
    }
    for j in main..len {
        *dst.add(j) += *src.add(j);
    }
}

/// Scalar add reading from the unchecked raw-pointer backend into a
/// checked destination. In-range indexing on `src` is discharged here:
/// `i` stays below the asserted common length.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_scalar_from_raw<D: DstBackend>(dst: &mut D, src: &RawBuf) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    for i in 0..dst.len() {
        dst.set(i, dst.get(i) + unsafe { src.get(i) });
    }
}

/// Unrolled-by-4 add reading from the unchecked raw-pointer backend into
/// a checked destination.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_unrolled_from_raw<D: DstBackend>(dst: &mut D, src: &RawBuf) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    let n = dst.len();
    let main = (n / 4) * 4;

    let mut i = 0;
    while i < main {
        unsafe {
            dst.set(i, dst.get(i) + src.get(i));
            dst.set(i + 1, dst.get(i + 1) + src.get(i + 1));
            dst.set(i + 2, dst.get(i + 2) + src.get(i + 2));
            dst.set(i + 3, dst.get(i + 3) + src.get(i + 3));
        }
        i += 4;
    }
    for j in main..n {
        dst.set(j, dst.get(j) + unsafe { src.get(j) });
    }
}

/// Scalar add with both operands on the unchecked raw-pointer backend.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_scalar_raw(dst: &mut RawBuf, src: &RawBuf) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    for i in 0..src.len() {
        unsafe { dst.set(i, dst.get(i) + src.get(i)) };
    }
}

/// Unrolled-by-4 add with both operands on the unchecked raw-pointer
/// backend.
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add_unrolled_raw(dst: &mut RawBuf, src: &RawBuf) {
    assert_eq!(dst.len(), src.len(), "backend length mismatch");
    let n = src.len();
    let main = (n / 4) * 4;

    let mut i = 0;
    while i < main {
        unsafe {
            dst.set(i, dst.get(i) + src.get(i));
            dst.set(i + 1, dst.get(i + 1) + src.get(i + 1));
            dst.set(i + 2, dst.get(i + 2) + src.get(i + 2));
            dst.set(i + 3, dst.get(i + 3) + src.get(i + 3));
        }
        i += 4;
    }
    for j in main..n {
        unsafe { dst.set(j, dst.get(j) + src.get(j)) };
    }
}
