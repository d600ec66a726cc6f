//! Throughput benchmarks for elementwise f64 kernels across memory
//! representations.
//!
//! I built this to pin down two questions with numbers instead of
//! folklore: how much does the memory representation of a double array
//! (heap slice, external byte buffer, raw pointer, typed native region)
//! cost or save, and how much does loop shape (scalar, manually unrolled,
//! explicit SIMD) matter on top of that? The kernels are deliberately
//! trivial - sum an array, add one array into another - so the access
//! path is the only thing being measured.
//!
//! ## Usage
//!
//! ```
//! use arraybench::backend::HeapArray;
//! use arraybench::{add, sum};
//!
//! let mut src = HeapArray::new(1024);
//! let mut dst = HeapArray::new(1024);
//! src.as_mut_slice().fill(1.0);
//!
//! add(&mut dst, &src);
//! assert_eq!(sum(&dst), 1024.0);
//! ```
//!
//! ## What's inside
//!
//! - Four memory backends with distinct checking disciplines
//! - Sum and add kernels in scalar, unrolled-by-4, long-stride,
//!   accessor-mediated, and vectorized variants
//! - AVX2 (4-lane) and AVX-512 (8-lane) paths picked at runtime
//! - Fixtures and criterion registration for steady-state measurement

pub mod backend;
pub mod fixture;
pub mod kernels;
pub mod simd;

pub use backend::{
    BackendError, CompiledAccessor, DenseF64, DenseF64Mut, DstBackend, ExternalBuffer, HeapArray,
    RawBuf, SrcBackend, TypedRegion,
};
pub use fixture::{AddFixture, SumFixture, SIZE};

/// Sums `input`, using the fastest kernel available on this CPU
/// (AVX-512 > AVX2 > scalar).
///
/// The vectorized paths reassociate the accumulation, so the result can
/// differ from a strict left-to-right sum in the last bits.
pub fn sum<B: DenseF64>(input: &B) -> f64 {
    kernels::sum::sum_vectorized(input)
}

/// Adds `src` into `dst` elementwise, using the fastest kernel available
/// on this CPU (AVX-512 > AVX2 > scalar).
///
/// # Panics
///
/// Panics if the backends differ in length.
pub fn add<D: DenseF64Mut, S: DenseF64>(dst: &mut D, src: &S) {
    kernels::add::add_vectorized(dst, src);
}
