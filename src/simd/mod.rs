//! Vector adapter: thin wrappers over the platform's f64 SIMD primitives.
//!
//! The kernels in [`crate::kernels`] are written once against these
//! wrappers and a base pointer, instead of once per (kernel x backend)
//! combination. [`F64x4`] covers AVX2, [`F64x8`] covers AVX-512; the
//! active width is a runtime property of the CPU, queried through
//! [`vector_width`].

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Number of f64 lanes processed per vector operation on this machine.
///
/// Queried from the CPU at runtime: 8 with AVX-512, 4 with AVX2, 1 when
/// neither is available (the vector kernels then fall back to scalar
/// code). Constant for the life of the process.
pub fn vector_width() -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512f") {
            return 8;
        }
        if is_x86_feature_detected!("avx2") {
            return 4;
        }
    }
    1
}

/// Four f64 lanes in one AVX2 register.
#[cfg(target_arch = "x86_64")]
#[derive(Clone, Copy)]
pub struct F64x4(__m256d);

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_op_in_unsafe_fn)]
impl F64x4 {
    pub const WIDTH: usize = 4;

    /// All lanes zero.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX2.
    #[target_feature(enable = "avx2")]
    pub unsafe fn zero() -> Self {
        Self(_mm256_setzero_pd())
    }

    /// Loads 4 contiguous doubles starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX2 and `ptr` is valid for
    /// 4 f64 reads.
    #[target_feature(enable = "avx2")]
    pub unsafe fn load(ptr: *const f64) -> Self {
        Self(_mm256_loadu_pd(ptr))
    }

    /// Stores the 4 lanes contiguously starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX2 and `ptr` is valid for
    /// 4 f64 writes.
    #[target_feature(enable = "avx2")]
    pub unsafe fn store(self, ptr: *mut f64) {
        _mm256_storeu_pd(ptr, self.0);
    }

    /// Lane-wise addition.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX2.
    #[target_feature(enable = "avx2")]
    pub unsafe fn add(self, other: Self) -> Self {
        Self(_mm256_add_pd(self.0, other.0))
    }

    /// Horizontal sum: lanes extracted and added left to right, so the
    /// combine order is deterministic.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX2.
    #[target_feature(enable = "avx2")]
    pub unsafe fn reduce_sum(self) -> f64 {
        let mut lanes = [0.0f64; 4];
        _mm256_storeu_pd(lanes.as_mut_ptr(), self.0);
        lanes[0] + lanes[1] + lanes[2] + lanes[3]
    }
}

/// Eight f64 lanes in one AVX-512 register.
#[cfg(target_arch = "x86_64")]
#[derive(Clone, Copy)]
pub struct F64x8(__m512d);

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_op_in_unsafe_fn)]
impl F64x8 {
    pub const WIDTH: usize = 8;

    /// All lanes zero.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX-512F.
    #[target_feature(enable = "avx512f")]
    pub unsafe fn zero() -> Self {
        Self(_mm512_setzero_pd())
    }

    /// Loads 8 contiguous doubles starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX-512F and `ptr` is valid
    /// for 8 f64 reads.
    #[target_feature(enable = "avx512f")]
    pub unsafe fn load(ptr: *const f64) -> Self {
        Self(_mm512_loadu_pd(ptr))
    }

    /// Stores the 8 lanes contiguously starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX-512F and `ptr` is valid
    /// for 8 f64 writes.
    #[target_feature(enable = "avx512f")]
    pub unsafe fn store(self, ptr: *mut f64) {
        _mm512_storeu_pd(ptr, self.0);
    }

    /// Lane-wise addition.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX-512F.
    #[target_feature(enable = "avx512f")]
    pub unsafe fn add(self, other: Self) -> Self {
        Self(_mm512_add_pd(self.0, other.0))
    }

    /// Horizontal sum, lanes combined left to right.
    ///
    /// # Safety
    ///
    /// Caller must ensure the CPU supports AVX-512F.
    #[target_feature(enable = "avx512f")]
    pub unsafe fn reduce_sum(self) -> f64 {
        let mut lanes = [0.0f64; 8];
        _mm512_storeu_pd(lanes.as_mut_ptr(), self.0);
        let mut sum = 0.0;
        for lane in lanes {
            sum += lane;
        }
        sum
    }
}
