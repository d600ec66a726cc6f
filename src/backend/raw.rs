//! Raw untyped-pointer backend. No bounds checks anywhere, on purpose.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::{BackendError, BACKEND_ALIGN};

/// The unchecked backend: a base pointer and nothing else.
///
/// `get` and `set` perform pointer arithmetic with no bounds or type
/// checking - the cost of *removing* those checks is exactly what this
/// backend exists to measure, so they are `unsafe fn` and the caller
/// carries the bounds obligation. Everything else in the crate accesses
/// memory through checked backends; this is the one opt-in escape hatch.
///
/// The allocation is 64-byte aligned, zero-filled, and freed exactly once
/// by drop. `RawBuf` does not implement the safe access traits.
#[derive(Debug)]
pub struct RawBuf {
    base: NonNull<f64>,
    len: usize,
    alloc: Layout,
}

impl RawBuf {
    /// Allocates room for `len` doubles, zero-filled.
    ///
    /// Fails with [`BackendError::AllocationFailed`] if the byte size
    /// overflows or the allocator returns null. `len` must be non-zero.
    pub fn new(len: usize) -> Result<Self, BackendError> {
        assert!(len > 0, "backend length must be non-zero");
        let bytes = super::f64_bytes(len)?;
        let alloc = Layout::from_size_align(bytes, BACKEND_ALIGN)
            .map_err(|_| BackendError::AllocationFailed { bytes })?;
        let ptr = unsafe { alloc::alloc_zeroed(alloc) } as *mut f64;
        let base = NonNull::new(ptr).ok_or(BackendError::AllocationFailed { bytes })?;
        Ok(Self { base, len, alloc })
    }

    /// Reads element `index` with no bounds check.
    ///
    /// # Safety
    ///
    /// Caller must ensure `index < self.len()`. Indexing past the end
    /// reads memory this backend does not own.
    #[inline]
    pub unsafe fn get(&self, index: usize) -> f64 {
        unsafe { self.base.as_ptr().add(index).read() }
    }

    /// Writes element `index` with no bounds check.
    ///
    /// # Safety
    ///
    /// Caller must ensure `index < self.len()`.
    #[inline]
    pub unsafe fn set(&mut self, index: usize, value: f64) {
        unsafe { self.base.as_ptr().add(index).write(value) }
    }

    /// Number of doubles the allocation holds. Advisory only: the
    /// accessors never consult it.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for RawBuf {
    fn drop(&mut self) {
        unsafe { alloc::dealloc(self.base.as_ptr() as *mut u8, self.alloc) };
    }
}

// Uniquely owns its allocation; &self access is read-only.
unsafe impl Send for RawBuf {}
unsafe impl Sync for RawBuf {}
