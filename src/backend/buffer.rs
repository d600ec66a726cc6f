//! Externally-allocated byte buffer backend.

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use super::{BackendError, DstBackend, SrcBackend, BACKEND_ALIGN};

/// A byte-addressable region from the global allocator, interpreted as
/// native-endian doubles at 8-byte stride.
///
/// Every access widens from bytes: `get` copies 8 bytes at offset
/// `index * 8` and reassembles them with [`f64::from_ne_bytes`], `set`
/// does the reverse. That byte-level round trip is the representation
/// being measured here, so it is deliberate, not an optimization miss.
///
/// The allocation is 64-byte aligned and freed exactly once, by drop.
#[derive(Debug)]
pub struct ExternalBuffer {
    base: NonNull<u8>,
    len: usize,
    alloc: Layout,
}

impl ExternalBuffer {
    /// Allocates room for `len` doubles, zero-filled.
    ///
    /// Fails with [`BackendError::AllocationFailed`] if the byte size
    /// overflows or the allocator returns null. `len` must be non-zero.
    pub fn new(len: usize) -> Result<Self, BackendError> {
        assert!(len > 0, "backend length must be non-zero");
        let bytes = super::f64_bytes(len)?;
        let alloc = Layout::from_size_align(bytes, BACKEND_ALIGN)
            .map_err(|_| BackendError::AllocationFailed { bytes })?;
        let ptr = unsafe { alloc::alloc_zeroed(alloc) };
        let base = NonNull::new(ptr).ok_or(BackendError::AllocationFailed { bytes })?;
        Ok(Self { base, len, alloc })
    }

    /// Reads the double at element `index`. Panics if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        assert!(index < self.len, "index {index} out of range for length {}", self.len);
        let mut raw = [0u8; 8];
        unsafe {
            ptr::copy_nonoverlapping(self.base.as_ptr().add(index * 8), raw.as_mut_ptr(), 8);
        }
        f64::from_ne_bytes(raw)
    }

    /// Writes the double at element `index`. Panics if out of range.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        assert!(index < self.len, "index {index} out of range for length {}", self.len);
        let raw = value.to_ne_bytes();
        unsafe {
            ptr::copy_nonoverlapping(raw.as_ptr(), self.base.as_ptr().add(index * 8), 8);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for ExternalBuffer {
    fn drop(&mut self) {
        unsafe { alloc::dealloc(self.base.as_ptr(), self.alloc) };
    }
}

// Uniquely owns its allocation; &self access is read-only.
unsafe impl Send for ExternalBuffer {}
unsafe impl Sync for ExternalBuffer {}

impl SrcBackend for ExternalBuffer {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, index: usize) -> f64 {
        ExternalBuffer::get(self, index)
    }
}

impl DstBackend for ExternalBuffer {
    #[inline]
    fn set(&mut self, index: usize, value: f64) {
        ExternalBuffer::set(self, index, value);
    }
}
