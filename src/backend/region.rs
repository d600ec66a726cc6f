//! Typed native memory region backend with a precompiled accessor.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

use super::{
    BackendError, CompiledAccessor, DenseF64, DenseF64Mut, DstBackend, SrcBackend, BACKEND_ALIGN,
};

/// Structural layout of a typed region: fixed-size elements, fixed count.
///
/// The descriptor is what turns a byte region into indexed typed storage -
/// call sites say "element `i`" and the layout owns the byte arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElemLayout {
    elem_size: usize,
    len: usize,
}

impl ElemLayout {
    /// Layout for `len` double-precision elements.
    pub fn doubles(len: usize) -> Self {
        Self {
            elem_size: size_of::<f64>(),
            len,
        }
    }

    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of element `index`.
    #[inline]
    pub fn byte_offset(&self, index: usize) -> usize {
        index * self.elem_size
    }

    /// Total bytes the region must hold, or `None` when the element count
    /// is too large for the size to be expressed in a `usize`.
    pub fn total_bytes(&self) -> Option<usize> {
        self.len.checked_mul(self.elem_size)
    }
}

/// The typed-region backend: a native byte region plus an [`ElemLayout`].
///
/// Supports direct indexed access (`get`/`set`, bounds-asserted) and
/// access through a [`RegionAccessor`], which resolves the index-to-offset
/// path once and is reused across calls. Benchmarking both isolates the
/// cost of per-call path resolution.
///
/// The allocation is 64-byte aligned and freed exactly once, by drop.
#[derive(Debug)]
pub struct TypedRegion {
    base: NonNull<u8>,
    layout: ElemLayout,
    alloc: Layout,
}

impl TypedRegion {
    /// Allocates a region for `len` doubles, zero-filled.
    ///
    /// Fails with [`BackendError::AllocationFailed`] if the byte size
    /// overflows or the allocator returns null. `len` must be non-zero.
    pub fn new(len: usize) -> Result<Self, BackendError> {
        assert!(len > 0, "backend length must be non-zero");
        let layout = ElemLayout::doubles(len);
        let bytes = layout
            .total_bytes()
            .ok_or(BackendError::AllocationFailed { bytes: usize::MAX })?;
        let alloc = Layout::from_size_align(bytes, BACKEND_ALIGN)
            .map_err(|_| BackendError::AllocationFailed { bytes })?;
        let ptr = unsafe { alloc::alloc_zeroed(alloc) };
        let base = NonNull::new(ptr).ok_or(BackendError::AllocationFailed { bytes })?;
        Ok(Self {
            base,
            layout,
            alloc,
        })
    }

    pub fn elem_layout(&self) -> ElemLayout {
        self.layout
    }

    /// Reads element `index` through the layout descriptor. Panics if out
    /// of range.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        assert!(
            index < self.layout.len,
            "index {index} out of range for length {}",
            self.layout.len
        );
        // Base is 64-byte aligned and the stride is 8, so this read is
        // always naturally aligned.
        unsafe {
            (self.base.as_ptr().add(self.layout.byte_offset(index)) as *const f64).read()
        }
    }

    /// Writes element `index` through the layout descriptor. Panics if out
    /// of range.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        assert!(
            index < self.layout.len,
            "index {index} out of range for length {}",
            self.layout.len
        );
        unsafe {
            (self.base.as_ptr().add(self.layout.byte_offset(index)) as *mut f64).write(value)
        }
    }

    pub fn len(&self) -> usize {
        self.layout.len
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Compiles a read accessor from the layout descriptor.
    ///
    /// The returned value captures (base, layout) once; repeated `get`
    /// calls at different indices reuse that resolution instead of
    /// re-deriving the element path each time.
    pub fn accessor(&self) -> RegionAccessor<'_> {
        RegionAccessor {
            base: self.base.as_ptr(),
            layout: self.layout,
            _region: PhantomData,
        }
    }

    /// Compiles a read-write accessor. Borrows the region mutably for the
    /// accessor's lifetime, so no other access can alias it.
    pub fn accessor_mut(&mut self) -> RegionAccessorMut<'_> {
        RegionAccessorMut {
            base: self.base.as_ptr(),
            layout: self.layout,
            _region: PhantomData,
        }
    }
}

impl Drop for TypedRegion {
    fn drop(&mut self) {
        unsafe { alloc::dealloc(self.base.as_ptr(), self.alloc) };
    }
}

// Uniquely owns its allocation; &self access is read-only.
unsafe impl Send for TypedRegion {}
unsafe impl Sync for TypedRegion {}

impl SrcBackend for TypedRegion {
    #[inline]
    fn len(&self) -> usize {
        self.layout.len
    }

    #[inline]
    fn get(&self, index: usize) -> f64 {
        TypedRegion::get(self, index)
    }
}

impl DstBackend for TypedRegion {
    #[inline]
    fn set(&mut self, index: usize, value: f64) {
        TypedRegion::set(self, index, value);
    }
}

impl DenseF64 for TypedRegion {
    #[inline]
    fn as_f64_ptr(&self) -> *const f64 {
        self.base.as_ptr() as *const f64
    }
}

impl DenseF64Mut for TypedRegion {
    #[inline]
    fn as_f64_mut_ptr(&mut self) -> *mut f64 {
        self.base.as_ptr() as *mut f64
    }
}

/// A compiled read accessor over a [`TypedRegion`].
///
/// Copyable and cheap to pass by value: a base pointer and the layout
/// descriptor, resolved once.
#[derive(Clone, Copy)]
pub struct RegionAccessor<'a> {
    base: *const u8,
    layout: ElemLayout,
    _region: PhantomData<&'a TypedRegion>,
}

impl CompiledAccessor for RegionAccessor<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    fn get(&self, index: usize) -> f64 {
        assert!(
            index < self.layout.len(),
            "index {index} out of range for length {}",
            self.layout.len()
        );
        unsafe { (self.base.add(self.layout.byte_offset(index)) as *const f64).read() }
    }
}

/// A compiled read-write accessor over a [`TypedRegion`].
pub struct RegionAccessorMut<'a> {
    base: *mut u8,
    layout: ElemLayout,
    _region: PhantomData<&'a mut TypedRegion>,
}

impl RegionAccessorMut<'_> {
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Reads element `index`. Panics if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        assert!(
            index < self.layout.len(),
            "index {index} out of range for length {}",
            self.layout.len()
        );
        unsafe { (self.base.add(self.layout.byte_offset(index)) as *const f64).read() }
    }

    /// Writes element `index`. Panics if out of range.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        assert!(
            index < self.layout.len(),
            "index {index} out of range for length {}",
            self.layout.len()
        );
        unsafe { (self.base.add(self.layout.byte_offset(index)) as *mut f64).write(value) }
    }
}
