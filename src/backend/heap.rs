//! Heap-managed array backend.

use std::marker::PhantomData;

use super::region::ElemLayout;
use super::{CompiledAccessor, DenseF64, DenseF64Mut, DstBackend, SrcBackend};

/// The managed-array backend: a boxed slice of f64s.
///
/// This is the baseline representation. Length is fixed at construction,
/// every access goes through slice indexing, and an out-of-range index
/// panics. Storage lives as long as the value and is freed by drop.
#[derive(Debug)]
pub struct HeapArray {
    data: Box<[f64]>,
}

impl HeapArray {
    /// Allocates `len` zero-initialized doubles.
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len].into_boxed_slice(),
        }
    }

    /// Reads element `index`. Panics if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.data[index]
    }

    /// Writes element `index`. Panics if out of range.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        self.data[index] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Compiles a read accessor: (base, layout) resolved once, reused
    /// across many reads. Same value shape as a region accessor, so the
    /// accessor-mediated kernels measure the indirection itself rather
    /// than the backing store.
    pub fn accessor(&self) -> ArrayAccessor<'_> {
        ArrayAccessor {
            base: self.data.as_ptr() as *const u8,
            layout: ElemLayout::doubles(self.data.len()),
            _array: PhantomData,
        }
    }
}

/// A compiled read accessor over a [`HeapArray`].
#[derive(Clone, Copy)]
pub struct ArrayAccessor<'a> {
    base: *const u8,
    layout: ElemLayout,
    _array: PhantomData<&'a HeapArray>,
}

impl CompiledAccessor for ArrayAccessor<'_> {
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

impl SrcBackend for HeapArray {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, index: usize) -> f64 {
        self.data[index]
    }
}

impl DstBackend for HeapArray {
    #[inline]
    fn set(&mut self, index: usize, value: f64) {
        self.data[index] = value;
    }
}

impl DenseF64 for HeapArray {
    #[inline]
    fn as_f64_ptr(&self) -> *const f64 {
        self.data.as_ptr()
    }
}

impl DenseF64Mut for HeapArray {
    #[inline]
    fn as_f64_mut_ptr(&mut self) -> *mut f64 {
        self.data.as_mut_ptr()
    }
}
