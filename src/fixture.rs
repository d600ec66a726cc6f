//! Benchmark fixtures: the backend instances a harness builds once and
//! reuses across every timed invocation.
//!
//! Construction is fallible (external allocation can fail) and checks the
//! `len % vector_width() == 0` precondition once, up front, so no
//! vectorized kernel ever runs a remainder tail during measurement. If a
//! later allocation fails, the backends built before it are released by
//! drop on the error path.

use crate::backend::{BackendError, ExternalBuffer, HeapArray, RawBuf, TypedRegion};
use crate::simd::vector_width;

/// Default element count for every backend: 1024 doubles, a multiple of
/// every vector width this crate dispatches to.
pub const SIZE: usize = 1024;

fn check_len(len: usize) -> Result<(), BackendError> {
    let width = vector_width();
    if len % width != 0 {
        return Err(BackendError::LengthNotMultipleOfWidth { len, width });
    }
    Ok(())
}

/// Fixture for the sum kernels: one input per backend kind.
#[derive(Debug)]
pub struct SumFixture {
    pub array: HeapArray,
    pub buffer: ExternalBuffer,
    pub raw: RawBuf,
    pub region: TypedRegion,
}

impl SumFixture {
    /// Builds all four backends at [`SIZE`] elements, zero-filled.
    pub fn new() -> Result<Self, BackendError> {
        Self::with_len(SIZE)
    }

    /// Builds all four backends at `len` elements, zero-filled.
    ///
    /// `len` must be non-zero and a multiple of [`vector_width`].
    pub fn with_len(len: usize) -> Result<Self, BackendError> {
        check_len(len)?;
        Ok(Self {
            array: HeapArray::new(len),
            buffer: ExternalBuffer::new(len)?,
            raw: RawBuf::new(len)?,
            region: TypedRegion::new(len)?,
        })
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Writes `f(i)` to element `i` of every backend, so all four hold
    /// identical contents.
    pub fn fill(&mut self, f: impl Fn(usize) -> f64) {
        for i in 0..self.array.len() {
            let v = f(i);
            self.array.set(i, v);
            self.buffer.set(i, v);
            self.region.set(i, v);
            // in contract: i < len
            unsafe { self.raw.set(i, v) };
        }
    }
}

/// Fixture for the add kernels: input/output pairs for the backend kinds
/// the benchmarks pair up. Input and output never share storage.
pub struct AddFixture {
    pub input_array: HeapArray,
    pub output_array: HeapArray,
    pub input_region: TypedRegion,
    pub output_region: TypedRegion,
    pub input_raw: RawBuf,
    pub output_raw: RawBuf,
}

impl AddFixture {
    /// Builds every pair at [`SIZE`] elements, zero-filled.
    pub fn new() -> Result<Self, BackendError> {
        Self::with_len(SIZE)
    }

    /// Builds every pair at `len` elements, zero-filled.
    ///
    /// `len` must be non-zero and a multiple of [`vector_width`].
    pub fn with_len(len: usize) -> Result<Self, BackendError> {
        check_len(len)?;
        Ok(Self {
            input_array: HeapArray::new(len),
            output_array: HeapArray::new(len),
            input_region: TypedRegion::new(len)?,
            output_region: TypedRegion::new(len)?,
            input_raw: RawBuf::new(len)?,
            output_raw: RawBuf::new(len)?,
        })
    }

    pub fn len(&self) -> usize {
        self.input_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_array.is_empty()
    }

    /// Writes `f(i)` to element `i` of every input backend.
    pub fn fill_inputs(&mut self, f: impl Fn(usize) -> f64) {
        for i in 0..self.input_array.len() {
            let v = f(i);
            self.input_array.set(i, v);
            self.input_region.set(i, v);
            // in contract: i < len
            unsafe { self.input_raw.set(i, v) };
        }
    }

    /// Writes `f(i)` to element `i` of every output backend.
    pub fn fill_outputs(&mut self, f: impl Fn(usize) -> f64) {
        for i in 0..self.output_array.len() {
            let v = f(i);
            self.output_array.set(i, v);
            self.output_region.set(i, v);
            // in contract: i < len
            unsafe { self.output_raw.set(i, v) };
        }
    }
}
