//! Memory backends: four representations of a fixed-length run of f64s.
//!
//! Each backend owns exactly `len * 8` bytes from construction until drop
//! and never resizes. The point of having four is to benchmark the same
//! kernels against different access disciplines:
//!
//! - [`HeapArray`] - boxed slice, bounds-checked by indexing, with an
//!   optional precompiled accessor
//! - [`ExternalBuffer`] - byte region from the global allocator, read as
//!   native-endian doubles at 8-byte stride
//! - [`RawBuf`] - raw pointer, no bounds or type checks at all
//! - [`TypedRegion`] - byte region plus a layout descriptor for typed
//!   indexed access, with an optional precompiled accessor

pub mod buffer;
pub mod heap;
pub mod raw;
pub mod region;

pub use buffer::ExternalBuffer;
pub use heap::{ArrayAccessor, HeapArray};
pub use raw::RawBuf;
pub use region::{ElemLayout, RegionAccessor, RegionAccessorMut, TypedRegion};

use std::error::Error;
use std::fmt;

/// Byte size for `len` doubles.
///
/// A request too large to even express in a `usize` is a resource
/// exhaustion error, same as the allocator refusing it.
pub(crate) fn f64_bytes(len: usize) -> Result<usize, BackendError> {
    len.checked_mul(size_of::<f64>())
        .ok_or(BackendError::AllocationFailed { bytes: usize::MAX })
}

/// Alignment requested for every externally-allocated backend.
///
/// 64 bytes covers a full AVX-512 register and a cache line, so the vector
/// kernels never see a misaligned base address.
pub const BACKEND_ALIGN: usize = 64;

/// Errors raised while constructing a backend or a fixture.
///
/// Construction is a single deterministic attempt; nothing here is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// The global allocator returned null for an externally-allocated region.
    AllocationFailed {
        /// Size of the failed request in bytes.
        bytes: usize,
    },
    /// The requested element count is not a multiple of the SIMD width, so
    /// the vectorized kernels would need a remainder tail the fixtures are
    /// meant to rule out.
    LengthNotMultipleOfWidth { len: usize, width: usize },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { bytes } => {
                write!(f, "allocation of {bytes} bytes failed")
            }
            Self::LengthNotMultipleOfWidth { len, width } => {
                write!(f, "length {len} is not a multiple of the vector width {width}")
            }
        }
    }
}

impl Error for BackendError {}

/// Read access to a fixed-length run of f64s.
///
/// `get` follows each backend's own checking discipline: every implementor
/// panics on an out-of-range index. The raw-pointer backend deliberately
/// does not implement this trait - its unchecked accessors are inherent
/// `unsafe fn`s on [`RawBuf`] and the kernels that use them carry the
/// bounds obligation themselves.
pub trait SrcBackend {
    /// Number of f64 elements in the backend.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn get(&self, index: usize) -> f64;
}

/// Write access on top of [`SrcBackend`].
///
/// Split from the read side so the add kernels can take "a readable
/// backend" and "a writable backend" as two independent type parameters
/// and any pairing of backend kinds composes.
pub trait DstBackend: SrcBackend {
    /// Writes `value` to element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn set(&mut self, index: usize, value: f64);
}

/// Contiguous typed storage the vector kernels can load from directly.
///
/// Implemented by the backends whose storage is plain f64s in a row
/// ([`HeapArray`] and [`TypedRegion`]). The byte-buffer and raw-pointer
/// backends stay on the scalar paths.
pub trait DenseF64: SrcBackend {
    /// Base pointer, valid for `self.len()` reads of f64.
    fn as_f64_ptr(&self) -> *const f64;
}

/// Mutable counterpart of [`DenseF64`], for vectorized stores.
pub trait DenseF64Mut: DenseF64 + DstBackend {
    /// Base pointer, valid for `self.len()` reads and writes of f64.
    fn as_f64_mut_ptr(&mut self) -> *mut f64;
}

/// A compiled read accessor: (base, layout) resolved once from a backend,
/// then reused across many reads without re-deriving the element path.
///
/// Implemented by [`RegionAccessor`] and [`ArrayAccessor`], so the
/// accessor-mediated kernels are written once for both backing stores.
pub trait CompiledAccessor: Copy {
    /// Number of f64 elements reachable through the accessor.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn get(&self, index: usize) -> f64;
}
