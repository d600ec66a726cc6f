//! The kernel matrix: sum-reduction and elementwise add, each in scalar,
//! unrolled, long-stride, accessor-mediated, vectorized, and raw-pointer
//! variants.
//!
//! The variants are distinct named functions rather than one kernel with
//! an unroll knob: their floating-point results are not guaranteed
//! identical (reassociation), and each one has to be benchmarked and
//! tested on its own.

pub mod add;
pub mod sum;
