//! Numeric kinds and the lossless conversion lattice between them.
//!
//! Every numeric kind is classified by its storage size and its [`Nature`]
//! (unsigned, signed, float, complex). From that classification a pairwise
//! [`rate`] is precomputed at compile time: `None` when a source kind cannot be
//! represented by a destination kind without loss, otherwise a cost counting the
//! narrower representations that were skipped. Resolvers use the cost to pick the
//! closest viable substitute among several registered kinds.
//!
//! # Platform integers
//!
//! The platform-sized `int` and `uint` kinds do not have their own entries; they
//! alias to [`INT`] and [`UINT`], the fixed-width kinds matching `usize::BITS`.

mod error;
mod kind;
mod lattice;
mod number;

pub use error::Error;
pub use kind::{Descriptor, INT, Nature, Numeric, UINT, arch};
pub use lattice::rate;
pub use number::{Complex, Number, convert};
