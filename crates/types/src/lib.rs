//! Runtime type descriptors and dynamic values.
//!
//! [`Type`] describes a value's shape (with an optional defined name), [`Value`]
//! pairs a type with an untyped [`Data`] payload, and the [`access`] handles give
//! kind-specific read and write access to values without matching on `Data`
//! directly.

pub mod access;
mod error;
mod kind;
mod ty;
mod value;

pub use access::FieldPolicy;
pub use error::AccessError;
pub use kind::{ChanDir, Family, Kind};
pub use ty::{Field, Shape, Signature, Type};
pub use value::{Chan, Data, Func, Value};
