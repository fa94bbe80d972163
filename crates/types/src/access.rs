//! Kind-specific handles over a [`Value`](crate::Value).
//!
//! Every handle is generic over how it holds the value: anything that
//! [`Borrow`](std::borrow::Borrow)s a `Value` can be read, and anything that
//! [`BorrowMut`](std::borrow::BorrowMut)s one can also be written. Conversion
//! rules read owned sources (`Array<Value>`) and write into borrowed
//! destinations (`Array<&mut Value>`).
//!
//! Constructors check the kind once; element reads clone, element writes
//! require the exact element type.

mod array;
mod map;
mod number;
mod pointer;
mod structure;

pub use array::{Array, Slice};
pub use map::{Map, MapIter};
pub use number::Number;
pub use pointer::Pointer;
use serde::{Deserialize, Serialize};
pub use structure::{FieldEntry, Struct, StructIter};

/// Which struct fields an accessor enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
	/// Exported fields, with embedded structs flattened into their promoted
	/// fields. Names shadowed by a shallower field, or ambiguous at their
	/// shallowest depth, are skipped.
	#[default]
	Visible,
	/// Every direct field, exported or not.
	All,
}

#[cfg(test)]
mod tests;
