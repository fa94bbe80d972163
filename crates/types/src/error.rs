use crate::Type;

/// Misuse of a [`Value`](crate::Value) or one of its accessors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
	#[error("expected {expected} value, found {found}")]
	Kind { expected: &'static str, found: Type },
	#[error("index {index} out of range for length {len}")]
	OutOfRange { index: usize, len: usize },
	#[error("{ty} has no field {name:?}")]
	NoField { name: String, ty: Type },
	#[error("field {name:?} of {ty} is not visible")]
	Hidden { name: String, ty: Type },
	#[error("expected value of type {expected}, found {found}")]
	Mismatch { expected: Type, found: Type },
	#[error("data does not match the shape of {ty}")]
	Shape { ty: Type },
	#[error("nil pointer dereference")]
	Nil,
	#[error("recursive type {name} contains itself without indirection")]
	Recursive { name: String },
	#[error(transparent)]
	Numeric(#[from] recast_numeric::Error),
}
