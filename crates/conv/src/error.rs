use std::fmt;

use recast_types::{AccessError, Type};

/// Which side of a conversion rule an operand sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	Destination,
	Source,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Side::Destination => "destination",
			Side::Source => "source",
		})
	}
}

/// Errors produced while registering, building or running conversions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	/// No rule converts values of `src` into `dst`.
	#[error("invalid conversion from {src} to {dst}")]
	Invalid { src: Type, dst: Type },
	/// A rule's fixed operand does not match the engine it was loaded into.
	#[error("expected {side} to be {expected}, found {found}")]
	Signature { side: Side, expected: String, found: String },
	/// `build` was called with no rules and no implicit fallback.
	#[error("{0}")]
	EmptyRuleset(&'static str),
	/// A value of the wrong type was passed on the fixed side of a conversion.
	#[error("expected a value of type {expected}, found {found}")]
	Mismatch { expected: Type, found: Type },
	/// A recursion handle was used before `build`, or after the conversion was dropped.
	#[error("conversion is not built")]
	Unbuilt,
	/// No builder in a chain recognized the type.
	#[error("no conversion available for {ty}")]
	Unsupported { ty: Type },
	/// A composite type has too many parts to encode structurally.
	#[error("{ty} has {count} parts; at most 255 can be encoded")]
	BaseOverflow { ty: Type, count: usize },
	#[error("malformed structural descriptor")]
	MalformedBase,
	#[error(transparent)]
	Access(#[from] AccessError),
	#[error(transparent)]
	Numeric(#[from] recast_numeric::Error),
	#[error("invalid configuration: {0}")]
	Config(String),
	/// Failure reported by a user-supplied rule.
	#[error("{0}")]
	Custom(String),
}

impl Error {
	pub fn custom(msg: impl fmt::Display) -> Self {
		Error::Custom(msg.to_string())
	}
}

pub type Result<T> = std::result::Result<T, Error>;
