use std::fmt;

use recast_numeric::{INT, Numeric, UINT};

/// Top-level shape tag of a [`Type`](crate::Type).
///
/// Discriminants are stable and appear verbatim in structural encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Kind {
	Bool = 1,
	Int = 2,
	Int8 = 3,
	Int16 = 4,
	Int32 = 5,
	Int64 = 6,
	Uint = 7,
	Uint8 = 8,
	Uint16 = 9,
	Uint32 = 10,
	Uint64 = 11,
	Float32 = 13,
	Float64 = 14,
	Complex64 = 15,
	Complex128 = 16,
	Array = 17,
	Chan = 18,
	Func = 19,
	Interface = 20,
	Map = 21,
	Pointer = 22,
	Slice = 23,
	String = 24,
	Struct = 25,
}

impl Kind {
	#[inline]
	pub const fn tag(self) -> u8 {
		self as u8
	}

	pub const fn from_tag(tag: u8) -> Option<Kind> {
		Some(match tag {
			1 => Kind::Bool,
			2 => Kind::Int,
			3 => Kind::Int8,
			4 => Kind::Int16,
			5 => Kind::Int32,
			6 => Kind::Int64,
			7 => Kind::Uint,
			8 => Kind::Uint8,
			9 => Kind::Uint16,
			10 => Kind::Uint32,
			11 => Kind::Uint64,
			13 => Kind::Float32,
			14 => Kind::Float64,
			15 => Kind::Complex64,
			16 => Kind::Complex128,
			17 => Kind::Array,
			18 => Kind::Chan,
			19 => Kind::Func,
			20 => Kind::Interface,
			21 => Kind::Map,
			22 => Kind::Pointer,
			23 => Kind::Slice,
			24 => Kind::String,
			25 => Kind::Struct,
			_ => return None,
		})
	}

	pub const fn from_numeric(n: Numeric) -> Kind {
		match n {
			Numeric::U8 => Kind::Uint8,
			Numeric::U16 => Kind::Uint16,
			Numeric::U32 => Kind::Uint32,
			Numeric::U64 => Kind::Uint64,
			Numeric::I8 => Kind::Int8,
			Numeric::I16 => Kind::Int16,
			Numeric::I32 => Kind::Int32,
			Numeric::I64 => Kind::Int64,
			Numeric::F32 => Kind::Float32,
			Numeric::F64 => Kind::Float64,
			Numeric::C64 => Kind::Complex64,
			Numeric::C128 => Kind::Complex128,
		}
	}

	/// Fixed-width numeric kind, with `int` and `uint` resolved to the
	/// platform width.
	pub const fn numeric(self) -> Option<Numeric> {
		Some(match self {
			Kind::Int => INT,
			Kind::Uint => UINT,
			Kind::Int8 => Numeric::I8,
			Kind::Int16 => Numeric::I16,
			Kind::Int32 => Numeric::I32,
			Kind::Int64 => Numeric::I64,
			Kind::Uint8 => Numeric::U8,
			Kind::Uint16 => Numeric::U16,
			Kind::Uint32 => Numeric::U32,
			Kind::Uint64 => Numeric::U64,
			Kind::Float32 => Numeric::F32,
			Kind::Float64 => Numeric::F64,
			Kind::Complex64 => Numeric::C64,
			Kind::Complex128 => Numeric::C128,
			_ => return None,
		})
	}

	/// Replaces the platform-sized `int`/`uint` with their fixed-width alias.
	/// Every other kind is returned unchanged.
	pub const fn alias(self) -> Kind {
		match self {
			Kind::Int => Kind::from_numeric(INT),
			Kind::Uint => Kind::from_numeric(UINT),
			k => k,
		}
	}

	#[inline]
	pub const fn is_numeric(self) -> bool {
		self.numeric().is_some()
	}

	/// Kinds that carry no nested types: booleans, strings and numbers.
	pub const fn is_simple(self) -> bool {
		matches!(self, Kind::Bool | Kind::String) || self.is_numeric()
	}

	/// Family used for kind-generic rule registration.
	pub const fn family(self) -> Option<Family> {
		Some(match self {
			Kind::Array => Family::Array,
			Kind::Map => Family::Map,
			Kind::Pointer => Family::Pointer,
			Kind::Slice => Family::Slice,
			Kind::Struct => Family::Struct,
			k if k.is_numeric() => Family::Number,
			_ => return None,
		})
	}

	pub const fn name(self) -> &'static str {
		match self {
			Kind::Bool => "bool",
			Kind::Int => "int",
			Kind::Uint => "uint",
			Kind::Array => "array",
			Kind::Chan => "chan",
			Kind::Func => "func",
			Kind::Interface => "interface",
			Kind::Map => "map",
			Kind::Pointer => "ptr",
			Kind::Slice => "slice",
			Kind::String => "string",
			Kind::Struct => "struct",
			k => match k.numeric() {
				Some(n) => n.name(),
				None => "invalid",
			},
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Family of kinds a generic rule can be registered for.
///
/// [`Family::Number`] covers every numeric kind and is distinct from any
/// concrete numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
	Array,
	Map,
	Number,
	Pointer,
	Slice,
	Struct,
}

impl fmt::Display for Family {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Family::Array => "array",
			Family::Map => "map",
			Family::Number => "number",
			Family::Pointer => "pointer",
			Family::Slice => "slice",
			Family::Struct => "struct",
		})
	}
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChanDir {
	Recv = 1,
	Send = 2,
	Both = 3,
}

impl ChanDir {
	pub const fn from_tag(tag: u8) -> Option<ChanDir> {
		match tag {
			1 => Some(ChanDir::Recv),
			2 => Some(ChanDir::Send),
			3 => Some(ChanDir::Both),
			_ => None,
		}
	}
}
