use std::fmt;

/// Broad numeric category, ordered by expressiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Nature {
	Unsigned = 0,
	Signed = 1,
	Float = 2,
	Complex = 3,
}

impl Nature {
	/// Storage sizes, in bytes, that exist for this nature.
	pub const fn sizes(self) -> &'static [usize] {
		match self {
			Nature::Unsigned | Nature::Signed => &[1, 2, 4, 8],
			Nature::Float => &[4, 8],
			Nature::Complex => &[8, 16],
		}
	}
}

/// Storage size and nature of a numeric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
	/// Size in bytes. Complex kinds count both components.
	pub size: usize,
	pub nature: Nature,
}

/// Fixed-width numeric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Numeric {
	U8,
	U16,
	U32,
	U64,
	I8,
	I16,
	I32,
	I64,
	F32,
	F64,
	C64,
	C128,
}

/// Fixed-width kind aliased by the platform `int`.
pub const INT: Numeric = if usize::BITS == 64 {
	Numeric::I64
} else {
	Numeric::I32
};

/// Fixed-width kind aliased by the platform `uint`.
pub const UINT: Numeric = if usize::BITS == 64 {
	Numeric::U64
} else {
	Numeric::U32
};

/// Returns the platform integer size in bits.
pub const fn arch() -> u32 {
	usize::BITS
}

impl Numeric {
	/// Number of numeric kinds.
	pub const COUNT: usize = 12;

	/// All kinds in lattice order (nature first, then size).
	///
	/// Substitute searches walk this order, so it also decides ties.
	pub const ALL: [Numeric; Self::COUNT] = [
		Numeric::U8,
		Numeric::U16,
		Numeric::U32,
		Numeric::U64,
		Numeric::I8,
		Numeric::I16,
		Numeric::I32,
		Numeric::I64,
		Numeric::F32,
		Numeric::F64,
		Numeric::C64,
		Numeric::C128,
	];

	/// Dense index into [`Numeric::ALL`].
	#[inline]
	pub const fn index(self) -> usize {
		self as usize
	}

	pub const fn descriptor(self) -> Descriptor {
		let (size, nature) = match self {
			Numeric::U8 => (1, Nature::Unsigned),
			Numeric::U16 => (2, Nature::Unsigned),
			Numeric::U32 => (4, Nature::Unsigned),
			Numeric::U64 => (8, Nature::Unsigned),
			Numeric::I8 => (1, Nature::Signed),
			Numeric::I16 => (2, Nature::Signed),
			Numeric::I32 => (4, Nature::Signed),
			Numeric::I64 => (8, Nature::Signed),
			Numeric::F32 => (4, Nature::Float),
			Numeric::F64 => (8, Nature::Float),
			Numeric::C64 => (8, Nature::Complex),
			Numeric::C128 => (16, Nature::Complex),
		};
		Descriptor { size, nature }
	}

	#[inline]
	pub const fn size(self) -> usize {
		self.descriptor().size
	}

	#[inline]
	pub const fn nature(self) -> Nature {
		self.descriptor().nature
	}

	pub const fn name(self) -> &'static str {
		match self {
			Numeric::U8 => "uint8",
			Numeric::U16 => "uint16",
			Numeric::U32 => "uint32",
			Numeric::U64 => "uint64",
			Numeric::I8 => "int8",
			Numeric::I16 => "int16",
			Numeric::I32 => "int32",
			Numeric::I64 => "int64",
			Numeric::F32 => "float32",
			Numeric::F64 => "float64",
			Numeric::C64 => "complex64",
			Numeric::C128 => "complex128",
		}
	}
}

impl fmt::Display for Numeric {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
