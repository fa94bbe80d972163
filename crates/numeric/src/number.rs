use crate::{Error, Nature, Numeric, rate};

/// Complex number stored as two components of the same float width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
	pub re: T,
	pub im: T,
}

impl<T> Complex<T> {
	pub const fn new(re: T, im: T) -> Self {
		Self { re, im }
	}
}

/// A numeric value tagged with its fixed-width kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	F32(f32),
	F64(f64),
	C64(Complex<f32>),
	C128(Complex<f64>),
}

/// Widest representation of each nature, used as the conversion pivot.
enum Wide {
	Unsigned(u64),
	Signed(i64),
	Float(f64),
	Complex(Complex<f64>),
}

impl Number {
	/// Zero value of `kind`.
	pub const fn zero(kind: Numeric) -> Self {
		match kind {
			Numeric::U8 => Number::U8(0),
			Numeric::U16 => Number::U16(0),
			Numeric::U32 => Number::U32(0),
			Numeric::U64 => Number::U64(0),
			Numeric::I8 => Number::I8(0),
			Numeric::I16 => Number::I16(0),
			Numeric::I32 => Number::I32(0),
			Numeric::I64 => Number::I64(0),
			Numeric::F32 => Number::F32(0.0),
			Numeric::F64 => Number::F64(0.0),
			Numeric::C64 => Number::C64(Complex::new(0.0, 0.0)),
			Numeric::C128 => Number::C128(Complex::new(0.0, 0.0)),
		}
	}

	pub const fn kind(&self) -> Numeric {
		match self {
			Number::U8(_) => Numeric::U8,
			Number::U16(_) => Numeric::U16,
			Number::U32(_) => Numeric::U32,
			Number::U64(_) => Numeric::U64,
			Number::I8(_) => Numeric::I8,
			Number::I16(_) => Numeric::I16,
			Number::I32(_) => Numeric::I32,
			Number::I64(_) => Numeric::I64,
			Number::F32(_) => Numeric::F32,
			Number::F64(_) => Numeric::F64,
			Number::C64(_) => Numeric::C64,
			Number::C128(_) => Numeric::C128,
		}
	}

	/// Platform `int` value, stored under its fixed-width alias.
	pub fn int(v: isize) -> Self {
		match crate::INT {
			Numeric::I32 => Number::I32(v as i32),
			_ => Number::I64(v as i64),
		}
	}

	/// Platform `uint` value, stored under its fixed-width alias.
	pub fn uint(v: usize) -> Self {
		match crate::UINT {
			Numeric::U32 => Number::U32(v as u32),
			_ => Number::U64(v as u64),
		}
	}

	/// Returns the value as `i64` if it is an integer that fits.
	pub fn to_i64(&self) -> Option<i64> {
		match self.wide() {
			Wide::Signed(v) => Some(v),
			Wide::Unsigned(v) => i64::try_from(v).ok(),
			Wide::Float(_) | Wide::Complex(_) => None,
		}
	}

	/// Returns the value as `u64` if it is a non-negative integer.
	pub fn to_u64(&self) -> Option<u64> {
		match self.wide() {
			Wide::Unsigned(v) => Some(v),
			Wide::Signed(v) => u64::try_from(v).ok(),
			Wide::Float(_) | Wide::Complex(_) => None,
		}
	}

	/// Returns the value as `f64` for every non-complex kind.
	///
	/// 64-bit integers beyond 2^53 are rounded.
	pub fn to_f64(&self) -> Option<f64> {
		match self.wide() {
			Wide::Unsigned(v) => Some(v as f64),
			Wide::Signed(v) => Some(v as f64),
			Wide::Float(v) => Some(v),
			Wide::Complex(_) => None,
		}
	}

	/// Returns the value as a complex number; real kinds get a zero imaginary part.
	pub fn to_complex(&self) -> Complex<f64> {
		match self.wide() {
			Wide::Unsigned(v) => Complex::new(v as f64, 0.0),
			Wide::Signed(v) => Complex::new(v as f64, 0.0),
			Wide::Float(v) => Complex::new(v, 0.0),
			Wide::Complex(c) => c,
		}
	}

	fn wide(&self) -> Wide {
		match *self {
			Number::U8(v) => Wide::Unsigned(v.into()),
			Number::U16(v) => Wide::Unsigned(v.into()),
			Number::U32(v) => Wide::Unsigned(v.into()),
			Number::U64(v) => Wide::Unsigned(v),
			Number::I8(v) => Wide::Signed(v.into()),
			Number::I16(v) => Wide::Signed(v.into()),
			Number::I32(v) => Wide::Signed(v.into()),
			Number::I64(v) => Wide::Signed(v),
			Number::F32(v) => Wide::Float(v.into()),
			Number::F64(v) => Wide::Float(v),
			Number::C64(c) => Wide::Complex(Complex::new(c.re.into(), c.im.into())),
			Number::C128(c) => Wide::Complex(c),
		}
	}
}

macro_rules! number_from {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Number {
				fn from(v: $ty) -> Self {
					Number::$variant(v)
				}
			}
		)*
	};
}

number_from! {
	u8 => U8,
	u16 => U16,
	u32 => U32,
	u64 => U64,
	i8 => I8,
	i16 => I16,
	i32 => I32,
	i64 => I64,
	f32 => F32,
	f64 => F64,
	Complex<f32> => C64,
	Complex<f64> => C128,
}

/// Converts `src` into the `dst` kind.
///
/// Only lossless conversions (those with a [`rate`]) are performed. A
/// non-complex source converted into a complex kind is first promoted to the
/// float of matching component width, with a zero imaginary part.
pub fn convert(dst: Numeric, src: Number) -> Result<Number, Error> {
	let lossy = Error::Lossy {
		dst,
		src: src.kind(),
	};
	if rate(dst, src.kind()).is_none() {
		return Err(lossy);
	}

	// Every cast below is exact: the rating rejects narrowing pairs.
	let out = match (dst.nature(), src.wide()) {
		(Nature::Unsigned, Wide::Unsigned(v)) => match dst {
			Numeric::U8 => Number::U8(v as u8),
			Numeric::U16 => Number::U16(v as u16),
			Numeric::U32 => Number::U32(v as u32),
			_ => Number::U64(v),
		},
		(Nature::Signed, Wide::Unsigned(v)) => signed(dst, v as i64),
		(Nature::Signed, Wide::Signed(v)) => signed(dst, v),
		(Nature::Float, Wide::Unsigned(v)) => float(dst, v as f64),
		(Nature::Float, Wide::Signed(v)) => float(dst, v as f64),
		(Nature::Float, Wide::Float(v)) => float(dst, v),
		(Nature::Complex, _) => {
			let c = src.to_complex();
			match dst {
				Numeric::C64 => Number::C64(Complex::new(c.re as f32, c.im as f32)),
				_ => Number::C128(c),
			}
		}
		_ => return Err(lossy),
	};
	Ok(out)
}

fn signed(dst: Numeric, v: i64) -> Number {
	match dst {
		Numeric::I8 => Number::I8(v as i8),
		Numeric::I16 => Number::I16(v as i16),
		Numeric::I32 => Number::I32(v as i32),
		_ => Number::I64(v),
	}
}

fn float(dst: Numeric, v: f64) -> Number {
	match dst {
		Numeric::F32 => Number::F32(v as f32),
		_ => Number::F64(v),
	}
}
