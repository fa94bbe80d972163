//! Structural descriptors.
//!
//! A [`Base`] is a canonical byte encoding of a type's layout: the aliased kind
//! tag, followed by whatever the kind needs to pin its shape down.
//!
//! | kind      | encoding                                         |
//! |-----------|--------------------------------------------------|
//! | simple    | `tag`                                            |
//! | interface | `tag`                                            |
//! | array     | `tag len elem`                                   |
//! | slice     | `tag elem`                                       |
//! | pointer   | `tag elem`                                       |
//! | map       | `tag key elem`                                   |
//! | struct    | `tag n field0 .. fieldN`                         |
//! | chan      | `tag dir elem`                                   |
//! | func      | `tag nin nout variadic in0 .. inN out0 .. outN`  |
//!
//! Names (of types and of fields) are not encoded, and `int`/`uint` encode as
//! their fixed-width alias, so two types with equal Bases hold
//! interchangeable payloads.
//!
//! A self-referential type is prefixed with `REC`. Inside it, a reference back
//! to an enclosing self-referential type is `BACK depth`, where `depth` counts
//! the `REC` frames between the reference and its target (0 for the nearest).

use std::fmt;

use recast_types::{ChanDir, Field, Kind, Shape, Type};
use smallvec::SmallVec;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{Error, Result};

const REC: u8 = 0xfe;
const BACK: u8 = 0xff;

/// Canonical layout encoding of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base(SmallVec<[u8; 16]>);

/// 64-bit digest of a [`Base`], used as a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseHash(u64);

impl fmt::Display for BaseHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:016x}", self.0)
	}
}

impl Base {
	/// Encodes `ty`.
	///
	/// Arrays longer than 255 elements, and structs or functions with more than
	/// 255 fields or parameters, cannot be encoded and fail with
	/// [`Error::BaseOverflow`].
	pub fn of(ty: &Type) -> Result<Base> {
		let mut bytes = SmallVec::new();
		encode(ty, &mut Vec::new(), &mut bytes)?;
		Ok(Base(bytes))
	}

	/// Wraps raw bytes, checking that they form exactly one encoding.
	pub fn from_bytes(bytes: &[u8]) -> Result<Base> {
		let base = Base(SmallVec::from_slice(bytes));
		base.reconstruct()?;
		Ok(base)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn digest(&self) -> BaseHash {
		BaseHash(xxh3_64(&self.0))
	}

	/// Top-level kind.
	pub fn kind(&self) -> Option<Kind> {
		let tag = match *self.0.first()? {
			REC => *self.0.get(1)?,
			tag => tag,
		};
		Kind::from_tag(tag)
	}

	/// True when no interface appears anywhere in the layout.
	pub fn is_concrete(&self) -> bool {
		let mut cursor = Cursor::new(&self.0);
		matches!(scan(&mut cursor), Ok(true)) && cursor.done()
	}

	/// Builds an unnamed type with this layout. Struct fields are named `F0`,
	/// `F1`, and so on.
	pub fn reconstruct(&self) -> Result<Type> {
		let mut cursor = Cursor::new(&self.0);
		let ty = decode(&mut cursor, &mut Vec::new())?;
		if !cursor.done() {
			return Err(Error::MalformedBase);
		}
		Ok(ty)
	}
}

/// Whether `ty` takes part in layout-based registration: an unnamed type built
/// only from simple types and unnamed arrays, slices, pointers, maps, structs
/// and functions.
pub fn is_basic(ty: &Type) -> bool {
	if ty.is_named() {
		return false;
	}
	match ty.shape() {
		Shape::Bool | Shape::String | Shape::Int | Shape::Uint | Shape::Number(_) => true,
		Shape::Array { elem, .. } | Shape::Slice(elem) | Shape::Pointer(elem) => is_basic(elem),
		Shape::Map { key, elem } => is_basic(key) && is_basic(elem),
		Shape::Struct(fields) => fields.iter().all(|f| is_basic(&f.ty)),
		Shape::Func(sig) => sig.params.iter().chain(&sig.results).all(is_basic),
		Shape::Chan { .. } | Shape::Interface => false,
	}
}

fn count(ty: &Type, n: usize) -> Result<u8> {
	u8::try_from(n).map_err(|_| Error::BaseOverflow {
		ty: ty.clone(),
		count: n,
	})
}

/// `open` holds the self-referential types currently being encoded, outermost
/// first.
fn encode(ty: &Type, open: &mut Vec<Type>, out: &mut SmallVec<[u8; 16]>) -> Result<()> {
	if !ty.is_recursive() {
		return encode_shape(ty, open, out);
	}
	if let Some(pos) = open.iter().rposition(|t| Type::ptr_eq(t, ty)) {
		out.push(BACK);
		out.push(count(ty, open.len() - 1 - pos)?);
		return Ok(());
	}
	out.push(REC);
	open.push(ty.clone());
	let encoded = encode_shape(ty, open, out);
	open.pop();
	encoded
}

fn encode_shape(ty: &Type, open: &mut Vec<Type>, out: &mut SmallVec<[u8; 16]>) -> Result<()> {
	out.push(ty.kind().alias().tag());
	match ty.shape() {
		Shape::Bool | Shape::String | Shape::Int | Shape::Uint | Shape::Number(_) | Shape::Interface => {}
		Shape::Array { len, elem } => {
			out.push(count(ty, *len)?);
			encode(elem, open, out)?;
		}
		Shape::Slice(elem) | Shape::Pointer(elem) => encode(elem, open, out)?,
		Shape::Map { key, elem } => {
			encode(key, open, out)?;
			encode(elem, open, out)?;
		}
		Shape::Struct(fields) => {
			out.push(count(ty, fields.len())?);
			for field in fields {
				encode(&field.ty, open, out)?;
			}
		}
		Shape::Chan { dir, elem } => {
			out.push(*dir as u8);
			encode(elem, open, out)?;
		}
		Shape::Func(sig) => {
			out.push(count(ty, sig.params.len())?);
			out.push(count(ty, sig.results.len())?);
			out.push(u8::from(sig.variadic));
			for t in sig.params.iter().chain(&sig.results) {
				encode(t, open, out)?;
			}
		}
	}
	Ok(())
}

struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	fn peek(&self) -> Result<u8> {
		self.bytes.get(self.pos).copied().ok_or(Error::MalformedBase)
	}

	fn byte(&mut self) -> Result<u8> {
		let b = *self.bytes.get(self.pos).ok_or(Error::MalformedBase)?;
		self.pos += 1;
		Ok(b)
	}

	fn kind(&mut self) -> Result<Kind> {
		Kind::from_tag(self.byte()?).ok_or(Error::MalformedBase)
	}

	fn done(&self) -> bool {
		self.pos == self.bytes.len()
	}
}

/// Walks one encoding, reporting whether it is free of interfaces.
fn scan(c: &mut Cursor<'_>) -> Result<bool> {
	match c.peek()? {
		REC => {
			c.byte()?;
		}
		BACK => {
			c.byte()?;
			c.byte()?;
			return Ok(true);
		}
		_ => {}
	}
	let kind = c.kind()?;
	if kind.is_simple() {
		return Ok(true);
	}
	Ok(match kind {
		Kind::Interface => false,
		Kind::Array | Kind::Chan => {
			c.byte()?;
			scan(c)?
		}
		Kind::Slice | Kind::Pointer => scan(c)?,
		Kind::Map => scan(c)? & scan(c)?,
		Kind::Struct => {
			let mut concrete = true;
			for _ in 0..c.byte()? {
				concrete &= scan(c)?;
			}
			concrete
		}
		Kind::Func => {
			let n = usize::from(c.byte()?) + usize::from(c.byte()?);
			c.byte()?;
			let mut concrete = true;
			for _ in 0..n {
				concrete &= scan(c)?;
			}
			concrete
		}
		_ => return Err(Error::MalformedBase),
	})
}

/// `open` holds the self-referential types being decoded, outermost first.
fn decode(c: &mut Cursor<'_>, open: &mut Vec<Type>) -> Result<Type> {
	match c.peek()? {
		REC => {
			c.byte()?;
			decode_recursive(c, open)
		}
		BACK => {
			c.byte()?;
			let depth = usize::from(c.byte()?);
			let pos = open.len().checked_sub(depth + 1).ok_or(Error::MalformedBase)?;
			Ok(open[pos].clone())
		}
		_ => decode_shape(c, open),
	}
}

fn decode_recursive(c: &mut Cursor<'_>, open: &mut Vec<Type>) -> Result<Type> {
	let mut inner = Ok(());
	let name = format!("T{}", open.len());
	let ty = Type::recursive(name, |this| {
		open.push(this.clone());
		let underlying = decode_shape(c, open).unwrap_or_else(|e| {
			inner = Err(e);
			Type::interface()
		});
		open.pop();
		underlying
	})
	.map_err(|_| Error::MalformedBase)?;
	inner?;
	// A frame nothing refers back to is not canonical.
	if !ty.is_recursive() {
		return Err(Error::MalformedBase);
	}
	Ok(ty)
}

fn decode_shape(c: &mut Cursor<'_>, open: &mut Vec<Type>) -> Result<Type> {
	let kind = c.kind()?;
	if let Some(ty) = Type::simple(kind) {
		return Ok(ty);
	}
	Ok(match kind {
		Kind::Interface => Type::interface(),
		Kind::Array => {
			let len = usize::from(c.byte()?);
			Type::array(len, decode(c, open)?)
		}
		Kind::Slice => Type::slice(decode(c, open)?),
		Kind::Pointer => Type::pointer(decode(c, open)?),
		Kind::Map => {
			let key = decode(c, open)?;
			Type::map(key, decode(c, open)?)
		}
		Kind::Struct => {
			let n = c.byte()?;
			let mut fields = Vec::with_capacity(n.into());
			for i in 0..n {
				fields.push(Field::new(format!("F{i}"), decode(c, open)?));
			}
			Type::structure(fields)
		}
		Kind::Chan => {
			let dir = ChanDir::from_tag(c.byte()?).ok_or(Error::MalformedBase)?;
			Type::chan(dir, decode(c, open)?)
		}
		Kind::Func => {
			let nin = c.byte()?;
			let nout = c.byte()?;
			let variadic = match c.byte()? {
				0 => false,
				1 => true,
				_ => return Err(Error::MalformedBase),
			};
			let params = (0..nin).map(|_| decode(c, open)).collect::<Result<Vec<_>>>()?;
			let results = (0..nout).map(|_| decode(c, open)).collect::<Result<Vec<_>>>()?;
			Type::func(params, results, variadic)
		}
		_ => return Err(Error::MalformedBase),
	})
}
