//! Type descriptors.
//!
//! A [`Type`] is a reference-counted, immutable description of a value's shape
//! with an optional defined name. Two descriptors are equal when both name and
//! shape are equal, so independently constructed types interoperate as map keys.
//! A fingerprint computed at construction keeps hashing O(1) regardless of
//! nesting depth. Named types may refer to themselves (see [`Type::recursive`]);
//! those compare by identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, OnceLock};

use recast_numeric::{INT, Numeric, UINT};
use rustc_hash::FxHasher;

use crate::error::AccessError;
use crate::kind::{ChanDir, Family, Kind};

/// Structure of a type, independent of its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
	Bool,
	String,
	/// Platform-sized signed integer.
	Int,
	/// Platform-sized unsigned integer.
	Uint,
	Number(Numeric),
	Array { len: usize, elem: Type },
	Slice(Type),
	Map { key: Type, elem: Type },
	Struct(Vec<Field>),
	Pointer(Type),
	Func(Signature),
	Chan { dir: ChanDir, elem: Type },
	Interface,
}

impl Shape {
	pub fn kind(&self) -> Kind {
		match self {
			Shape::Bool => Kind::Bool,
			Shape::String => Kind::String,
			Shape::Int => Kind::Int,
			Shape::Uint => Kind::Uint,
			Shape::Number(n) => Kind::from_numeric(*n),
			Shape::Array { .. } => Kind::Array,
			Shape::Slice(_) => Kind::Slice,
			Shape::Map { .. } => Kind::Map,
			Shape::Struct(_) => Kind::Struct,
			Shape::Pointer(_) => Kind::Pointer,
			Shape::Func(_) => Kind::Func,
			Shape::Chan { .. } => Kind::Chan,
			Shape::Interface => Kind::Interface,
		}
	}
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
	pub name: Arc<str>,
	pub ty: Type,
	pub embedded: bool,
	pub tag: Arc<str>,
}

impl Field {
	pub fn new(name: impl Into<Arc<str>>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
			embedded: false,
			tag: Arc::from(""),
		}
	}

	/// Embedded field, named after its type (or the pointee's, for pointers).
	pub fn embedded(ty: Type) -> Self {
		let name: Arc<str> = match (ty.name(), ty.shape()) {
			(Some(name), _) => Arc::from(name),
			(None, Shape::Pointer(elem)) => elem.name().map_or_else(|| Arc::from(elem.to_string()), Arc::from),
			(None, _) => Arc::from(ty.to_string()),
		};
		Self {
			name,
			ty,
			embedded: true,
			tag: Arc::from(""),
		}
	}

	pub fn with_tag(mut self, tag: impl Into<Arc<str>>) -> Self {
		self.tag = tag.into();
		self
	}

	/// Exported fields start with an uppercase letter.
	pub fn exported(&self) -> bool {
		self.name.chars().next().is_some_and(char::is_uppercase)
	}
}

/// Function parameter and result lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
	pub params: Vec<Type>,
	pub results: Vec<Type>,
	/// The final parameter is a slice accepting a variable number of arguments.
	pub variadic: bool,
}

struct TypeDef {
	name: Option<Arc<str>>,
	shape: OnceLock<Shape>,
	fingerprint: u64,
	recursive: bool,
}

/// Shape of a recursive type whose definition is still running.
static PENDING: Shape = Shape::Interface;

static NEXT_RECURSIVE: AtomicU64 = AtomicU64::new(0);

/// Cheap-to-clone type descriptor.
#[derive(Clone)]
pub struct Type(Arc<TypeDef>);

struct Simple {
	bool: Type,
	string: Type,
	int: Type,
	uint: Type,
	numeric: [Type; Numeric::COUNT],
}

static SIMPLE: LazyLock<Simple> = LazyLock::new(|| Simple {
	bool: Type::from_shape(None, Shape::Bool),
	string: Type::from_shape(None, Shape::String),
	int: Type::from_shape(None, Shape::Int),
	uint: Type::from_shape(None, Shape::Uint),
	numeric: Numeric::ALL.map(|n| Type::from_shape(None, Shape::Number(n))),
});

impl Type {
	fn from_shape(name: Option<Arc<str>>, shape: Shape) -> Self {
		let mut hasher = FxHasher::default();
		name.hash(&mut hasher);
		shape.hash(&mut hasher);
		let fingerprint = hasher.finish();
		Type(Arc::new(TypeDef {
			name,
			shape: OnceLock::from(shape),
			fingerprint,
			recursive: false,
		}))
	}

	/// Unnamed type of a simple kind (see [`Kind::is_simple`]).
	pub fn simple(kind: Kind) -> Option<Type> {
		let table = &*SIMPLE;
		Some(match kind {
			Kind::Bool => table.bool.clone(),
			Kind::String => table.string.clone(),
			Kind::Int => table.int.clone(),
			Kind::Uint => table.uint.clone(),
			k => table.numeric[k.numeric()?.index()].clone(),
		})
	}

	pub fn bool() -> Type {
		SIMPLE.bool.clone()
	}

	pub fn string() -> Type {
		SIMPLE.string.clone()
	}

	pub fn int() -> Type {
		SIMPLE.int.clone()
	}

	pub fn uint() -> Type {
		SIMPLE.uint.clone()
	}

	/// Unnamed fixed-width numeric type.
	pub fn number(n: Numeric) -> Type {
		SIMPLE.numeric[n.index()].clone()
	}

	pub fn array(len: usize, elem: Type) -> Type {
		Type::from_shape(None, Shape::Array { len, elem })
	}

	pub fn slice(elem: Type) -> Type {
		Type::from_shape(None, Shape::Slice(elem))
	}

	pub fn map(key: Type, elem: Type) -> Type {
		Type::from_shape(None, Shape::Map { key, elem })
	}

	pub fn pointer(elem: Type) -> Type {
		Type::from_shape(None, Shape::Pointer(elem))
	}

	pub fn structure(fields: impl IntoIterator<Item = Field>) -> Type {
		Type::from_shape(None, Shape::Struct(fields.into_iter().collect()))
	}

	pub fn func(params: Vec<Type>, results: Vec<Type>, variadic: bool) -> Type {
		Type::from_shape(
			None,
			Shape::Func(Signature {
				params,
				results,
				variadic,
			}),
		)
	}

	pub fn chan(dir: ChanDir, elem: Type) -> Type {
		Type::from_shape(None, Shape::Chan { dir, elem })
	}

	/// The empty interface; holds a value of any type.
	pub fn interface() -> Type {
		Type::from_shape(None, Shape::Interface)
	}

	/// Defines a named type with the shape of `underlying`.
	pub fn named(name: impl Into<Arc<str>>, underlying: &Type) -> Type {
		Type::from_shape(Some(name.into()), underlying.shape().clone())
	}

	/// Defines a named type that refers to itself, like
	/// `type Node struct { Kids []Node }`.
	///
	/// `define` receives the type being defined and returns its underlying
	/// type. Until `define` returns, the new type can only be referenced; its
	/// own shape reads as an interface. Every self-reference must pass through
	/// a slice, pointer, map, channel or function, otherwise values would be
	/// infinite and [`AccessError::Recursive`] is returned. If `define` never
	/// mentions the new type, the result is an ordinary named type.
	///
	/// Every call defines a distinct type. Self-referential types are never
	/// freed.
	pub fn recursive(name: impl Into<Arc<str>>, define: impl FnOnce(&Type) -> Type) -> Result<Type, AccessError> {
		let name: Arc<str> = name.into();
		let mut hasher = FxHasher::default();
		name.hash(&mut hasher);
		NEXT_RECURSIVE.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
		let this = Type(Arc::new(TypeDef {
			name: Some(name.clone()),
			shape: OnceLock::new(),
			fingerprint: hasher.finish(),
			recursive: true,
		}));
		let shape = define(&this).shape().clone();

		let mut found = Occurrence::default();
		scan_shape(&this, &shape, true, &mut Vec::new(), &mut found);
		if found.inline {
			return Err(AccessError::Recursive { name: name.to_string() });
		}
		if !found.any {
			return Ok(Type::from_shape(Some(name), shape));
		}
		this.0.shape.get_or_init(|| shape);
		Ok(this)
	}

	#[inline]
	pub fn kind(&self) -> Kind {
		self.shape().kind()
	}

	pub fn name(&self) -> Option<&str> {
		self.0.name.as_deref()
	}

	#[inline]
	pub fn is_named(&self) -> bool {
		self.0.name.is_some()
	}

	#[inline]
	pub fn shape(&self) -> &Shape {
		self.0.shape.get().unwrap_or(&PENDING)
	}

	/// Whether this type was defined by [`Type::recursive`] and appears in its
	/// own shape.
	#[inline]
	pub fn is_recursive(&self) -> bool {
		self.0.recursive
	}

	/// Unnamed type with the same shape.
	pub fn underlying(&self) -> Type {
		match self.0.name {
			None => self.clone(),
			Some(_) => Type::from_shape(None, self.shape().clone()),
		}
	}

	/// Element type of arrays, slices, maps, pointers and channels.
	pub fn elem(&self) -> Option<&Type> {
		match self.shape() {
			Shape::Array { elem, .. } | Shape::Map { elem, .. } | Shape::Chan { elem, .. } => Some(elem),
			Shape::Slice(elem) | Shape::Pointer(elem) => Some(elem),
			_ => None,
		}
	}

	/// Key type of maps.
	pub fn key(&self) -> Option<&Type> {
		match self.shape() {
			Shape::Map { key, .. } => Some(key),
			_ => None,
		}
	}

	/// Length of arrays.
	pub fn array_len(&self) -> Option<usize> {
		match *self.shape() {
			Shape::Array { len, .. } => Some(len),
			_ => None,
		}
	}

	/// Direct fields of structs; empty for every other kind.
	pub fn fields(&self) -> &[Field] {
		match self.shape() {
			Shape::Struct(fields) => fields,
			_ => &[],
		}
	}

	pub fn signature(&self) -> Option<&Signature> {
		match self.shape() {
			Shape::Func(sig) => Some(sig),
			_ => None,
		}
	}

	pub fn chan_dir(&self) -> Option<ChanDir> {
		match *self.shape() {
			Shape::Chan { dir, .. } => Some(dir),
			_ => None,
		}
	}

	/// Fixed-width numeric kind; `int` and `uint` resolve to the platform width.
	pub fn numeric(&self) -> Option<Numeric> {
		match *self.shape() {
			Shape::Int => Some(INT),
			Shape::Uint => Some(UINT),
			Shape::Number(n) => Some(n),
			_ => None,
		}
	}

	#[inline]
	pub fn is_numeric(&self) -> bool {
		self.numeric().is_some()
	}

	#[inline]
	pub fn family(&self) -> Option<Family> {
		self.kind().family()
	}

	pub fn ptr_eq(a: &Type, b: &Type) -> bool {
		Arc::ptr_eq(&a.0, &b.0)
	}
}

impl PartialEq for Type {
	fn eq(&self, other: &Self) -> bool {
		if Type::ptr_eq(self, other) {
			return true;
		}
		!self.0.recursive
			&& !other.0.recursive
			&& self.0.fingerprint == other.0.fingerprint
			&& self.0.name == other.0.name
			&& self.shape() == other.shape()
	}
}

impl Eq for Type {}

impl Hash for Type {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_u64(self.0.fingerprint);
	}
}

impl fmt::Debug for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Type({self})")
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(name) = &self.0.name {
			return f.write_str(name);
		}
		match self.shape() {
			Shape::Bool => f.write_str("bool"),
			Shape::String => f.write_str("string"),
			Shape::Int => f.write_str("int"),
			Shape::Uint => f.write_str("uint"),
			Shape::Number(n) => f.write_str(n.name()),
			Shape::Array { len, elem } => write!(f, "[{len}]{elem}"),
			Shape::Slice(elem) => write!(f, "[]{elem}"),
			Shape::Map { key, elem } => write!(f, "map[{key}]{elem}"),
			Shape::Pointer(elem) => write!(f, "*{elem}"),
			Shape::Struct(fields) if fields.is_empty() => f.write_str("struct {}"),
			Shape::Struct(fields) => {
				f.write_str("struct {")?;
				for (i, field) in fields.iter().enumerate() {
					f.write_str(if i == 0 { " " } else { "; " })?;
					if !field.embedded {
						write!(f, "{} ", field.name)?;
					}
					write!(f, "{}", field.ty)?;
					if !field.tag.is_empty() {
						write!(f, " {:?}", field.tag)?;
					}
				}
				f.write_str(" }")
			}
			Shape::Func(sig) => {
				f.write_str("func(")?;
				let last = sig.params.len().saturating_sub(1);
				for (i, param) in sig.params.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					match (sig.variadic && i == last, param.elem()) {
						(true, Some(elem)) => write!(f, "...{elem}")?,
						_ => write!(f, "{param}")?,
					}
				}
				f.write_str(")")?;
				match sig.results.as_slice() {
					[] => Ok(()),
					[one] => write!(f, " {one}"),
					many => {
						f.write_str(" (")?;
						for (i, result) in many.iter().enumerate() {
							if i > 0 {
								f.write_str(", ")?;
							}
							write!(f, "{result}")?;
						}
						f.write_str(")")
					}
				}
			}
			Shape::Chan { dir, elem } => match dir {
				ChanDir::Recv => write!(f, "<-chan {elem}"),
				ChanDir::Send => write!(f, "chan<- {elem}"),
				ChanDir::Both => write!(f, "chan {elem}"),
			},
			Shape::Interface => f.write_str("interface {}"),
		}
	}
}

#[derive(Default)]
struct Occurrence {
	any: bool,
	inline: bool,
}

/// Records where `this` appears within `ty`. `inline` turns false once the walk
/// passes through an indirection. Recursive types are entered at most once per
/// inline state.
fn scan(this: &Type, ty: &Type, inline: bool, seen: &mut Vec<(Type, bool)>, found: &mut Occurrence) {
	if Type::ptr_eq(ty, this) {
		found.any = true;
		found.inline |= inline;
		return;
	}
	if ty.is_recursive() {
		if seen.iter().any(|(t, i)| Type::ptr_eq(t, ty) && (*i || !inline)) {
			return;
		}
		seen.push((ty.clone(), inline));
	}
	scan_shape(this, ty.shape(), inline, seen, found);
}

fn scan_shape(this: &Type, shape: &Shape, inline: bool, seen: &mut Vec<(Type, bool)>, found: &mut Occurrence) {
	match shape {
		Shape::Array { elem, .. } => scan(this, elem, inline, seen, found),
		Shape::Struct(fields) => {
			for field in fields {
				scan(this, &field.ty, inline, seen, found);
			}
		}
		Shape::Slice(elem) | Shape::Pointer(elem) | Shape::Chan { elem, .. } => scan(this, elem, false, seen, found),
		Shape::Map { key, elem } => {
			scan(this, key, false, seen, found);
			scan(this, elem, false, seen, found);
		}
		Shape::Func(sig) => {
			for t in sig.params.iter().chain(&sig.results) {
				scan(this, t, false, seen, found);
			}
		}
		Shape::Bool | Shape::String | Shape::Int | Shape::Uint | Shape::Number(_) | Shape::Interface => {}
	}
}

#[cfg(test)]
mod tests;
