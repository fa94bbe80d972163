use std::any::Any;
use std::fmt;
use std::sync::Arc;

use recast_numeric::{Complex, Number};

use crate::error::AccessError;
use crate::kind::Kind;
use crate::ty::{Shape, Type};

type FuncFn = dyn Fn(&[Value]) -> Vec<Value> + Send + Sync;

/// Shared function handle. Compares by identity.
#[derive(Clone)]
pub struct Func(Arc<FuncFn>);

impl Func {
	pub fn new(f: impl Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static) -> Self {
		Func(Arc::new(f))
	}

	pub fn call(&self, args: &[Value]) -> Vec<Value> {
		(self.0)(args)
	}
}

impl PartialEq for Func {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Func {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Func(..)")
	}
}

/// Opaque channel handle. Compares by identity.
#[derive(Clone)]
pub struct Chan(Arc<dyn Any + Send + Sync>);

impl Chan {
	pub fn new<T: Any + Send + Sync>(inner: T) -> Self {
		Chan(Arc::new(inner))
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref()
	}
}

impl PartialEq for Chan {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Chan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Chan(..)")
	}
}

/// Untyped payload of a [`Value`].
///
/// The variant mirrors the kind of the owning type. Numbers are stored under
/// their fixed-width kind, so an `int` holds an `I64` on 64-bit platforms.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
	Bool(bool),
	String(String),
	Number(Number),
	Array(Vec<Data>),
	Slice(Vec<Data>),
	/// Entries in insertion order; keys are unique.
	Map(Vec<(Data, Data)>),
	Struct(Vec<Data>),
	Pointer(Option<Box<Data>>),
	Func(Option<Func>),
	Chan(Option<Chan>),
	Interface(Option<Box<Value>>),
}

impl Data {
	pub fn zero(ty: &Type) -> Data {
		match ty.shape() {
			Shape::Bool => Data::Bool(false),
			Shape::String => Data::String(String::new()),
			Shape::Int | Shape::Uint | Shape::Number(_) => match ty.numeric() {
				Some(n) => Data::Number(Number::zero(n)),
				None => Data::Interface(None),
			},
			Shape::Array { len, elem } => Data::Array(vec![Data::zero(elem); *len]),
			Shape::Slice(_) => Data::Slice(Vec::new()),
			Shape::Map { .. } => Data::Map(Vec::new()),
			Shape::Struct(fields) => Data::Struct(fields.iter().map(|f| Data::zero(&f.ty)).collect()),
			Shape::Pointer(_) => Data::Pointer(None),
			Shape::Func(_) => Data::Func(None),
			Shape::Chan { .. } => Data::Chan(None),
			Shape::Interface => Data::Interface(None),
		}
	}

	/// Whether this payload is a valid inhabitant of `ty`.
	pub fn conforms(&self, ty: &Type) -> bool {
		match (self, ty.shape()) {
			(Data::Bool(_), Shape::Bool) | (Data::String(_), Shape::String) => true,
			(Data::Number(n), Shape::Int | Shape::Uint | Shape::Number(_)) => ty.numeric() == Some(n.kind()),
			(Data::Array(items), Shape::Array { len, elem }) => {
				items.len() == *len && items.iter().all(|d| d.conforms(elem))
			}
			(Data::Slice(items), Shape::Slice(elem)) => items.iter().all(|d| d.conforms(elem)),
			(Data::Map(entries), Shape::Map { key, elem }) => {
				entries.iter().all(|(k, v)| k.conforms(key) && v.conforms(elem))
			}
			(Data::Struct(items), Shape::Struct(fields)) => {
				items.len() == fields.len() && items.iter().zip(fields).all(|(d, f)| d.conforms(&f.ty))
			}
			(Data::Pointer(p), Shape::Pointer(elem)) => p.as_ref().is_none_or(|d| d.conforms(elem)),
			(Data::Func(_), Shape::Func(_)) | (Data::Chan(_), Shape::Chan { .. }) => true,
			(Data::Interface(_), Shape::Interface) => true,
			_ => false,
		}
	}
}

/// A typed dynamic value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
	ty: Type,
	data: Data,
}

impl Value {
	/// Pairs `data` with `ty`, checking that the payload fits the shape.
	pub fn new(ty: Type, data: Data) -> Result<Value, AccessError> {
		if !data.conforms(&ty) {
			return Err(AccessError::Shape { ty });
		}
		Ok(Value { ty, data })
	}

	pub(crate) fn from_raw(ty: Type, data: Data) -> Value {
		Value { ty, data }
	}

	pub fn zero(ty: &Type) -> Value {
		Value {
			ty: ty.clone(),
			data: Data::zero(ty),
		}
	}

	/// Platform-sized `int`.
	pub fn int(v: isize) -> Value {
		Value::from_raw(Type::int(), Data::Number(Number::int(v)))
	}

	/// Platform-sized `uint`.
	pub fn uint(v: usize) -> Value {
		Value::from_raw(Type::uint(), Data::Number(Number::uint(v)))
	}

	pub fn number(n: Number) -> Value {
		Value::from_raw(Type::number(n.kind()), Data::Number(n))
	}

	/// Boxes `inner` into an empty-interface value.
	pub fn interface(inner: Value) -> Value {
		Value::from_raw(Type::interface(), Data::Interface(Some(Box::new(inner))))
	}

	/// Builds a struct of type `ty` from its direct field values, in order.
	pub fn from_fields(ty: &Type, fields: Vec<Value>) -> Result<Value, AccessError> {
		expect_kind(ty, Kind::Struct, "struct")?;
		let decl = ty.fields();
		if decl.len() != fields.len() {
			return Err(AccessError::Shape { ty: ty.clone() });
		}
		let mut data = Vec::with_capacity(fields.len());
		for (field, value) in decl.iter().zip(fields) {
			data.push(value.into_data_of(&field.ty)?);
		}
		Ok(Value::from_raw(ty.clone(), Data::Struct(data)))
	}

	/// Builds an array or slice of type `ty` from its elements.
	pub fn from_elems(ty: &Type, elems: Vec<Value>) -> Result<Value, AccessError> {
		let elem = match (ty.shape(), ty.elem()) {
			(Shape::Array { .. } | Shape::Slice(_), Some(elem)) => elem,
			_ => {
				return Err(AccessError::Kind {
					expected: "array or slice",
					found: ty.clone(),
				});
			}
		};
		if ty.array_len().is_some_and(|len| len != elems.len()) {
			return Err(AccessError::Shape { ty: ty.clone() });
		}
		let items = elems
			.into_iter()
			.map(|v| v.into_data_of(elem))
			.collect::<Result<Vec<_>, _>>()?;
		let data = match ty.kind() {
			Kind::Array => Data::Array(items),
			_ => Data::Slice(items),
		};
		Ok(Value::from_raw(ty.clone(), data))
	}

	#[inline]
	pub fn ty(&self) -> &Type {
		&self.ty
	}

	#[inline]
	pub fn kind(&self) -> Kind {
		self.ty.kind()
	}

	#[inline]
	pub fn data(&self) -> &Data {
		&self.data
	}

	pub(crate) fn data_mut(&mut self) -> &mut Data {
		&mut self.data
	}

	pub fn into_parts(self) -> (Type, Data) {
		(self.ty, self.data)
	}

	/// Consumes the value, returning its payload if its type is exactly `ty`.
	pub(crate) fn into_data_of(self, ty: &Type) -> Result<Data, AccessError> {
		if self.ty != *ty {
			return Err(AccessError::Mismatch {
				expected: ty.clone(),
				found: self.ty,
			});
		}
		Ok(self.data)
	}

	/// Re-tags the payload with another type of the same layout.
	///
	/// Callers establish layout equivalence beforehand; the payload itself is
	/// reused unchanged.
	pub fn reinterpret(self, ty: &Type) -> Value {
		Value {
			ty: ty.clone(),
			data: self.data,
		}
	}

	/// Replaces this value with `other`, which must have the same type.
	pub fn assign(&mut self, other: Value) -> Result<(), AccessError> {
		self.data = other.into_data_of(&self.ty)?;
		Ok(())
	}

	pub fn set_bool(&mut self, v: bool) -> Result<(), AccessError> {
		match &mut self.data {
			Data::Bool(b) => {
				*b = v;
				Ok(())
			}
			_ => Err(self.kind_error("bool")),
		}
	}

	pub fn set_string(&mut self, v: impl Into<String>) -> Result<(), AccessError> {
		match &mut self.data {
			Data::String(s) => {
				*s = v.into();
				Ok(())
			}
			_ => Err(self.kind_error("string")),
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self.data {
			Data::Bool(b) => Some(b),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match &self.data {
			Data::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<Number> {
		match self.data {
			Data::Number(n) => Some(n),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		self.as_number()?.to_i64()
	}

	pub fn as_f64(&self) -> Option<f64> {
		self.as_number()?.to_f64()
	}

	/// Value held by a non-nil interface.
	pub fn as_interface(&self) -> Option<&Value> {
		match &self.data {
			Data::Interface(v) => v.as_deref(),
			_ => None,
		}
	}

	pub(crate) fn kind_error(&self, expected: &'static str) -> AccessError {
		AccessError::Kind {
			expected,
			found: self.ty.clone(),
		}
	}
}

pub(crate) fn expect_kind(ty: &Type, kind: Kind, expected: &'static str) -> Result<(), AccessError> {
	if ty.kind() == kind {
		Ok(())
	} else {
		Err(AccessError::Kind {
			expected,
			found: ty.clone(),
		})
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::from_raw(Type::bool(), Data::Bool(v))
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::from_raw(Type::string(), Data::String(v.to_owned()))
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::from_raw(Type::string(), Data::String(v))
	}
}

impl From<isize> for Value {
	fn from(v: isize) -> Self {
		Value::int(v)
	}
}

impl From<usize> for Value {
	fn from(v: usize) -> Self {
		Value::uint(v)
	}
}

macro_rules! value_from_number {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(v: $ty) -> Self {
					Value::number(Number::from(v))
				}
			}
		)*
	};
}

value_from_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, Complex<f32>, Complex<f64>);
