use std::borrow::{Borrow, BorrowMut};

use crate::error::AccessError;
use crate::kind::Kind;
use crate::ty::Type;
use crate::value::{Data, Value, expect_kind};

fn elem_type(value: &Value, kind: Kind, expected: &'static str) -> Result<Type, AccessError> {
	expect_kind(value.ty(), kind, expected)?;
	value.ty().elem().cloned().ok_or_else(|| value.kind_error(expected))
}

fn read(items: &[Data], elem: &Type, index: usize) -> Result<Value, AccessError> {
	items
		.get(index)
		.map(|d| Value::from_raw(elem.clone(), d.clone()))
		.ok_or(AccessError::OutOfRange {
			index,
			len: items.len(),
		})
}

fn write(items: &mut [Data], elem: &Type, index: usize, v: Value) -> Result<(), AccessError> {
	let len = items.len();
	let slot = items.get_mut(index).ok_or(AccessError::OutOfRange { index, len })?;
	*slot = v.into_data_of(elem)?;
	Ok(())
}

/// Fixed-length array handle.
pub struct Array<V> {
	value: V,
	elem: Type,
}

impl<V: Borrow<Value>> Array<V> {
	pub fn new(value: V) -> Result<Self, AccessError> {
		let elem = elem_type(value.borrow(), Kind::Array, "array")?;
		Ok(Self { value, elem })
	}

	pub fn value(&self) -> &Value {
		self.value.borrow()
	}

	pub fn into_inner(self) -> V {
		self.value
	}

	pub fn elem_type(&self) -> &Type {
		&self.elem
	}

	fn items(&self) -> &[Data] {
		match self.value().data() {
			Data::Array(items) => items,
			_ => &[],
		}
	}

	pub fn len(&self) -> usize {
		self.items().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items().is_empty()
	}

	pub fn get(&self, index: usize) -> Result<Value, AccessError> {
		read(self.items(), &self.elem, index)
	}

	pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
		self.items().iter().map(|d| Value::from_raw(self.elem.clone(), d.clone()))
	}

	/// Zero value of the element type.
	pub fn new_elem(&self) -> Value {
		Value::zero(&self.elem)
	}
}

impl<V: BorrowMut<Value>> Array<V> {
	pub fn set(&mut self, index: usize, v: Value) -> Result<(), AccessError> {
		let value = self.value.borrow_mut();
		let ty = value.ty().clone();
		match value.data_mut() {
			Data::Array(items) => write(items, &self.elem, index, v),
			_ => Err(AccessError::Shape { ty }),
		}
	}
}

impl Array<Value> {
	pub fn into_elems(self) -> Vec<Value> {
		let elem = self.elem;
		match self.value.into_parts().1 {
			Data::Array(items) => items.into_iter().map(|d| Value::from_raw(elem.clone(), d)).collect(),
			_ => Vec::new(),
		}
	}
}

/// Growable sequence handle.
pub struct Slice<V> {
	value: V,
	elem: Type,
}

impl<V: Borrow<Value>> Slice<V> {
	pub fn new(value: V) -> Result<Self, AccessError> {
		let elem = elem_type(value.borrow(), Kind::Slice, "slice")?;
		Ok(Self { value, elem })
	}

	pub fn value(&self) -> &Value {
		self.value.borrow()
	}

	pub fn into_inner(self) -> V {
		self.value
	}

	pub fn elem_type(&self) -> &Type {
		&self.elem
	}

	fn items(&self) -> &[Data] {
		match self.value().data() {
			Data::Slice(items) => items,
			_ => &[],
		}
	}

	pub fn len(&self) -> usize {
		self.items().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items().is_empty()
	}

	pub fn get(&self, index: usize) -> Result<Value, AccessError> {
		read(self.items(), &self.elem, index)
	}

	pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
		self.items().iter().map(|d| Value::from_raw(self.elem.clone(), d.clone()))
	}

	pub fn new_elem(&self) -> Value {
		Value::zero(&self.elem)
	}
}

impl<V: BorrowMut<Value>> Slice<V> {
	fn items_mut(&mut self) -> Result<&mut Vec<Data>, AccessError> {
		let value = self.value.borrow_mut();
		let ty = value.ty().clone();
		match value.data_mut() {
			Data::Slice(items) => Ok(items),
			_ => Err(AccessError::Shape { ty }),
		}
	}

	pub fn set(&mut self, index: usize, v: Value) -> Result<(), AccessError> {
		let elem = self.elem.clone();
		write(self.items_mut()?, &elem, index, v)
	}

	pub fn append(&mut self, v: Value) -> Result<(), AccessError> {
		let data = v.into_data_of(&self.elem)?;
		self.items_mut()?.push(data);
		Ok(())
	}

	/// Truncates, or extends with zero elements, to exactly `len` elements.
	pub fn set_len(&mut self, len: usize) -> Result<(), AccessError> {
		let zero = Data::zero(&self.elem);
		self.items_mut()?.resize(len, zero);
		Ok(())
	}

	pub fn clear(&mut self) -> Result<(), AccessError> {
		self.items_mut()?.clear();
		Ok(())
	}
}

impl Slice<Value> {
	pub fn into_elems(self) -> Vec<Value> {
		let elem = self.elem;
		match self.value.into_parts().1 {
			Data::Slice(items) => items.into_iter().map(|d| Value::from_raw(elem.clone(), d)).collect(),
			_ => Vec::new(),
		}
	}
}
