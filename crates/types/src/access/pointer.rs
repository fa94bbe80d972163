use std::borrow::{Borrow, BorrowMut};

use crate::error::AccessError;
use crate::kind::Kind;
use crate::ty::Type;
use crate::value::{Data, Value, expect_kind};

/// Pointer handle. The pointee is owned by the pointer value.
pub struct Pointer<V> {
	value: V,
	elem: Type,
}

impl<V: Borrow<Value>> Pointer<V> {
	pub fn new(value: V) -> Result<Self, AccessError> {
		let ty = value.borrow().ty();
		expect_kind(ty, Kind::Pointer, "pointer")?;
		let elem = ty.elem().cloned().ok_or_else(|| value.borrow().kind_error("pointer"))?;
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

	fn target(&self) -> Option<&Data> {
		match self.value().data() {
			Data::Pointer(target) => target.as_deref(),
			_ => None,
		}
	}

	pub fn is_nil(&self) -> bool {
		self.target().is_none()
	}

	/// Copy of the pointee.
	pub fn elem(&self) -> Result<Value, AccessError> {
		self.target()
			.map(|d| Value::from_raw(self.elem.clone(), d.clone()))
			.ok_or(AccessError::Nil)
	}

	/// Zero value of the pointee type.
	pub fn new_elem(&self) -> Value {
		Value::zero(&self.elem)
	}
}

impl<V: BorrowMut<Value>> Pointer<V> {
	/// Points at `v`, allocating if the pointer is nil.
	pub fn set_elem(&mut self, v: Value) -> Result<(), AccessError> {
		let data = v.into_data_of(&self.elem)?;
		*self.value.borrow_mut().data_mut() = Data::Pointer(Some(Box::new(data)));
		Ok(())
	}

	pub fn set_nil(&mut self) {
		*self.value.borrow_mut().data_mut() = Data::Pointer(None);
	}
}

impl Pointer<Value> {
	/// The pointee, or `None` for a nil pointer.
	pub fn into_elem(self) -> Option<Value> {
		let elem = self.elem;
		match self.value.into_parts().1 {
			Data::Pointer(Some(target)) => Some(Value::from_raw(elem, *target)),
			_ => None,
		}
	}
}
