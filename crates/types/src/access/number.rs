use std::borrow::{Borrow, BorrowMut};

use recast_numeric::{Numeric, convert};

use crate::error::AccessError;
use crate::value::{Data, Value};

/// Handle over any numeric value.
pub struct Number<V> {
	value: V,
	kind: Numeric,
}

impl<V: Borrow<Value>> Number<V> {
	pub fn new(value: V) -> Result<Self, AccessError> {
		let kind = value.borrow().ty().numeric().ok_or_else(|| value.borrow().kind_error("numeric"))?;
		Ok(Self { value, kind })
	}

	pub fn value(&self) -> &Value {
		self.value.borrow()
	}

	pub fn into_inner(self) -> V {
		self.value
	}

	/// Fixed-width kind of the value; `int` and `uint` report their alias.
	pub fn kind(&self) -> Numeric {
		self.kind
	}

	/// Storage size in bytes.
	pub fn size(&self) -> usize {
		self.kind.size()
	}

	pub fn get(&self) -> recast_numeric::Number {
		match self.value().data() {
			Data::Number(n) => *n,
			_ => recast_numeric::Number::zero(self.kind),
		}
	}
}

impl<V: BorrowMut<Value>> Number<V> {
	/// Stores `n`, converting it losslessly into this value's kind.
	pub fn set(&mut self, n: impl Into<recast_numeric::Number>) -> Result<(), AccessError> {
		let n = convert(self.kind, n.into())?;
		*self.value.borrow_mut().data_mut() = Data::Number(n);
		Ok(())
	}
}
