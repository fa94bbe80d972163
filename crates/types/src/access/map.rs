use std::borrow::{Borrow, BorrowMut};
use std::slice;

use crate::error::AccessError;
use crate::kind::Kind;
use crate::ty::Type;
use crate::value::{Data, Value, expect_kind};

/// Map handle. Entries keep insertion order.
pub struct Map<V> {
	value: V,
	key: Type,
	elem: Type,
}

impl<V: Borrow<Value>> Map<V> {
	pub fn new(value: V) -> Result<Self, AccessError> {
		let ty = value.borrow().ty();
		expect_kind(ty, Kind::Map, "map")?;
		let (Some(key), Some(elem)) = (ty.key().cloned(), ty.elem().cloned()) else {
			return Err(value.borrow().kind_error("map"));
		};
		Ok(Self { value, key, elem })
	}

	pub fn value(&self) -> &Value {
		self.value.borrow()
	}

	pub fn into_inner(self) -> V {
		self.value
	}

	pub fn key_type(&self) -> &Type {
		&self.key
	}

	pub fn elem_type(&self) -> &Type {
		&self.elem
	}

	fn entries(&self) -> &[(Data, Data)] {
		match self.value().data() {
			Data::Map(entries) => entries,
			_ => &[],
		}
	}

	pub fn len(&self) -> usize {
		self.entries().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries().is_empty()
	}

	fn check_key<'k>(&self, key: &'k Value) -> Result<&'k Data, AccessError> {
		if *key.ty() != self.key {
			return Err(AccessError::Mismatch {
				expected: self.key.clone(),
				found: key.ty().clone(),
			});
		}
		Ok(key.data())
	}

	pub fn get(&self, key: &Value) -> Result<Option<Value>, AccessError> {
		let key = self.check_key(key)?;
		Ok(self
			.entries()
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| Value::from_raw(self.elem.clone(), v.clone())))
	}

	pub fn contains_key(&self, key: &Value) -> Result<bool, AccessError> {
		let key = self.check_key(key)?;
		Ok(self.entries().iter().any(|(k, _)| k == key))
	}

	pub fn iter(&self) -> MapIter<'_> {
		MapIter {
			entries: self.entries().iter(),
			key: &self.key,
			elem: &self.elem,
		}
	}

	pub fn new_key(&self) -> Value {
		Value::zero(&self.key)
	}

	pub fn new_value(&self) -> Value {
		Value::zero(&self.elem)
	}
}

impl<V: BorrowMut<Value>> Map<V> {
	fn entries_mut(&mut self) -> Result<&mut Vec<(Data, Data)>, AccessError> {
		let value = self.value.borrow_mut();
		let ty = value.ty().clone();
		match value.data_mut() {
			Data::Map(entries) => Ok(entries),
			_ => Err(AccessError::Shape { ty }),
		}
	}

	/// Inserts or replaces the entry for `key`, returning the previous value.
	pub fn insert(&mut self, key: Value, v: Value) -> Result<Option<Value>, AccessError> {
		let key = key.into_data_of(&self.key)?;
		let v = v.into_data_of(&self.elem)?;
		let elem = self.elem.clone();
		let entries = self.entries_mut()?;
		match entries.iter_mut().find(|(k, _)| *k == key) {
			Some((_, slot)) => Ok(Some(Value::from_raw(elem, std::mem::replace(slot, v)))),
			None => {
				entries.push((key, v));
				Ok(None)
			}
		}
	}

	pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, AccessError> {
		let key = self.check_key(key)?.clone();
		let elem = self.elem.clone();
		let entries = self.entries_mut()?;
		let Some(index) = entries.iter().position(|(k, _)| *k == key) else {
			return Ok(None);
		};
		Ok(Some(Value::from_raw(elem, entries.remove(index).1)))
	}

	pub fn clear(&mut self) -> Result<(), AccessError> {
		self.entries_mut()?.clear();
		Ok(())
	}
}

impl Map<Value> {
	pub fn into_entries(self) -> Vec<(Value, Value)> {
		let Map { value, key, elem } = self;
		match value.into_parts().1 {
			Data::Map(entries) => entries
				.into_iter()
				.map(|(k, v)| (Value::from_raw(key.clone(), k), Value::from_raw(elem.clone(), v)))
				.collect(),
			_ => Vec::new(),
		}
	}
}

/// Iterator over `(key, value)` pairs of a [`Map`].
pub struct MapIter<'a> {
	entries: slice::Iter<'a, (Data, Data)>,
	key: &'a Type,
	elem: &'a Type,
}

impl Iterator for MapIter<'_> {
	type Item = (Value, Value);

	fn next(&mut self) -> Option<Self::Item> {
		let (k, v) = self.entries.next()?;
		Some((
			Value::from_raw(self.key.clone(), k.clone()),
			Value::from_raw(self.elem.clone(), v.clone()),
		))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.entries.size_hint()
	}
}

impl ExactSizeIterator for MapIter<'_> {}
