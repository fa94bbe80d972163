use std::borrow::{Borrow, BorrowMut};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::FieldPolicy;
use crate::error::AccessError;
use crate::kind::Kind;
use crate::ty::Type;
use crate::value::{Data, Value, expect_kind};

/// A field reachable from a struct, possibly through embedded structs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
	pub name: Arc<str>,
	/// Direct field indices from the outer struct down to this field.
	pub index: Vec<usize>,
	pub ty: Type,
	pub tag: Arc<str>,
	pub exported: bool,
}

struct Candidate {
	entry: FieldEntry,
	depth: usize,
	promotes: bool,
}

/// Depth-first walk over every field, descending into embedded structs.
/// Embedded pointers are not followed.
fn collect(ty: &Type, path: &mut Vec<usize>, out: &mut Vec<Candidate>) {
	for (i, field) in ty.fields().iter().enumerate() {
		path.push(i);
		let promotes = field.embedded && field.ty.kind() == Kind::Struct;
		out.push(Candidate {
			entry: FieldEntry {
				name: field.name.clone(),
				index: path.clone(),
				ty: field.ty.clone(),
				tag: field.tag.clone(),
				exported: field.exported(),
			},
			depth: path.len(),
			promotes,
		});
		if promotes {
			collect(&field.ty, path, out);
		}
		path.pop();
	}
}

fn visible(ty: &Type) -> (Vec<FieldEntry>, Vec<Candidate>) {
	let mut all = Vec::new();
	collect(ty, &mut Vec::new(), &mut all);

	let entries = {
		// Shallowest depth per name, and how many fields share it.
		let mut best: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
		for c in &all {
			let slot = best.entry(&*c.entry.name).or_insert((c.depth, 0));
			if c.depth < slot.0 {
				*slot = (c.depth, 1);
			} else if c.depth == slot.0 {
				slot.1 += 1;
			}
		}
		all.iter()
			.filter(|c| c.entry.exported && !c.promotes)
			.filter(|c| best.get(&*c.entry.name) == Some(&(c.depth, 1)))
			.map(|c| c.entry.clone())
			.collect()
	};
	(entries, all)
}

fn direct(ty: &Type) -> Vec<FieldEntry> {
	ty.fields()
		.iter()
		.enumerate()
		.map(|(i, field)| FieldEntry {
			name: field.name.clone(),
			index: vec![i],
			ty: field.ty.clone(),
			tag: field.tag.clone(),
			exported: field.exported(),
		})
		.collect()
}

fn locate<'d>(data: &'d Data, ty: &Type, entry: &FieldEntry) -> Result<&'d Data, AccessError> {
	let mut data = data;
	let mut ty = ty.clone();
	for &i in &entry.index {
		let (Data::Struct(items), Some(field)) = (data, ty.fields().get(i)) else {
			return Err(AccessError::Shape { ty });
		};
		let Some(item) = items.get(i) else {
			return Err(AccessError::Shape { ty });
		};
		data = item;
		ty = field.ty.clone();
	}
	if ty != entry.ty {
		return Err(AccessError::Mismatch {
			expected: entry.ty.clone(),
			found: ty,
		});
	}
	Ok(data)
}

fn locate_mut<'d>(data: &'d mut Data, ty: &Type, entry: &FieldEntry) -> Result<&'d mut Data, AccessError> {
	let mut data = data;
	let mut ty = ty.clone();
	for &i in &entry.index {
		let (Data::Struct(items), Some(field)) = (data, ty.fields().get(i)) else {
			return Err(AccessError::Shape { ty });
		};
		let next = field.ty.clone();
		let Some(item) = items.get_mut(i) else {
			return Err(AccessError::Shape { ty });
		};
		data = item;
		ty = next;
	}
	if ty != entry.ty {
		return Err(AccessError::Mismatch {
			expected: entry.ty.clone(),
			found: ty,
		});
	}
	Ok(data)
}

/// Struct handle.
pub struct Struct<V> {
	value: V,
	policy: FieldPolicy,
}

impl<V: Borrow<Value>> Struct<V> {
	pub fn new(value: V) -> Result<Self, AccessError> {
		Self::with_policy(value, FieldPolicy::default())
	}

	pub fn with_policy(value: V, policy: FieldPolicy) -> Result<Self, AccessError> {
		expect_kind(value.borrow().ty(), Kind::Struct, "struct")?;
		Ok(Self { value, policy })
	}

	pub fn value(&self) -> &Value {
		self.value.borrow()
	}

	pub fn into_inner(self) -> V {
		self.value
	}

	pub fn ty(&self) -> &Type {
		self.value().ty()
	}

	pub fn policy(&self) -> FieldPolicy {
		self.policy
	}

	/// Fields enumerated under this handle's policy, in declaration order.
	pub fn fields(&self) -> Vec<FieldEntry> {
		match self.policy {
			FieldPolicy::Visible => visible(self.ty()).0,
			FieldPolicy::All => direct(self.ty()),
		}
	}

	pub fn iter(&self) -> StructIter<'_> {
		StructIter {
			value: self.value(),
			entries: self.fields().into_iter(),
		}
	}

	/// Finds `name` among the fields this handle enumerates.
	pub fn lookup(&self, name: &str) -> Result<FieldEntry, AccessError> {
		let ty = self.ty();
		let known = match self.policy {
			FieldPolicy::Visible => {
				let (entries, all) = visible(ty);
				if let Some(entry) = entries.into_iter().find(|e| &*e.name == name) {
					return Ok(entry);
				}
				all.iter().any(|c| &*c.entry.name == name)
			}
			FieldPolicy::All => {
				if let Some(entry) = direct(ty).into_iter().find(|e| &*e.name == name) {
					return Ok(entry);
				}
				false
			}
		};
		let name = name.to_owned();
		let ty = ty.clone();
		Err(if known {
			AccessError::Hidden { name, ty }
		} else {
			AccessError::NoField { name, ty }
		})
	}

	pub fn get(&self, entry: &FieldEntry) -> Result<Value, AccessError> {
		let data = locate(self.value().data(), self.ty(), entry)?;
		Ok(Value::from_raw(entry.ty.clone(), data.clone()))
	}

	pub fn field(&self, name: &str) -> Result<Value, AccessError> {
		self.get(&self.lookup(name)?)
	}

	/// Zero value of the field's type.
	pub fn new_field(&self, entry: &FieldEntry) -> Value {
		Value::zero(&entry.ty)
	}
}

impl<V: BorrowMut<Value>> Struct<V> {
	pub fn set(&mut self, entry: &FieldEntry, v: Value) -> Result<(), AccessError> {
		let data = v.into_data_of(&entry.ty)?;
		let value = self.value.borrow_mut();
		let ty = value.ty().clone();
		*locate_mut(value.data_mut(), &ty, entry)? = data;
		Ok(())
	}

	pub fn set_field(&mut self, name: &str, v: Value) -> Result<(), AccessError> {
		let entry = self.lookup(name)?;
		self.set(&entry, v)
	}
}

impl Struct<Value> {
	/// Direct field values, in declaration order.
	pub fn into_fields(self) -> Vec<Value> {
		let (ty, data) = self.value.into_parts();
		match data {
			Data::Struct(items) => ty
				.fields()
				.iter()
				.zip(items)
				.map(|(f, d)| Value::from_raw(f.ty.clone(), d))
				.collect(),
			_ => Vec::new(),
		}
	}
}

/// Iterator over `(field, value)` pairs of a [`Struct`].
pub struct StructIter<'a> {
	value: &'a Value,
	entries: std::vec::IntoIter<FieldEntry>,
}

impl Iterator for StructIter<'_> {
	type Item = (FieldEntry, Value);

	fn next(&mut self) -> Option<Self::Item> {
		for entry in self.entries.by_ref() {
			if let Ok(data) = locate(self.value.data(), self.value.ty(), &entry) {
				let value = Value::from_raw(entry.ty.clone(), data.clone());
				return Some((entry, value));
			}
		}
		None
	}
}
