use std::sync::Arc;

use recast_types::{Type, Value};

use super::Library;
use crate::error::{Error, Result};

type Builder<T> = Box<dyn Fn(&Type) -> Option<T> + Send + Sync>;

/// Ordered list of builders; the first one that recognizes a type wins.
pub struct Chain<T> {
	builders: Vec<Builder<T>>,
}

impl<T> Default for Chain<T> {
	fn default() -> Self {
		Self { builders: Vec::new() }
	}
}

impl<T> Chain<T> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn use_builder(mut self, builder: impl Fn(&Type) -> Option<T> + Send + Sync + 'static) -> Self {
		self.builders.push(Box::new(builder));
		self
	}

	pub fn build(&self, ty: &Type) -> Option<T> {
		self.builders.iter().find_map(|b| b(ty))
	}

	pub fn len(&self) -> usize {
		self.builders.len()
	}

	pub fn is_empty(&self) -> bool {
		self.builders.is_empty()
	}
}

/// Reads a value of some type into a `T`.
pub type Converter<T> = Arc<dyn Fn(&Value) -> Result<T> + Send + Sync>;

/// Builds a `T`-typed value of some destination type.
pub type Inverter<T> = Arc<dyn Fn(T) -> Result<Value> + Send + Sync>;

/// Converters memoized per source type.
pub struct Converters<T> {
	library: Library<Option<Converter<T>>>,
}

impl<T: 'static> Converters<T> {
	pub fn new(chain: Chain<Converter<T>>) -> Self {
		Self {
			library: Library::new(move |ty| chain.build(ty).map(Some), None),
		}
	}

	/// Converts `value` with the converter chosen for its type.
	pub fn call(&self, value: &Value) -> Result<T> {
		match self.library.get(value.ty()) {
			Some(convert) => convert(value),
			None => Err(Error::Unsupported {
				ty: value.ty().clone(),
			}),
		}
	}
}

/// Inverters memoized per destination type.
pub struct Inverters<T> {
	library: Library<Option<Inverter<T>>>,
}

impl<T: 'static> Inverters<T> {
	pub fn new(chain: Chain<Inverter<T>>) -> Self {
		Self {
			library: Library::new(move |ty| chain.build(ty).map(Some), None),
		}
	}

	/// Builds a value of type `ty` from `input`.
	pub fn call(&self, ty: &Type, input: T) -> Result<Value> {
		match self.library.get(ty) {
			Some(invert) => invert(input),
			None => Err(Error::Unsupported { ty: ty.clone() }),
		}
	}
}
