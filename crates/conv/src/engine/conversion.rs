use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, Weak};

use recast_types::{Data, Kind, Type, Value};

use super::resolve::Dispatch;
use super::{Direction, FromFixed, IntoFixed};
use crate::error::{Error, Result};

/// Built conversion. Cheap to clone and safe to share across threads.
pub struct Conversion<D> {
	dispatch: Arc<Dispatch>,
	_direction: PhantomData<D>,
}

impl<D> Clone for Conversion<D> {
	fn clone(&self) -> Self {
		Self {
			dispatch: Arc::clone(&self.dispatch),
			_direction: PhantomData,
		}
	}
}

impl<D: Direction> Conversion<D> {
	pub(super) fn new(dispatch: Arc<Dispatch>) -> Self {
		Self {
			dispatch,
			_direction: PhantomData,
		}
	}

	pub fn fixed(&self) -> &Type {
		&self.dispatch.fixed
	}

	/// Whether a rule has been resolved and cached for `counter`.
	pub fn is_resolved(&self, counter: &Type) -> bool {
		self.dispatch.is_resolved(counter)
	}

	/// Number of counter types resolved so far.
	pub fn resolved_len(&self) -> usize {
		self.dispatch.resolved_len()
	}

	fn run(&self, counter: &Type, dst: &mut Value, src: Value) -> Result<()> {
		let expected = dst.ty().clone();
		let rule = self.dispatch.rule(counter);
		rule(dst, src)?;
		if *dst.ty() != expected {
			return Err(Error::Mismatch {
				expected,
				found: dst.ty().clone(),
			});
		}
		Ok(())
	}

	fn mismatch(&self, found: &Type) -> Error {
		Error::Mismatch {
			expected: self.fixed().clone(),
			found: found.clone(),
		}
	}
}

impl Conversion<IntoFixed> {
	/// Converts `src` into a new value of the fixed type.
	pub fn convert(&self, src: Value) -> Result<Value> {
		let mut dst = Value::zero(self.fixed());
		self.convert_into(&mut dst, src)?;
		Ok(dst)
	}

	/// Converts `src` into `dst`, which must be of the fixed type.
	pub fn convert_into(&self, dst: &mut Value, src: Value) -> Result<()> {
		if dst.ty() != self.fixed() {
			return Err(self.mismatch(dst.ty()));
		}
		let src = unbox(src, self.fixed())?;
		let counter = src.ty().clone();
		self.run(&counter, dst, src)
	}
}

/// Dispatch goes by the dynamic type of a source, so interface boxes are
/// opened first, however deeply nested. A nil box has nothing to convert.
fn unbox(mut src: Value, fixed: &Type) -> Result<Value> {
	while src.kind() == Kind::Interface {
		src = match src.into_parts() {
			(_, Data::Interface(Some(inner))) => *inner,
			(ty, _) => {
				return Err(Error::Invalid {
					src: ty,
					dst: fixed.clone(),
				});
			}
		};
	}
	Ok(src)
}

impl Conversion<FromFixed> {
	/// Converts `src`, of the fixed type, into a new value of type `ty`.
	pub fn convert(&self, ty: &Type, src: Value) -> Result<Value> {
		let mut dst = Value::zero(ty);
		self.convert_into(&mut dst, src)?;
		Ok(dst)
	}

	pub fn convert_into(&self, dst: &mut Value, src: Value) -> Result<()> {
		if src.ty() != self.fixed() {
			return Err(self.mismatch(src.ty()));
		}
		let counter = dst.ty().clone();
		self.run(&counter, dst, src)
	}
}

impl<D: Direction> fmt::Debug for Conversion<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Conversion")
			.field("direction", &D::LABEL)
			.field("fixed", self.fixed())
			.field("resolved", &self.resolved_len())
			.finish()
	}
}

/// Late-bound reference to the conversion an engine is about to build.
///
/// Rules capture it before `build` and call through it at conversion time to
/// handle nested values. The handle holds no strong reference, so capturing it
/// in a rule does not keep the conversion alive.
pub struct Recursion<D> {
	slot: Arc<OnceLock<Weak<Dispatch>>>,
	_direction: PhantomData<D>,
}

impl<D> Clone for Recursion<D> {
	fn clone(&self) -> Self {
		Self {
			slot: Arc::clone(&self.slot),
			_direction: PhantomData,
		}
	}
}

impl<D: Direction> Recursion<D> {
	pub(super) fn new(slot: Arc<OnceLock<Weak<Dispatch>>>) -> Self {
		Self {
			slot,
			_direction: PhantomData,
		}
	}

	/// The built conversion; [`Error::Unbuilt`] before `build` or after every
	/// handle to the conversion was dropped.
	pub fn conversion(&self) -> Result<Conversion<D>> {
		let dispatch = self.slot.get().and_then(Weak::upgrade).ok_or(Error::Unbuilt)?;
		Ok(Conversion::new(dispatch))
	}
}

impl Recursion<IntoFixed> {
	pub fn convert(&self, src: Value) -> Result<Value> {
		self.conversion()?.convert(src)
	}

	pub fn convert_into(&self, dst: &mut Value, src: Value) -> Result<()> {
		self.conversion()?.convert_into(dst, src)
	}
}

impl Recursion<FromFixed> {
	pub fn convert(&self, ty: &Type, src: Value) -> Result<Value> {
		self.conversion()?.convert(ty, src)
	}

	pub fn convert_into(&self, dst: &mut Value, src: Value) -> Result<()> {
		self.conversion()?.convert_into(dst, src)
	}
}

impl<D: Direction> fmt::Debug for Recursion<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Recursion")
			.field("direction", &D::LABEL)
			.field("built", &self.conversion().is_ok())
			.finish()
	}
}
