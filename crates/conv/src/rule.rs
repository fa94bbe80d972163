//! Conversion rules as handed to an engine.
//!
//! A [`Rule`] pairs a destination and a source [`Operand`] with the closure
//! that performs the conversion. Concrete-type rules take the raw values;
//! family rules take a kind-specific [`access`](recast_types::access) handle
//! on the counter side: an owned one over the source for Scheme rules
//! (`from_*`), a borrowed one over the destination for Inverse rules
//! (`into_*`).

use std::fmt;
use std::sync::Arc;

use recast_types::access::{Array, Map, Number, Pointer, Slice, Struct};
use recast_types::{Family, FieldPolicy, Type, Value};

use crate::error::Result;

/// Type-erased conversion: writes the destination from the source.
pub type RuleFn = Arc<dyn Fn(&mut Value, Value) -> Result<()> + Send + Sync>;

type MakeRule = Box<dyn FnOnce(FieldPolicy) -> RuleFn + Send>;

/// One side of a rule: a concrete type or a whole family of types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
	Type(Type),
	Family(Family),
}

impl Operand {
	pub fn as_type(&self) -> Option<&Type> {
		match self {
			Operand::Type(ty) => Some(ty),
			Operand::Family(_) => None,
		}
	}
}

impl fmt::Display for Operand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Operand::Type(ty) => write!(f, "{ty}"),
			Operand::Family(family) => write!(f, "any {family}"),
		}
	}
}

/// A conversion rule awaiting registration.
pub struct Rule {
	dst: Operand,
	src: Operand,
	policy: Option<FieldPolicy>,
	make: MakeRule,
}

impl Rule {
	/// Rule between two concrete types.
	pub fn new(dst: Type, src: Type, f: impl Fn(&mut Value, Value) -> Result<()> + Send + Sync + 'static) -> Self {
		let f: RuleFn = Arc::new(f);
		Self {
			dst: Operand::Type(dst),
			src: Operand::Type(src),
			policy: None,
			make: Box::new(move |_: FieldPolicy| f),
		}
	}

	/// Scheme rule for every struct source, enumerated under the rule's
	/// [`FieldPolicy`] (the engine's default unless [`Rule::with_policy`] is
	/// used).
	pub fn from_struct(dst: Type, f: impl Fn(&mut Value, Struct<Value>) -> Result<()> + Send + Sync + 'static) -> Self {
		Self {
			dst: Operand::Type(dst),
			src: Operand::Family(Family::Struct),
			policy: None,
			make: Box::new(move |policy: FieldPolicy| -> RuleFn {
				Arc::new(move |dst: &mut Value, src: Value| f(dst, Struct::with_policy(src, policy)?))
			}),
		}
	}

	/// Inverse rule for every struct destination.
	pub fn into_struct(
		src: Type,
		f: impl Fn(Struct<&mut Value>, Value) -> Result<()> + Send + Sync + 'static,
	) -> Self {
		Self {
			dst: Operand::Family(Family::Struct),
			src: Operand::Type(src),
			policy: None,
			make: Box::new(move |policy: FieldPolicy| -> RuleFn {
				Arc::new(move |dst: &mut Value, src: Value| f(Struct::with_policy(dst, policy)?, src))
			}),
		}
	}

	/// Overrides the engine's default struct field policy for this rule.
	pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
		self.policy = Some(policy);
		self
	}

	pub fn dst(&self) -> &Operand {
		&self.dst
	}

	pub fn src(&self) -> &Operand {
		&self.src
	}

	pub fn policy(&self) -> Option<FieldPolicy> {
		self.policy
	}

	pub(crate) fn into_fn(self, default: FieldPolicy) -> RuleFn {
		(self.make)(self.policy.unwrap_or(default))
	}
}

macro_rules! family_rules {
	($($family:ident => $handle:ident, $from:ident, $into:ident;)*) => {
		impl Rule {
			$(
				#[doc = concat!("Scheme rule for every ", stringify!($family), " source.")]
				pub fn $from(dst: Type, f: impl Fn(&mut Value, $handle<Value>) -> Result<()> + Send + Sync + 'static) -> Self {
					Self {
						dst: Operand::Type(dst),
						src: Operand::Family(Family::$family),
						policy: None,
						make: Box::new(move |_: FieldPolicy| -> RuleFn {
							Arc::new(move |dst: &mut Value, src: Value| f(dst, $handle::new(src)?))
						}),
					}
				}

				#[doc = concat!("Inverse rule for every ", stringify!($family), " destination.")]
				pub fn $into(src: Type, f: impl Fn($handle<&mut Value>, Value) -> Result<()> + Send + Sync + 'static) -> Self {
					Self {
						dst: Operand::Family(Family::$family),
						src: Operand::Type(src),
						policy: None,
						make: Box::new(move |_: FieldPolicy| -> RuleFn {
							Arc::new(move |dst: &mut Value, src: Value| f($handle::new(dst)?, src))
						}),
					}
				}
			)*
		}
	};
}

family_rules! {
	Array => Array, from_array, into_array;
	Slice => Slice, from_slice, into_slice;
	Map => Map, from_map, into_map;
	Number => Number, from_number, into_number;
	Pointer => Pointer, from_pointer, into_pointer;
}

impl fmt::Debug for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Rule")
			.field("dst", &self.dst)
			.field("src", &self.src)
			.field("policy", &self.policy)
			.finish_non_exhaustive()
	}
}
