//! Rule registration and dispatch.
//!
//! An [`Engine`] holds one side of every rule fixed and collects rules keyed by
//! the other side, the counter type. [`Engine::build`] freezes the registries
//! into a [`Conversion`], which resolves each counter type once, in this order:
//!
//! 1. `specific`: the exact counter type.
//! 2. `generic`: the counter type's [`Family`].
//! 3. `basic`: any unnamed type with the same [`Base`] layout.
//! 4. numeric substitution: the registered numeric kind that holds the counter
//!    kind losslessly with the lowest [`rate`](recast_numeric::rate).
//!
//! Types that match nothing resolve to a rule that fails with
//! [`Error::Invalid`]. Every outcome is cached per counter type.

use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;
use recast_numeric::Numeric;
use recast_types::{Family, Type, Value};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::base::{Base, BaseHash, is_basic};
use crate::config::Config;
use crate::error::{Error, Result, Side};
use crate::rule::{Operand, Rule, RuleFn};

mod conversion;
mod direction;
mod resolve;

pub use conversion::{Conversion, Recursion};
pub use direction::{Direction, FromFixed, IntoFixed};
use resolve::{Dispatch, Resolver, Slot};

/// Converts values of any registered source type into one destination type.
pub type Scheme = Engine<IntoFixed>;

/// Converts values of one source type into any registered destination type.
pub type Inverse = Engine<FromFixed>;

struct Basic {
	ty: Type,
	rule: RuleFn,
}

/// Rule registries for one fixed type, open for registration until built.
pub struct Engine<D> {
	fixed: Type,
	config: Config,
	specific: FxHashMap<Type, RuleFn>,
	generic: FxHashMap<Family, RuleFn>,
	basic: FxHashMap<BaseHash, Basic>,
	numeric: FxHashMap<Numeric, RuleFn>,
	hook: Arc<OnceLock<Weak<Dispatch>>>,
	_direction: PhantomData<D>,
}

impl<D: Direction> Engine<D> {
	pub fn new(fixed: Type) -> Self {
		Self::with_config(fixed, Config::default())
	}

	pub fn with_config(fixed: Type, config: Config) -> Self {
		Self {
			fixed,
			config,
			specific: FxHashMap::default(),
			generic: FxHashMap::default(),
			basic: FxHashMap::default(),
			numeric: FxHashMap::default(),
			hook: Arc::new(OnceLock::new()),
			_direction: PhantomData,
		}
	}

	pub fn fixed(&self) -> &Type {
		&self.fixed
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Registers `rule`, replacing any earlier rule for the same key.
	///
	/// The rule's fixed side must be exactly this engine's fixed type.
	pub fn load(&mut self, rule: Rule) -> Result<&mut Self> {
		let (fixed, counter) = match D::FIXED {
			Side::Destination => (rule.dst(), rule.src()),
			Side::Source => (rule.src(), rule.dst()),
		};
		if fixed.as_type() != Some(&self.fixed) {
			return Err(Error::Signature {
				side: D::FIXED,
				expected: self.fixed.to_string(),
				found: fixed.to_string(),
			});
		}
		let counter = counter.clone();
		let f = rule.into_fn(self.config.field_policy);
		match counter {
			Operand::Family(family) => {
				if self.generic.insert(family, f).is_some() {
					warn!(direction = D::LABEL, %family, "generic rule replaced");
				}
			}
			Operand::Type(ty) if is_basic(&ty) => self.load_basic(ty, f)?,
			Operand::Type(ty) => {
				if self.specific.contains_key(&ty) {
					warn!(direction = D::LABEL, counter = %ty, "specific rule replaced");
				}
				self.specific.insert(ty, f);
			}
		}
		Ok(self)
	}

	/// Registers a rule for an unnamed type under its own type, under its
	/// layout and, for numbers, under its numeric kind. A previous rule for a
	/// different type of the same layout (`int` and its fixed-width alias) is
	/// dropped entirely.
	fn load_basic(&mut self, ty: Type, f: RuleFn) -> Result<()> {
		let hash = Base::of(&ty)?.digest();
		let bridged = D::layout_bridge(ty.clone(), f.clone());
		if let Some(kind) = ty.numeric() {
			self.numeric.insert(kind, bridged.clone());
		}
		let prev = self.basic.insert(
			hash,
			Basic {
				ty: ty.clone(),
				rule: bridged,
			},
		);
		if let Some(prev) = prev {
			warn!(direction = D::LABEL, counter = %ty, replaced = %prev.ty, "basic rule replaced");
			self.specific.remove(&prev.ty);
		}
		self.specific.insert(ty, f);
		Ok(())
	}

	/// Handle for rules that convert nested values through the conversion
	/// this engine builds into.
	pub fn recursion(&self) -> Recursion<D> {
		Recursion::new(Arc::clone(&self.hook))
	}

	/// Freezes the registries into a dispatch handle.
	pub fn build(mut self) -> Result<Conversion<D>> {
		if self.config.implicit_basic {
			self.fill_implicit();
		}
		if self.specific.is_empty() && self.generic.is_empty() && self.basic.is_empty() {
			return Err(Error::EmptyRuleset(D::EMPTY));
		}
		debug!(
			direction = D::LABEL,
			fixed = %self.fixed,
			specific = self.specific.len(),
			generic = self.generic.len(),
			basic = self.basic.len(),
			numeric = self.numeric.len(),
			"conversion built"
		);
		let resolver = Resolver::<D> {
			config: self.config,
			specific: self.specific,
			generic: self.generic,
			basic: RwLock::new(self.basic.into_iter().map(|(h, b)| (h, Slot::Rule(b.rule))).collect()),
			numeric: self.numeric,
			_direction: PhantomData,
		};
		let dispatch = Arc::new(Dispatch::new(self.fixed, resolver));
		self.hook.get_or_init(|| Arc::downgrade(&dispatch));
		Ok(Conversion::new(dispatch))
	}

	/// Installs a layout-reinterpreting rule for the fixed type's layout when
	/// no explicit rule covers it.
	fn fill_implicit(&mut self) {
		let base = match Base::of(&self.fixed) {
			Ok(base) => base,
			Err(error) => {
				debug!(direction = D::LABEL, fixed = %self.fixed, %error, "no implicit rule");
				return;
			}
		};
		if !base.is_concrete() || self.basic.contains_key(&base.digest()) {
			return;
		}
		let ty = match base.reconstruct() {
			Ok(ty) => ty,
			Err(error) => {
				debug!(direction = D::LABEL, fixed = %self.fixed, %error, "no implicit rule");
				return;
			}
		};
		let implicit: RuleFn = Arc::new(|dst: &mut Value, src: Value| -> Result<()> {
			let ty = dst.ty().clone();
			*dst = src.reinterpret(&ty);
			Ok(())
		});
		if self.load_basic(ty, implicit).is_ok() {
			debug!(direction = D::LABEL, fixed = %self.fixed, "implicit layout rule installed");
		}
	}
}

impl<D> std::fmt::Debug for Engine<D> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("fixed", &self.fixed)
			.field("specific", &self.specific.len())
			.field("generic", &self.generic.len())
			.field("basic", &self.basic.len())
			.field("numeric", &self.numeric.len())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
