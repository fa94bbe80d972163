use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use recast_numeric::Numeric;
use recast_types::{Family, Type, Value};
use rustc_hash::FxHashMap;
use tracing::debug;

use super::Direction;
use crate::base::{Base, BaseHash};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::library::Library;
use crate::rule::RuleFn;

/// Layout registry entry. `Invalid` records a numeric layout for which no
/// substitute exists, so later types sharing it skip the scan.
pub(super) enum Slot {
	Rule(RuleFn),
	Invalid,
}

/// Frozen registries of a built engine.
pub(super) struct Resolver<D> {
	pub(super) config: Config,
	pub(super) specific: FxHashMap<Type, RuleFn>,
	pub(super) generic: FxHashMap<Family, RuleFn>,
	pub(super) basic: RwLock<FxHashMap<BaseHash, Slot>>,
	pub(super) numeric: FxHashMap<Numeric, RuleFn>,
	pub(super) _direction: PhantomData<D>,
}

impl<D: Direction> Resolver<D> {
	/// Picks the rule for `counter`, or `None` when nothing applies.
	pub(super) fn resolve(&self, counter: &Type) -> Option<RuleFn> {
		if let Some(rule) = self.specific.get(counter) {
			debug!(direction = D::LABEL, %counter, "resolved specific rule");
			return Some(rule.clone());
		}
		if let Some((family, rule)) = counter.family().and_then(|f| Some((f, self.generic.get(&f)?))) {
			debug!(direction = D::LABEL, %counter, %family, "resolved generic rule");
			return Some(rule.clone());
		}
		let hash = match Base::of(counter) {
			Ok(base) => base.digest(),
			Err(error) => {
				debug!(direction = D::LABEL, %counter, %error, "no structural descriptor");
				return None;
			}
		};
		match self.basic.read().get(&hash) {
			Some(Slot::Rule(rule)) => {
				debug!(direction = D::LABEL, %counter, %hash, "resolved basic rule");
				return Some(rule.clone());
			}
			Some(Slot::Invalid) => return None,
			None => {}
		}
		match counter.numeric() {
			Some(kind) if self.config.numeric_substitution => self.substitute(counter, kind, hash),
			_ => {
				debug!(direction = D::LABEL, %counter, "no rule applies");
				None
			}
		}
	}

	/// Bridges a numeric counter type through the registered kind with the
	/// lowest rating. Ties go to the kind listed first in [`Numeric::ALL`].
	fn substitute(&self, counter: &Type, kind: Numeric, hash: BaseHash) -> Option<RuleFn> {
		let mut basic = self.basic.write();
		match basic.get(&hash) {
			Some(Slot::Rule(rule)) => return Some(rule.clone()),
			Some(Slot::Invalid) => return None,
			None => {}
		}
		let best = Numeric::ALL
			.iter()
			.filter_map(|&k| {
				let rule = self.numeric.get(&k)?;
				Some((D::rate(kind, k)?, k, rule))
			})
			.min_by_key(|(cost, ..)| *cost);
		match best {
			Some((cost, k, rule)) => {
				debug!(direction = D::LABEL, %counter, substitute = %k, cost, "synthesized numeric bridge");
				let bridge = D::numeric_bridge(k, rule.clone());
				basic.insert(hash, Slot::Rule(bridge.clone()));
				Some(bridge)
			}
			None => {
				debug!(direction = D::LABEL, %counter, "no lossless numeric substitute");
				basic.insert(hash, Slot::Invalid);
				None
			}
		}
	}
}

/// Built dispatch shared by every handle of one conversion.
pub(super) struct Dispatch {
	pub(super) fixed: Type,
	cache: Library<RuleFn>,
}

impl Dispatch {
	pub(super) fn new<D: Direction>(fixed: Type, resolver: Resolver<D>) -> Self {
		let invalid: RuleFn = Arc::new(|dst: &mut Value, src: Value| -> Result<()> {
			Err(Error::Invalid {
				src: src.ty().clone(),
				dst: dst.ty().clone(),
			})
		});
		Self {
			fixed,
			cache: Library::new(move |counter| resolver.resolve(counter), invalid),
		}
	}

	/// Rule for `counter`, resolving it on first use.
	pub(super) fn rule(&self, counter: &Type) -> RuleFn {
		self.cache.get(counter)
	}

	pub(super) fn is_resolved(&self, counter: &Type) -> bool {
		self.cache.contains(counter)
	}

	pub(super) fn resolved_len(&self) -> usize {
		self.cache.len()
	}
}
