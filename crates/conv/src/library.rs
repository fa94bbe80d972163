//! Build-once, per-type caches.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use recast_types::Type;
use rustc_hash::FxHashMap;

mod chain;

pub use chain::{Chain, Converter, Converters, Inverter, Inverters};

type Builder<T> = Box<dyn Fn(&Type) -> Option<T> + Send + Sync>;

/// Concurrent cache from a type to a value built at most once for it.
///
/// The key map is read optimistically and only write-locked to install an
/// empty cell for a new key; the builder then runs inside that cell, outside
/// the map lock. Concurrent callers for the same key wait on the cell, callers
/// for other keys proceed.
///
/// A builder must not request its own key from the same library; doing so
/// deadlocks.
pub struct Library<T> {
	cells: RwLock<FxHashMap<Type, Arc<OnceLock<T>>>>,
	builder: Builder<T>,
	default: T,
}

impl<T: Clone> Library<T> {
	/// Creates a library that caches `default` for every type `builder`
	/// declines.
	pub fn new(builder: impl Fn(&Type) -> Option<T> + Send + Sync + 'static, default: T) -> Self {
		Self {
			cells: RwLock::new(FxHashMap::default()),
			builder: Box::new(builder),
			default,
		}
	}

	pub fn get(&self, ty: &Type) -> T {
		let cached = self.cells.read().get(ty).cloned();
		let cell = match cached {
			Some(cell) => {
				tracing::trace!(%ty, "library hit");
				cell
			}
			None => self.cells.write().entry(ty.clone()).or_default().clone(),
		};
		cell.get_or_init(|| (self.builder)(ty).unwrap_or_else(|| self.default.clone()))
			.clone()
	}

	/// Whether a value has already been built for `ty`.
	pub fn contains(&self, ty: &Type) -> bool {
		self.cells.read().get(ty).is_some_and(|cell| cell.get().is_some())
	}

	/// Number of types seen so far, including any still being built.
	pub fn len(&self) -> usize {
		self.cells.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cells.read().is_empty()
	}
}
