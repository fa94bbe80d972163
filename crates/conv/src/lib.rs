//! Runtime-resolved value conversion.
//!
//! A [`Scheme`] converts values of many source types into one destination
//! type; an [`Inverse`] converts one source type into many destination types.
//! Both collect [`Rule`]s keyed by the varying side, then [`build`] into a
//! [`Conversion`] that picks a rule per counter type on first use and caches
//! the choice:
//!
//! ```
//! use recast::{Rule, Scheme};
//! use recast::types::{Type, Value};
//!
//! let mut scheme = Scheme::new(Type::string());
//! scheme.load(Rule::new(Type::string(), Type::int(), |dst, src| {
//! 	let n = src.as_i64().unwrap_or_default();
//! 	Ok(dst.set_string(n.to_string())?)
//! }))?;
//! let conv = scheme.build()?;
//! assert_eq!(conv.convert(Value::int(44))?.as_str(), Some("44"));
//! # Ok::<(), recast::Error>(())
//! ```
//!
//! Types without an exact rule fall back to rules for their [`Family`], then
//! to rules for any unnamed type with the same memory layout (see [`Base`]),
//! then, for numbers, to the closest numeric rule that holds them losslessly.
//!
//! [`build`]: Engine::build
//! [`Family`]: recast_types::Family

pub mod base;
mod config;
mod engine;
mod error;
pub mod library;
mod rule;

pub use base::{Base, BaseHash, is_basic};
pub use config::Config;
pub use engine::{Conversion, Direction, Engine, FromFixed, IntoFixed, Inverse, Recursion, Scheme};
pub use error::{Error, Result, Side};
pub use library::Library;
pub use recast_numeric as numeric;
pub use recast_types as types;
pub use rule::{Operand, Rule, RuleFn};
