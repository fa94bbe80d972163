use std::sync::Arc;

use recast_numeric::{Numeric, convert, rate};
use recast_types::{Type, Value, access};

use crate::error::{Result, Side};
use crate::rule::RuleFn;

// Seal Direction so engines only exist for the two directions below.
mod sealed {
	pub trait Sealed {}
	impl Sealed for super::IntoFixed {}
	impl Sealed for super::FromFixed {}
}

/// Which side of every rule an engine holds fixed.
///
/// The other side, the counter type, varies per call and drives resolution.
pub trait Direction: sealed::Sealed + Send + Sync + 'static {
	/// Used in log events and errors.
	const LABEL: &'static str;
	/// Message of the error `build` returns for an engine without rules.
	const EMPTY: &'static str;
	const FIXED: Side;

	/// Rates numeric kind `candidate` as a stand-in for the counter kind, in
	/// the direction values flow.
	fn rate(counter: Numeric, candidate: Numeric) -> Option<u8>;

	/// Adapts `rule`, written for the unnamed type `basic`, to any counter type
	/// with the same layout.
	fn layout_bridge(basic: Type, rule: RuleFn) -> RuleFn;

	/// Adapts `rule`, registered for numeric kind `kind`, to other numeric
	/// counter types by converting through the lattice.
	fn numeric_bridge(kind: Numeric, rule: RuleFn) -> RuleFn;
}

/// Scheme direction: any source into the fixed destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntoFixed;

/// Inverse direction: the fixed source into any destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromFixed;

impl Direction for IntoFixed {
	const LABEL: &'static str = "scheme";
	const EMPTY: &'static str = "empty scheme";
	const FIXED: Side = Side::Destination;

	fn rate(counter: Numeric, candidate: Numeric) -> Option<u8> {
		rate(candidate, counter)
	}

	fn layout_bridge(basic: Type, rule: RuleFn) -> RuleFn {
		Arc::new(move |dst: &mut Value, src: Value| rule(dst, src.reinterpret(&basic)))
	}

	fn numeric_bridge(kind: Numeric, rule: RuleFn) -> RuleFn {
		Arc::new(move |dst: &mut Value, src: Value| -> Result<()> {
			let n = access::Number::new(&src)?.get();
			rule(dst, Value::number(convert(kind, n)?))
		})
	}
}

impl Direction for FromFixed {
	const LABEL: &'static str = "inverse";
	const EMPTY: &'static str = "empty inverse";
	const FIXED: Side = Side::Source;

	fn rate(counter: Numeric, candidate: Numeric) -> Option<u8> {
		rate(counter, candidate)
	}

	fn layout_bridge(basic: Type, rule: RuleFn) -> RuleFn {
		Arc::new(move |dst: &mut Value, src: Value| -> Result<()> {
			let ty = dst.ty().clone();
			let mut tmp = std::mem::replace(dst, Value::zero(&ty)).reinterpret(&basic);
			let res = rule(&mut tmp, src);
			*dst = tmp.reinterpret(&ty);
			res
		})
	}

	fn numeric_bridge(kind: Numeric, rule: RuleFn) -> RuleFn {
		Arc::new(move |dst: &mut Value, src: Value| -> Result<()> {
			let mut tmp = Value::zero(&Type::number(kind));
			rule(&mut tmp, src)?;
			let n = access::Number::new(&tmp)?.get();
			access::Number::new(dst)?.set(n)?;
			Ok(())
		})
	}
}
