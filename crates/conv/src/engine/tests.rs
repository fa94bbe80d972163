use pretty_assertions::assert_eq;
use recast_numeric::{INT, Numeric};
use recast_types::access::Slice;
use recast_types::{Field, FieldPolicy, Type, Value};
use rstest::rstest;

use super::*;

fn init() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn label<T>(text: &'static str) -> impl Fn(&mut Value, T) -> Result<()> + Send + Sync + 'static {
	move |dst: &mut Value, _: T| Ok(dst.set_string(text)?)
}

fn point_shape() -> Type {
	Type::structure([Field::new("X", Type::int()), Field::new("Y", Type::int())])
}

fn point(ty: &Type, x: isize, y: isize) -> Value {
	Value::from_fields(ty, vec![Value::int(x), Value::int(y)]).unwrap()
}

fn text(v: &Value) -> &str {
	v.as_str().unwrap()
}

#[test]
fn test_specific_beats_generic() {
	init();
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::int(), label("specific")))
		.unwrap()
		.load(Rule::from_number(Type::string(), label("generic")))
		.unwrap();
	let conv = scheme.build().unwrap();

	assert_eq!(text(&conv.convert(Value::int(44)).unwrap()), "specific");
	assert_eq!(text(&conv.convert(Value::from(3i8)).unwrap()), "generic");
	// Cached outcome is reused.
	assert_eq!(text(&conv.convert(Value::int(45)).unwrap()), "specific");
	assert!(conv.is_resolved(&Type::int()));
}

#[test]
fn test_generic_beats_basic() {
	let ints = Type::slice(Type::int());
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::slice(Type::number(INT)), label("basic")))
		.unwrap()
		.load(Rule::from_slice(Type::string(), label("generic")))
		.unwrap();
	let conv = scheme.build().unwrap();

	// Exact registered type is found before the family.
	let exact = Value::zero(&Type::slice(Type::number(INT)));
	assert_eq!(text(&conv.convert(exact).unwrap()), "basic");
	// A layout twin is not.
	assert_eq!(text(&conv.convert(Value::zero(&ints)).unwrap()), "generic");
}

/// Registering `int` after its fixed-width alias replaces the alias rule.
#[test]
fn test_alias_replaces_stale_rule() {
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::number(INT), label("fixed width")))
		.unwrap()
		.load(Rule::new(Type::string(), Type::int(), label("int")))
		.unwrap();
	let conv = scheme.build().unwrap();

	assert_eq!(text(&conv.convert(Value::int(1)).unwrap()), "int");
	assert_eq!(text(&conv.convert(Value::zero(&Type::number(INT))).unwrap()), "int");
}

#[test]
fn test_overwrite() {
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::bool(), label("first")))
		.unwrap()
		.load(Rule::new(Type::string(), Type::bool(), label("second")))
		.unwrap();
	let conv = scheme.build().unwrap();
	assert_eq!(text(&conv.convert(Value::from(true)).unwrap()), "second");
}

#[test]
fn test_signature_errors() {
	let mut scheme = Scheme::new(Type::string());
	let err = scheme.load(Rule::new(Type::int(), Type::int(), |_, _| Ok(()))).unwrap_err();
	assert_eq!(
		err,
		Error::Signature {
			side: Side::Destination,
			expected: "string".into(),
			found: "int".into(),
		}
	);
	// Inverse-shaped rule: the fixed side is a family.
	let err = scheme.load(Rule::into_slice(Type::string(), |_, _| Ok(()))).unwrap_err();
	assert!(matches!(err, Error::Signature { side: Side::Destination, .. }));

	let mut inverse = Inverse::new(Type::int());
	let err = inverse.load(Rule::new(Type::string(), Type::string(), |_, _| Ok(()))).unwrap_err();
	assert!(matches!(err, Error::Signature { side: Side::Source, .. }));
}

#[test]
fn test_empty_ruleset() {
	// Interfaces have no concrete layout, so no implicit rule is added.
	let err = Scheme::new(Type::interface()).build().unwrap_err();
	assert_eq!(err, Error::EmptyRuleset("empty scheme"));

	let config = Config {
		implicit_basic: false,
		..Config::default()
	};
	let err = Inverse::with_config(Type::int(), config).build().unwrap_err();
	assert_eq!(err, Error::EmptyRuleset("empty inverse"));
}

#[test]
fn test_implicit_layout_rule() {
	init();
	let point_ty = Type::named("Point", &point_shape());
	let vec2 = Type::named("Vec2", &point_shape());
	let pair = Type::named(
		"Pair",
		&Type::structure([Field::new("A", Type::int()), Field::new("b", Type::int())]),
	);
	let conv = Scheme::new(point_ty.clone()).build().unwrap();

	for ty in [&vec2, &pair, &point_shape()] {
		let out = conv.convert(point(ty, 3, 4)).unwrap();
		assert_eq!(out, point(&point_ty, 3, 4));
	}

	let wider = Type::structure([Field::new("X", Type::number(Numeric::I32))]);
	assert!(matches!(
		conv.convert(Value::zero(&wider)),
		Err(Error::Invalid { .. })
	));
}

#[test]
fn test_inverse_implicit_layout_rule() {
	let point_ty = Type::named("Point", &point_shape());
	let vec2 = Type::named("Vec2", &point_shape());
	let conv = Inverse::new(point_ty.clone()).build().unwrap();

	let out = conv.convert(&vec2, point(&point_ty, 1, 2)).unwrap();
	assert_eq!(out, point(&vec2, 1, 2));
}

#[test]
fn test_explicit_basic_rule_suppresses_implicit() {
	let point_ty = Type::named("Point", &point_shape());
	let mut scheme = Scheme::new(point_ty.clone());
	let target = point_ty.clone();
	scheme
		.load(Rule::new(point_ty.clone(), point_shape(), move |dst, src| {
			let mut s = recast_types::access::Struct::new(src)?;
			let x = s.field("X")?;
			let y = s.field("Y")?;
			s.set_field("X", y)?;
			s.set_field("Y", x)?;
			*dst = s.into_inner().reinterpret(&target);
			Ok(())
		}))
		.unwrap();
	let conv = scheme.build().unwrap();

	let vec2 = Type::named("Vec2", &point_shape());
	assert_eq!(conv.convert(point(&vec2, 1, 2)).unwrap(), point(&point_ty, 2, 1));
}

#[rstest]
#[case::int8(Value::from(3i8), "i64")]
#[case::uint16(Value::from(3u16), "i64")]
#[case::float32(Value::from(1.5f32), "f64")]
fn test_scheme_substitute_minimality(#[case] src: Value, #[case] expected: &str) {
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::number(Numeric::F64), label("f64")))
		.unwrap()
		.load(Rule::new(Type::string(), Type::number(Numeric::I64), label("i64")))
		.unwrap();
	let conv = scheme.build().unwrap();

	let ty = src.ty().clone();
	assert_eq!(text(&conv.convert(src).unwrap()), expected);
	assert!(conv.is_resolved(&ty));
}

/// Equal ratings go to the kind listed first.
#[test]
fn test_substitute_tie_break() {
	assert_eq!(recast_numeric::rate(Numeric::F64, Numeric::I8), recast_numeric::rate(Numeric::C64, Numeric::I8));
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::number(Numeric::C64), label("c64")))
		.unwrap()
		.load(Rule::new(Type::string(), Type::number(Numeric::F64), label("f64")))
		.unwrap();
	let conv = scheme.build().unwrap();
	assert_eq!(text(&conv.convert(Value::from(-1i8)).unwrap()), "f64");
}

#[test]
fn test_scheme_substitute_converts_value() {
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::number(Numeric::F64), |dst, src| {
			let n = src.as_f64().ok_or_else(|| Error::custom("not a float"))?;
			Ok(dst.set_string(format!("{n:?} as {}", src.ty()))?)
		}))
		.unwrap();
	let conv = scheme.build().unwrap();
	assert_eq!(text(&conv.convert(Value::from(-7i8)).unwrap()), "-7.0 as float64");
}

#[test]
fn test_inverse_substitute_minimality() {
	let write = |v: Value| move |dst: &mut Value, _: Value| -> Result<()> { Ok(dst.assign(v.clone())?) };
	let mut inverse = Inverse::new(Type::string());
	inverse
		.load(Rule::new(Type::number(Numeric::I8), Type::string(), write(Value::from(8i8))))
		.unwrap()
		.load(Rule::new(Type::number(Numeric::I16), Type::string(), write(Value::from(16i16))))
		.unwrap();
	let conv = inverse.build().unwrap();

	let out = conv.convert(&Type::number(Numeric::I64), Value::from("x")).unwrap();
	assert_eq!(out, Value::from(16i64));
	// Narrower than every registered kind: nothing holds the result losslessly.
	assert!(matches!(
		conv.convert(&Type::number(Numeric::U8), Value::from("x")),
		Err(Error::Invalid { .. })
	));
}

#[test]
fn test_no_substitute_is_invalid() {
	let mut scheme = Scheme::new(Type::string());
	scheme.load(Rule::new(Type::string(), Type::number(Numeric::I8), label("i8"))).unwrap();
	let conv = scheme.build().unwrap();

	let err = conv.convert(Value::from(1000i64)).unwrap_err();
	assert_eq!(
		err,
		Error::Invalid {
			src: Type::number(Numeric::I64),
			dst: Type::string(),
		}
	);
	// Same layout, different type: the invalid marker is shared.
	let big = Type::named("Big", &Type::number(Numeric::I64));
	assert!(matches!(conv.convert(Value::zero(&big)), Err(Error::Invalid { .. })));
	assert!(matches!(conv.convert(Value::from(true)), Err(Error::Invalid { .. })));
	assert!(conv.is_resolved(&Type::bool()));
}

#[test]
fn test_numeric_substitution_disabled() {
	let config = Config::parse("numeric_substitution = false").unwrap();
	let mut scheme = Scheme::with_config(Type::string(), config);
	scheme.load(Rule::new(Type::string(), Type::number(Numeric::F64), label("f64"))).unwrap();
	let conv = scheme.build().unwrap();
	assert!(matches!(conv.convert(Value::from(1i8)), Err(Error::Invalid { .. })));
	assert_eq!(text(&conv.convert(Value::from(1f64)).unwrap()), "f64");
}

#[rstest]
#[case::default_visible(None, Config::default(), 1)]
#[case::config_all(None, Config { field_policy: FieldPolicy::All, ..Config::default() }, 2)]
#[case::rule_override(Some(FieldPolicy::All), Config::default(), 2)]
fn test_struct_field_policy(#[case] policy: Option<FieldPolicy>, #[case] config: Config, #[case] expected: i64) {
	let ty = Type::named(
		"Counter",
		&Type::structure([Field::new("Hits", Type::int()), Field::new("misses", Type::int())]),
	);
	let mut rule = Rule::from_struct(Type::int(), |dst, src| {
		let count = src.iter().count();
		Ok(dst.assign(Value::int(count as isize))?)
	});
	if let Some(policy) = policy {
		rule = rule.with_policy(policy);
	}
	let mut scheme = Scheme::with_config(Type::int(), config);
	scheme.load(rule).unwrap();
	let conv = scheme.build().unwrap();
	assert_eq!(conv.convert(Value::zero(&ty)).unwrap().as_i64(), Some(expected));
}

#[test]
fn test_recursion_sums_nested_slices() {
	init();
	let mut scheme = Scheme::new(Type::int());
	let rec = scheme.recursion();
	assert_eq!(rec.conversion().unwrap_err(), Error::Unbuilt);

	scheme
		.load(Rule::new(Type::int(), Type::int(), |dst, src| Ok(dst.assign(src)?)))
		.unwrap()
		.load(Rule::from_slice(Type::int(), move |dst, src| {
			let mut sum = 0;
			for elem in src.iter() {
				sum += rec.convert(elem)?.as_i64().unwrap_or_default();
			}
			Ok(dst.assign(Value::int(sum as isize))?)
		}))
		.unwrap();
	let rec = scheme.recursion();
	let conv = scheme.build().unwrap();

	let ints = Type::slice(Type::int());
	let nested = Type::slice(ints.clone());
	let row = |xs: &[isize]| Value::from_elems(&ints, xs.iter().map(|&x| Value::int(x)).collect()).unwrap();
	let v = Value::from_elems(&nested, vec![row(&[1, 2]), row(&[3]), row(&[])]).unwrap();
	assert_eq!(conv.convert(v).unwrap().as_i64(), Some(6));
	assert_eq!(rec.convert(Value::int(5)).unwrap().as_i64(), Some(5));

	drop(conv);
	assert_eq!(rec.conversion().unwrap_err(), Error::Unbuilt);
}

fn tree(node: &Type, val: isize, kids: Vec<Value>) -> Value {
	let kids_ty = node.fields()[1].ty.clone();
	Value::from_fields(node, vec![Value::int(val), Value::from_elems(&kids_ty, kids).unwrap()]).unwrap()
}

#[test]
fn test_recursion_sums_self_referential_tree() {
	init();
	let node = Type::recursive("Node", |node| {
		Type::structure([Field::new("Val", Type::int()), Field::new("Kids", Type::slice(node.clone()))])
	})
	.unwrap();

	let mut scheme = Scheme::new(Type::int());
	let (fields, elems) = (scheme.recursion(), scheme.recursion());
	scheme
		.load(Rule::new(Type::int(), Type::int(), |dst, src| Ok(dst.assign(src)?)))
		.unwrap()
		.load(Rule::from_struct(Type::int(), move |dst, src| {
			let mut sum = 0;
			for (_, v) in src.iter() {
				sum += fields.convert(v)?.as_i64().unwrap_or_default();
			}
			Ok(dst.assign(Value::int(sum as isize))?)
		}))
		.unwrap()
		.load(Rule::from_slice(Type::int(), move |dst, src| {
			let mut sum = 0;
			for elem in src.iter() {
				sum += elems.convert(elem)?.as_i64().unwrap_or_default();
			}
			Ok(dst.assign(Value::int(sum as isize))?)
		}))
		.unwrap();
	let conv = scheme.build().unwrap();

	let leaf = |val: isize| tree(&node, val, Vec::new());
	let root = tree(&node, 1, vec![tree(&node, 2, vec![leaf(4)]), leaf(3)]);
	assert_eq!(conv.convert(root).unwrap().as_i64(), Some(10));
	assert!(conv.is_resolved(&node));
	assert!(conv.is_resolved(&Type::slice(node.clone())));
}

#[test]
fn test_inverse_recursion_fills_slices() {
	let mut inverse = Inverse::new(Type::int());
	let rec = inverse.recursion();
	inverse
		.load(Rule::new(Type::int(), Type::int(), |dst, src| Ok(dst.assign(src)?)))
		.unwrap()
		.load(Rule::into_slice(Type::int(), move |mut dst: Slice<&mut Value>, src| {
			let elem = dst.elem_type().clone();
			for _ in 0..2 {
				let v = rec.convert(&elem, src.clone())?;
				dst.append(v)?;
			}
			Ok(())
		}))
		.unwrap();
	let conv = inverse.build().unwrap();

	let nested = Type::slice(Type::slice(Type::int()));
	let out = conv.convert(&nested, Value::int(9)).unwrap();
	let outer = Slice::new(&out).unwrap();
	assert_eq!(outer.len(), 2);
	let inner = outer.get(1).unwrap();
	assert_eq!(Slice::new(&inner).unwrap().get(0).unwrap(), Value::int(9));
}

#[test]
fn test_mismatched_operands() {
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::bool(), |dst, _| {
			*dst = Value::from(false);
			Ok(())
		}))
		.unwrap();
	let conv = scheme.build().unwrap();

	let mut wrong = Value::from(1i8);
	assert!(matches!(conv.convert_into(&mut wrong, Value::from(true)), Err(Error::Mismatch { .. })));
	// The rule replaced the destination with a value of another type.
	assert_eq!(
		conv.convert(Value::from(true)).unwrap_err(),
		Error::Mismatch {
			expected: Type::string(),
			found: Type::bool(),
		}
	);

	let conv = Inverse::new(Type::int()).build().unwrap();
	assert!(matches!(conv.convert(&Type::int(), Value::from("x")), Err(Error::Mismatch { .. })));
}

#[test]
fn test_rule_errors_pass_through() {
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::bool(), |_, _| Err(Error::custom("boom"))))
		.unwrap();
	let conv = scheme.build().unwrap();
	assert_eq!(conv.convert(Value::from(true)).unwrap_err(), Error::custom("boom"));
}

#[test]
fn test_interface_source_dispatches_on_dynamic_type() {
	let mut scheme = Scheme::new(Type::string());
	scheme
		.load(Rule::new(Type::string(), Type::number(Numeric::I8), label("i8")))
		.unwrap();
	let conv = scheme.build().unwrap();

	assert_eq!(text(&conv.convert(Value::from(3i8)).unwrap()), "i8");
	assert_eq!(text(&conv.convert(Value::interface(Value::from(3i8))).unwrap()), "i8");
	let nested = Value::interface(Value::interface(Value::from(-1i8)));
	assert_eq!(text(&conv.convert(nested).unwrap()), "i8");
	assert!(!conv.is_resolved(&Type::interface()));

	assert_eq!(
		conv.convert(Value::zero(&Type::interface())).unwrap_err(),
		Error::Invalid {
			src: Type::interface(),
			dst: Type::string(),
		}
	);
}
