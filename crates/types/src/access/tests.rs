use pretty_assertions::assert_eq;
use recast_numeric::Numeric;
use rstest::rstest;

use super::*;
use crate::{AccessError, Field, Type, Value};

fn ints(values: &[isize]) -> Value {
	Value::from_elems(&Type::slice(Type::int()), values.iter().copied().map(Value::int).collect()).unwrap()
}

#[test]
fn test_array_read_write() {
	let ty = Type::array(3, Type::number(Numeric::I16));
	let mut v = Value::zero(&ty);
	{
		let mut arr = Array::new(&mut v).unwrap();
		assert_eq!(arr.len(), 3);
		arr.set(1, Value::from(7i16)).unwrap();
		assert_eq!(
			arr.set(3, Value::from(1i16)),
			Err(AccessError::OutOfRange { index: 3, len: 3 })
		);
		assert!(arr.set(0, Value::from(1i32)).is_err());
	}
	let arr = Array::new(v).unwrap();
	assert_eq!(arr.get(1).unwrap().as_i64(), Some(7));
	assert_eq!(arr.new_elem(), Value::from(0i16));
	assert_eq!(arr.into_elems().len(), 3);
}

#[test]
fn test_slice_grows_and_shrinks() {
	let mut v = ints(&[1, 2]);
	let mut s = Slice::new(&mut v).unwrap();
	s.append(Value::int(3)).unwrap();
	assert_eq!(s.len(), 3);
	s.set_len(5).unwrap();
	assert_eq!(s.get(4).unwrap(), Value::int(0));
	s.set_len(1).unwrap();
	assert_eq!(s.iter().collect::<Vec<_>>(), vec![Value::int(1)]);
	s.clear().unwrap();
	assert!(s.is_empty());
}

#[rstest]
#[case::number(Value::from(1i8))]
#[case::string(Value::from("x"))]
fn test_wrong_kind_rejected(#[case] v: Value) {
	assert!(matches!(Array::new(&v), Err(AccessError::Kind { expected: "array", .. })));
	assert!(Slice::new(&v).is_err());
	assert!(Map::new(&v).is_err());
	assert!(Pointer::new(&v).is_err());
	assert!(Struct::new(&v).is_err());
}

#[test]
fn test_map_entries() {
	let ty = Type::map(Type::string(), Type::int());
	let mut v = Value::zero(&ty);
	let mut m = Map::new(&mut v).unwrap();
	assert_eq!(m.insert(Value::from("a"), Value::int(1)).unwrap(), None);
	assert_eq!(m.insert(Value::from("b"), Value::int(2)).unwrap(), None);
	assert_eq!(m.insert(Value::from("a"), Value::int(3)).unwrap(), Some(Value::int(1)));
	assert_eq!(m.len(), 2);
	assert_eq!(m.get(&Value::from("a")).unwrap(), Some(Value::int(3)));
	assert!(m.get(&Value::int(1)).is_err());

	let keys: Vec<_> = m.iter().map(|(k, _)| k.as_str().map(str::to_owned)).collect();
	assert_eq!(keys, vec![Some("a".to_owned()), Some("b".to_owned())]);

	assert_eq!(m.remove(&Value::from("a")).unwrap(), Some(Value::int(3)));
	assert_eq!(m.remove(&Value::from("a")).unwrap(), None);
	assert!(!m.contains_key(&Value::from("a")).unwrap());
	assert_eq!(Map::new(v).unwrap().into_entries(), vec![(Value::from("b"), Value::int(2))]);
}

#[test]
fn test_number_set_is_lossless() {
	let mut v = Value::zero(&Type::number(Numeric::F64));
	let mut n = Number::new(&mut v).unwrap();
	assert_eq!(n.size(), 8);
	n.set(3i32).unwrap();
	assert_eq!(n.get(), recast_numeric::Number::F64(3.0));
	assert!(matches!(n.set(1i64), Err(AccessError::Numeric(_))));

	let mut small = Value::zero(&Type::int());
	let mut n = Number::new(&mut small).unwrap();
	assert_eq!(n.kind(), recast_numeric::INT);
	n.set(-2i8).unwrap();
	assert_eq!(small.as_i64(), Some(-2));
	assert_eq!(small.ty(), &Type::int());
}

#[test]
fn test_pointer_allocates_on_set() {
	let ty = Type::pointer(Type::string());
	let mut v = Value::zero(&ty);
	let mut p = Pointer::new(&mut v).unwrap();
	assert!(p.is_nil());
	assert_eq!(p.elem(), Err(AccessError::Nil));
	p.set_elem(Value::from("hi")).unwrap();
	assert_eq!(p.elem().unwrap().as_str(), Some("hi"));
	p.set_nil();
	assert!(p.is_nil());
	p.set_elem(Value::from("again")).unwrap();
	assert_eq!(Pointer::new(v).unwrap().into_elem(), Some(Value::from("again")));
}

fn embedded() -> Type {
	let inner = Type::named(
		"Inner",
		&Type::structure([
			Field::new("A", Type::int()),
			Field::new("B", Type::string()),
			Field::new("hidden", Type::bool()),
		]),
	);
	let other = Type::named("Other", &Type::structure([Field::new("B", Type::bool())]));
	Type::named(
		"Outer",
		&Type::structure([
			Field::embedded(inner),
			Field::embedded(other),
			Field::new("C", Type::number(Numeric::F32)).with_tag("json:\"c\""),
			Field::new("private", Type::int()),
		]),
	)
}

/// Visible fields flatten embedded structs and drop ambiguous and unexported names.
#[test]
fn test_visible_fields() {
	let v = Value::zero(&embedded());
	let s = Struct::new(&v).unwrap();
	let names: Vec<_> = s.fields().iter().map(|f| f.name.to_string()).collect();
	assert_eq!(names, vec!["A", "C"]);

	let a = s.lookup("A").unwrap();
	assert_eq!(a.index, vec![0, 0]);
	assert_eq!(&*s.lookup("C").unwrap().tag, "json:\"c\"");
	assert!(matches!(s.lookup("B"), Err(AccessError::Hidden { .. })));
	assert!(matches!(s.lookup("hidden"), Err(AccessError::Hidden { .. })));
	assert!(matches!(s.lookup("Z"), Err(AccessError::NoField { .. })));
}

#[test]
fn test_all_fields_policy() {
	let v = Value::zero(&embedded());
	let s = Struct::with_policy(&v, FieldPolicy::All).unwrap();
	let names: Vec<_> = s.fields().iter().map(|f| f.name.to_string()).collect();
	assert_eq!(names, vec!["Inner", "Other", "C", "private"]);
	assert_eq!(s.field("private").unwrap(), Value::int(0));
}

#[test]
fn test_struct_write_through_promoted_field() {
	let mut v = Value::zero(&embedded());
	let mut s = Struct::new(&mut v).unwrap();
	s.set_field("A", Value::int(9)).unwrap();
	assert!(s.set_field("C", Value::int(1)).is_err());
	assert_eq!(s.field("A").unwrap(), Value::int(9));

	let pairs: Vec<_> = Struct::new(&v).unwrap().iter().map(|(f, v)| (f.name.to_string(), v)).collect();
	assert_eq!(
		pairs,
		vec![("A".to_owned(), Value::int(9)), ("C".to_owned(), Value::from(0f32))]
	);
}

#[rstest]
#[case::visible("visible", FieldPolicy::Visible)]
#[case::all("all", FieldPolicy::All)]
fn test_field_policy_names(#[case] name: &str, #[case] expected: FieldPolicy) {
	use serde::Deserialize;
	use serde::de::IntoDeserializer;

	let de: serde::de::value::StrDeserializer<'_, serde::de::value::Error> = name.into_deserializer();
	assert_eq!(FieldPolicy::deserialize(de).unwrap(), expected);
}
