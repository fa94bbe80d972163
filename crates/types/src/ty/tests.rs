use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::Data;

fn point() -> Type {
	Type::structure([Field::new("X", Type::int()), Field::new("Y", Type::int())])
}

#[rstest]
#[case::int(Type::int(), "int")]
#[case::float(Type::number(Numeric::F64), "float64")]
#[case::slice(Type::slice(Type::int()), "[]int")]
#[case::array(Type::array(3, Type::number(Numeric::U8)), "[3]uint8")]
#[case::map(Type::map(Type::string(), Type::int()), "map[string]int")]
#[case::pointer(Type::pointer(Type::bool()), "*bool")]
#[case::empty_struct(Type::structure(Vec::new()), "struct {}")]
#[case::point(point(), "struct { X int; Y int }")]
#[case::variadic(
	Type::func(vec![Type::int(), Type::slice(Type::string())], vec![Type::bool()], true),
	"func(int, ...string) bool"
)]
#[case::multi_result(Type::func(vec![], vec![Type::int(), Type::bool()], false), "func() (int, bool)")]
#[case::recv(Type::chan(ChanDir::Recv, Type::int()), "<-chan int")]
#[case::interface(Type::interface(), "interface {}")]
#[case::named(Type::named("Point", &point()), "Point")]
fn test_display(#[case] ty: Type, #[case] expected: &str) {
	assert_eq!(ty.to_string(), expected);
}

/// Independently built descriptors of the same shape are equal and hash alike.
#[test]
fn test_structural_identity() {
	let a = Type::map(Type::string(), Type::slice(point()));
	let b = Type::map(Type::string(), Type::slice(point()));
	assert!(!Type::ptr_eq(&a, &b));
	assert_eq!(a, b);

	let mut set = rustc_hash::FxHashSet::default();
	set.insert(a);
	assert!(set.contains(&b));
}

#[test]
fn test_names_distinguish_types() {
	let vec2 = Type::named("Vec2", &point());
	let pair = Type::named("Pair", &point());
	assert_ne!(vec2, pair);
	assert_ne!(vec2, point());
	assert_eq!(vec2.underlying(), point());
	assert_eq!(vec2.underlying(), pair.underlying());
}

#[test]
fn test_platform_int_is_distinct_kind() {
	assert_ne!(Type::int(), Type::number(recast_numeric::INT));
	assert_eq!(Type::int().numeric(), Type::number(recast_numeric::INT).numeric());
	assert_eq!(Type::int().kind(), Kind::Int);
	assert_eq!(Type::int().kind().alias(), Kind::from_numeric(recast_numeric::INT));
}

#[test]
fn test_embedded_field_names() {
	let inner = Type::named("Inner", &point());
	assert_eq!(&*Field::embedded(inner.clone()).name, "Inner");
	assert_eq!(&*Field::embedded(Type::pointer(inner)).name, "Inner");
	assert!(!Field::new("x", Type::int()).exported());
	assert!(Field::new("X", Type::int()).exported());
}

#[test]
fn test_simple_table_covers_simple_kinds() {
	for tag in 0..=u8::MAX {
		let Some(kind) = Kind::from_tag(tag) else {
			continue;
		};
		assert_eq!(kind.tag(), tag);
		match Type::simple(kind) {
			Some(ty) => {
				assert!(kind.is_simple());
				assert_eq!(ty.kind(), kind);
			}
			None => assert!(!kind.is_simple()),
		}
	}
}

fn node() -> Type {
	Type::recursive("Node", |node| {
		Type::structure([Field::new("Val", Type::int()), Field::new("Kids", Type::slice(node.clone()))])
	})
	.unwrap()
}

#[test]
fn test_recursive_type() {
	let node = node();
	assert!(node.is_recursive());
	assert_eq!(node.to_string(), "Node");
	assert_eq!(node.underlying().to_string(), "struct { Val int; Kids []Node }");

	let kids = &node.fields()[1].ty;
	assert!(Type::ptr_eq(kids.elem().unwrap(), &node));
	assert_eq!(*kids, Type::slice(node.clone()));
	assert!(Data::zero(&node).conforms(&node));

	// Each definition is its own type, even with the same name and layout.
	assert_ne!(node, self::node());
}

#[test]
fn test_recursive_list_through_pointer() {
	let list = Type::recursive("List", |list| {
		Type::structure([Field::new("Next", Type::pointer(list.clone())), Field::new("V", Type::int())])
	})
	.unwrap();
	assert_eq!(list.underlying().to_string(), "struct { Next *List; V int }");
	assert_eq!(Data::zero(&list), Data::Struct(vec![Data::Pointer(None), Data::zero(&Type::int())]));
}

#[rstest]
#[case::field(|this: &Type| Type::structure([Field::new("Me", this.clone())]))]
#[case::array(|this: &Type| Type::array(2, this.clone()))]
#[case::nested_struct(|this: &Type| {
	let inner = Type::named("Inner", &Type::structure([Field::new("Outer", this.clone())]));
	Type::structure([Field::new("Ptr", Type::pointer(this.clone())), Field::new("In", inner)])
})]
fn test_recursive_needs_indirection(#[case] define: fn(&Type) -> Type) {
	assert_eq!(
		Type::recursive("Bad", define).unwrap_err(),
		AccessError::Recursive { name: "Bad".to_owned() }
	);
}

#[test]
fn test_recursive_without_self_reference_is_plain() {
	let plain = Type::recursive("Plain", |_| point()).unwrap();
	assert!(!plain.is_recursive());
	assert_eq!(plain, Type::named("Plain", &point()));
}

fn any_type() -> impl Strategy<Value = Type> {
	let leaf = prop_oneof![
		Just(Type::bool()),
		Just(Type::string()),
		Just(Type::int()),
		Just(Type::uint()),
		(0..Numeric::COUNT).prop_map(|i| Type::number(Numeric::ALL[i])),
	];
	leaf.prop_recursive(4, 32, 4, |inner| {
		prop_oneof![
			(0usize..4, inner.clone()).prop_map(|(len, elem)| Type::array(len, elem)),
			inner.clone().prop_map(Type::slice),
			inner.clone().prop_map(Type::pointer),
			(inner.clone(), inner.clone()).prop_map(|(k, v)| Type::map(k, v)),
			prop::collection::vec(inner.clone(), 0..4).prop_map(|tys| {
				Type::structure(tys.into_iter().enumerate().map(|(i, ty)| Field::new(format!("F{i}"), ty)))
			}),
			("[A-Z][a-z]{0,4}", inner).prop_map(|(name, ty)| Type::named(name, &ty)),
		]
	})
}

proptest! {
	/// Rebuilding a type from its shape yields an equal descriptor.
	#[test]
	fn test_rebuild_is_equal(ty in any_type()) {
		let rebuilt = match ty.name() {
			Some(name) => Type::named(name, &ty.underlying()),
			None => Type::from_shape(None, ty.shape().clone()),
		};
		prop_assert_eq!(&rebuilt, &ty);
		prop_assert_eq!(rebuilt.to_string(), ty.to_string());
	}

	#[test]
	fn test_zero_conforms(ty in any_type()) {
		prop_assert!(Data::zero(&ty).conforms(&ty));
	}
}
