use super::*;
use crate::reactor::{Reactor, ReactorOptions};
use crate::types::TypeKind;
use yangbind_model::{SchemaBuilder, TypeSpec};

#[test]
fn test_builtin_types_map_to_boxed_classes() {
    assert_eq!(builtin_type(BuiltinType::Int32).to_string(), "java.lang.Integer");
    assert_eq!(builtin_type(BuiltinType::Uint64).to_string(), "yangbind.binding.Uint64");
    assert_eq!(builtin_type(BuiltinType::Decimal64).to_string(), "java.math.BigDecimal");
    assert_eq!(builtin_type(BuiltinType::Binary).to_string(), "byte[]");
}

#[test]
fn test_inline_union_members_are_named_by_kind() {
    assert_eq!(inline_kind(&TypeBinding::Enumeration(vec![])), "Enumeration");
    assert_eq!(inline_kind(&TypeBinding::Bits(vec![])), "Bits");
    assert_eq!(inline_kind(&TypeBinding::Union(vec![])), "Union");
}

#[test]
fn test_type_names_follow_domain_packages() {
    let mut b = SchemaBuilder::new();
    let m = b.module("shop", "urn:shop", Some("2024-03-01")).unwrap();
    let orders = b.container(m, "orders");
    let order = b.list(orders, "order", &["id"]);
    b.string_leaf(order, "id");
    let state = b.leaf(
        order,
        "state",
        TypeSpec::Enumeration(vec!["open".to_string(), "closed".to_string()]),
    );
    let ctx = b.build();

    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    let names = TypeNames::new(output.arena(), output.naming());
    let id = |stmt| output.by_statement(stmt).unwrap();

    let root = "yangbind.gen.v1.urn.shop.rev240301";
    assert_eq!(
        names.type_name(id(orders)).unwrap().to_string(),
        format!("{root}.Orders")
    );
    assert_eq!(
        names.type_name(id(order)).unwrap().to_string(),
        format!("{root}.orders.Order")
    );
    assert_eq!(
        names.key_type_name(id(order)).unwrap().to_string(),
        format!("{root}.orders.OrderKey")
    );
    assert_eq!(
        names.type_name(id(state)).unwrap().to_string(),
        format!("{root}.orders.Order.State")
    );
}

#[test]
fn test_typedef_chain_materializes_base_first() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let base = b.typedef(m, "base", TypeSpec::Builtin(BuiltinType::Int64));
    let derived = b.typedef(m, "derived", TypeSpec::Typedef(b.qname(m, "base")));
    let ctx = b.build();

    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    let base = output.by_statement(base).unwrap();
    let derived = output.generated_type(output.by_statement(derived).unwrap()).unwrap();
    assert_eq!(derived.kind, TypeKind::TransferObject);
    assert!(derived.implements_raw("TypeObject"));
    assert!(
        derived
            .implements
            .contains(&TypeRef::Named(output.type_name(base).unwrap()))
    );
    assert_eq!(
        derived.method("getValue").unwrap().return_type,
        TypeRef::Named(output.type_name(base).unwrap())
    );
}
