use rustc_hash::FxHashSet;
use yangbind_model::{BuiltinType, SchemaBuilder, SchemaContext, SchemaNodeIdentifier, TypeSpec};
use yangbind_reactor::{Reactor, ReactorOptions, ReactorOutput};

fn simple_name(output: &ReactorOutput, stmt: yangbind_model::StmtId) -> String {
    let id = output.by_statement(stmt).unwrap();
    output.type_name(id).unwrap().simple_name().to_string()
}

/// A module whose top level mixes kinds, separators and derived names.
fn crowded() -> SchemaContext {
    let mut b = SchemaBuilder::new();
    let m = b.module("crowded", "urn:crowded", Some("2024-06-01")).unwrap();
    b.container(m, "foo");
    b.grouping(m, "foo");
    b.typedef(m, "foo", TypeSpec::Builtin(BuiltinType::String));
    let items = b.list(m, "items", &["id"]);
    b.string_leaf(items, "id");
    b.container(m, "items-key");
    let rpc = b.rpc(m, "op");
    b.input(rpc);
    b.container(m, "op-input");
    let mode = b.container(m, "mode");
    b.leaf(
        mode,
        "mode",
        TypeSpec::Enumeration(vec!["on".to_string(), "off".to_string()]),
    );
    b.build()
}

#[test]
fn test_names_are_unique_in_every_domain() {
    let ctx = crowded();
    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    let naming = output.naming();
    for domain in naming.domains() {
        let mut seen = FxHashSet::default();
        for &member in &domain.members {
            let name = naming.current_name(member);
            assert!(seen.insert(name.clone()), "{name} appears twice");
        }
    }
}

#[test]
fn test_statement_kinds_sharing_a_name_get_suffixes() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let container = b.container(m, "foo");
    let grouping = b.grouping(m, "foo");
    let typedef = b.typedef(m, "foo", TypeSpec::Builtin(BuiltinType::String));
    let ctx = b.build();

    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    assert_eq!(simple_name(output, container), "Foo$CO");
    assert_eq!(simple_name(output, grouping), "Foo$GR");
    assert_eq!(simple_name(output, typedef), "Foo$TD");
}

#[test]
fn test_key_class_collision_escalates_the_list() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let items = b.list(m, "items", &["id"]);
    b.string_leaf(items, "id");
    let container = b.container(m, "items-key");
    let ctx = b.build();

    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    let list = output.by_statement(items).unwrap();
    assert_eq!(simple_name(output, items), "Items$LI");
    assert_eq!(
        output.key_type_name(list).unwrap().simple_name(),
        "Items$LIKey"
    );
    assert_eq!(simple_name(output, container), "ItemsKey$CO");
    assert_eq!(
        output.key_type(list).unwrap().name,
        output.key_type_name(list).unwrap()
    );
}

#[test]
fn test_operation_input_lives_in_operation_package() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let rpc = b.rpc(m, "op");
    let input = b.input(rpc);
    let sibling = b.container(m, "op-input");
    let ctx = b.build();

    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    let input_name = output.type_name(output.by_statement(input).unwrap()).unwrap();
    let sibling_name = output.type_name(output.by_statement(sibling).unwrap()).unwrap();
    assert_ne!(input_name, sibling_name);
    assert_eq!(input_name.to_string(), "yangbind.gen.v1.urn.m.op.OpInput");
    assert_eq!(sibling_name.to_string(), "yangbind.gen.v1.urn.m.OpInput");
}

#[test]
fn test_nested_enumeration_never_reuses_enclosing_name() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let container = b.container(m, "mode");
    let leaf = b.leaf(
        container,
        "mode",
        TypeSpec::Enumeration(vec!["on".to_string(), "off".to_string()]),
    );
    let ctx = b.build();

    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    let enclosing = output
        .type_name(output.by_statement(container).unwrap())
        .unwrap();
    let nested = output.type_name(output.by_statement(leaf).unwrap()).unwrap();
    assert_ne!(nested.simple_name(), enclosing.simple_name());
    assert!(nested.to_string().starts_with(&format!("{enclosing}.")));

    let ty = output
        .generated_type(output.by_statement(container).unwrap())
        .unwrap();
    let enumeration = ty.nested_type(nested.simple_name()).unwrap();
    assert!(enumeration.constant("On").is_some());
    assert!(enumeration.constant("Off").is_some());
}

#[test]
fn test_augments_of_one_target_are_numbered() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    b.container(m, "top");
    let path = SchemaNodeIdentifier::absolute(vec![b.qname(m, "top")]);
    let first = b.augment(m, path.clone());
    b.string_leaf(first, "a");
    let second = b.augment(m, path);
    b.string_leaf(second, "b");
    let ctx = b.build();

    let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
    let output = reactor.run().unwrap();
    assert_eq!(simple_name(output, first), "Top1");
    assert_eq!(simple_name(output, second), "Top2");
}

#[test]
fn test_naming_is_deterministic() {
    let names = || {
        let ctx = crowded();
        let mut reactor = Reactor::new(&ctx, ReactorOptions::default()).unwrap();
        reactor
            .run()
            .unwrap()
            .generated_types()
            .map(|(_, ty)| ty.name.to_string())
            .collect::<Vec<_>>()
    };
    let first = names();
    assert!(!first.is_empty());
    assert_eq!(first, names());
}
