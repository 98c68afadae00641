//! Loading schemas from their JSON document form.

use yangbind_model::{
    ModelError, PathStep, SchemaContext, SchemaDocument, StatementKind, StmtId, TypeSpec,
};

fn load(json: &str) -> Result<SchemaContext, ModelError> {
    SchemaDocument::from_json(json)?.into_context()
}

fn child(ctx: &SchemaContext, parent: StmtId, name: &str) -> StmtId {
    ctx.substatements(parent)
        .iter()
        .copied()
        .find(|&c| ctx.get(c).qname().is_some_and(|q| q.local_name == name))
        .unwrap_or_else(|| panic!("no child {name} under {}", ctx.describe(parent)))
}

#[test]
fn test_loads_modules_with_imports_and_uses() {
    let ctx = load(
        r#"{
          "modules": [
            { "name": "a", "namespace": "urn:a", "prefix": "a", "body": [
                { "kind": "grouping", "name": "g", "children": [
                    { "kind": "leaf", "name": "x", "type": { "builtin": "string" } } ] } ] },
            { "name": "b", "namespace": "urn:b", "revision": "2024-01-15",
              "imports": [ { "module": "a", "prefix": "pa" } ],
              "body": [
                { "kind": "container", "name": "top", "children": [
                    { "kind": "uses", "grouping": "pa:g" } ] } ] }
          ]
        }"#,
    )
    .unwrap();

    assert_eq!(ctx.modules().len(), 2);
    let b = ctx.module_by_name("b").unwrap();
    assert_eq!(b.qname_module.revision.as_deref(), Some("2024-01-15"));
    let top = child(&ctx, b.statement, "top");
    let x = child(&ctx, top, "x");
    let leaf = ctx.get(x);
    assert!(leaf.added_by_uses);
    assert_eq!(leaf.qname().unwrap().module.namespace, "urn:b");
}

#[test]
fn test_uses_waits_for_nested_uses_of_its_grouping() {
    // `outer` is declared before `inner` and uses it, so it must be
    // instantiated second even though its `uses` appears first.
    let ctx = load(
        r#"{ "modules": [ { "name": "a", "namespace": "urn:a", "body": [
            { "kind": "container", "name": "top", "children": [
                { "kind": "uses", "grouping": "outer" } ] },
            { "kind": "grouping", "name": "outer", "children": [
                { "kind": "uses", "grouping": "inner" } ] },
            { "kind": "grouping", "name": "inner", "children": [
                { "kind": "leaf", "name": "deep", "type": { "builtin": "int32" } } ] }
        ] } ] }"#,
    )
    .unwrap();

    let a = ctx.module_by_name("a").unwrap();
    let top = child(&ctx, a.statement, "top");
    assert!(ctx.get(child(&ctx, top, "deep")).added_by_uses);
}

#[test]
fn test_mutually_recursive_groupings_are_rejected() {
    let err = load(
        r#"{ "modules": [ { "name": "a", "namespace": "urn:a", "body": [
            { "kind": "grouping", "name": "g1", "children": [
                { "kind": "uses", "grouping": "g2" } ] },
            { "kind": "grouping", "name": "g2", "children": [
                { "kind": "uses", "grouping": "g1" } ] }
        ] } ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::CircularGrouping(names) if names.len() == 2));
}

#[test]
fn test_types_and_augments() {
    let ctx = load(
        r#"{ "modules": [ { "name": "a", "namespace": "urn:a", "prefix": "a", "body": [
            { "kind": "identity", "name": "base-id" },
            { "kind": "identity", "name": "derived", "base": ["a:base-id"] },
            { "kind": "typedef", "name": "percent", "type": { "builtin": "uint8" } },
            { "kind": "container", "name": "top", "children": [
                { "kind": "leaf", "name": "level", "type": { "typedef": "percent" } },
                { "kind": "leaf", "name": "mode", "type": { "enumeration": ["on", "off"] } },
                { "kind": "leaf", "name": "ref", "type": { "leafref": "../a:level" } },
                { "kind": "leaf", "name": "kind", "type": { "identityref": ["base-id"] } },
                { "kind": "leaf", "name": "where", "type": "instance-identifier" }
            ] },
            { "kind": "augment", "target": "/a:top", "children": [
                { "kind": "leaf", "name": "extra", "type": { "builtin": "boolean" } } ] }
        ] } ] }"#,
    )
    .unwrap();

    let a = ctx.module_by_name("a").unwrap();
    let top = child(&ctx, a.statement, "top");
    let level = ctx.get(child(&ctx, top, "level"));
    assert!(matches!(&level.type_spec, Some(TypeSpec::Typedef(q)) if q.local_name == "percent"));
    let reference = ctx.get(child(&ctx, top, "ref"));
    match &reference.type_spec {
        Some(TypeSpec::Leafref(path)) => {
            assert!(!path.absolute);
            assert_eq!(path.steps[0], PathStep::Parent);
        }
        other => panic!("unexpected type {other:?}"),
    }
    assert_eq!(
        ctx.get(child(&ctx, top, "where")).type_spec,
        Some(TypeSpec::InstanceIdentifier)
    );
    let derived = ctx.get(child(&ctx, a.statement, "derived"));
    assert_eq!(derived.bases[0].local_name, "base-id");

    let augment = ctx
        .children_of_kind(a.statement, StatementKind::Augment)
        .next()
        .unwrap();
    let target = ctx.get(augment).schema_node_id().unwrap();
    assert!(target.absolute);
    assert_eq!(target.to_string(), "/top");
}

#[test]
fn test_input_outside_operation_is_rejected() {
    let err = load(
        r#"{ "modules": [ { "name": "a", "namespace": "urn:a", "body": [
            { "kind": "container", "name": "c", "children": [
                { "kind": "input", "children": [] } ] } ] } ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::InvalidChild(_, _)));
}

#[test]
fn test_unknown_prefix_and_malformed_input() {
    let err = load(
        r#"{ "modules": [ { "name": "a", "namespace": "urn:a", "body": [
            { "kind": "leaf", "name": "x", "type": { "typedef": "zz:t" } } ] } ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::UnknownPrefix { .. }));

    assert!(matches!(
        load(r#"{ "modules": [ { "name": 1 } ] }"#),
        Err(ModelError::Malformed(_))
    ));
}
