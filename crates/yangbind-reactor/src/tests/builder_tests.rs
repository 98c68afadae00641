use super::*;

fn name(simple: &str) -> JavaTypeName {
    JavaTypeName::new("yangbind.gen.v1.urn.test", simple)
}

fn metadata() -> CodegenMetadata {
    CodegenMetadata {
        module_name: "test".to_string(),
        statement: "container top".to_string(),
        description: Some("Top level".to_string()),
        reference: None,
    }
}

#[test]
fn test_duplicate_method_is_rejected() {
    let mut builder = CodegenTypeBuilderFactory.new_structured_type(name("Top"));
    builder
        .add_method("getName", TypeRef::Named(JavaTypeName::java_lang("String")))
        .unwrap();
    assert_eq!(
        builder.add_method("getName", TypeRef::object()),
        Err(ReactorError::DuplicateMember {
            kind: "method",
            name: "getName".to_string(),
            owner: "yangbind.gen.v1.urn.test.Top".to_string(),
        })
    );
}

#[test]
fn test_duplicate_constant_is_rejected() {
    let mut builder = RuntimeTypeBuilderFactory.new_enum_type(name("Mode"));
    builder
        .add_constant("Fast", TypeRef::Named(name("Mode")), "fast".to_string())
        .unwrap();
    assert!(matches!(
        builder.add_constant("Fast", TypeRef::Named(name("Mode")), "fast".to_string()),
        Err(ReactorError::DuplicateMember { kind: "constant", .. })
    ));
}

#[test]
fn test_nested_type_cannot_shadow_enclosing_name() {
    let mut builder = CodegenTypeBuilderFactory.new_structured_type(name("Top"));
    let same = CodegenTypeBuilderFactory
        .new_enum_type(name("Top").nested("Top"))
        .build();
    assert!(builder.add_nested_type(same).is_err());

    let nested = CodegenTypeBuilderFactory
        .new_enum_type(name("Top").nested("Mode"))
        .build();
    builder.add_nested_type(nested.clone()).unwrap();
    assert!(builder.add_nested_type(nested).is_err());
    let built = builder.build();
    assert_eq!(
        built.nested_type("Mode").unwrap().name.to_string(),
        "yangbind.gen.v1.urn.test.Top.Mode"
    );
}

#[test]
fn test_implemented_types_are_deduplicated_in_order() {
    let mut builder = RuntimeTypeBuilderFactory.new_structured_type(name("Top"));
    builder.add_implemented_type(TypeRef::binding("Augmentable"));
    builder.add_implemented_type(TypeRef::binding("ChildOf"));
    builder.add_implemented_type(TypeRef::binding("Augmentable"));
    let built = builder.build();
    assert_eq!(built.implements.len(), 2);
    assert!(built.implements_raw("ChildOf"));
    assert_eq!(built.kind, TypeKind::Interface);
}

#[test]
fn test_factories_differ_only_in_documentation() {
    let mut documented = CodegenTypeBuilderFactory.new_data_root(name("TestData"));
    CodegenTypeBuilderFactory.attach_codegen_metadata(documented.as_mut(), metadata());
    let documented = documented.build();
    assert_eq!(documented.kind, TypeKind::DataRoot);
    assert_eq!(documented.metadata, Some(metadata()));

    let mut plain = RuntimeTypeBuilderFactory.new_data_root(name("TestData"));
    RuntimeTypeBuilderFactory.attach_codegen_metadata(plain.as_mut(), metadata());
    let plain = plain.build();
    assert_eq!(plain.metadata, None);
    assert_eq!(plain.name, documented.name);
}

#[test]
fn test_parameterized_reference_display() {
    let child_of = TypeRef::parameterized(
        JavaTypeName::binding("ChildOf"),
        vec![TypeRef::Named(name("TestData"))],
    );
    assert_eq!(
        child_of.to_string(),
        "yangbind.binding.ChildOf<yangbind.gen.v1.urn.test.TestData>"
    );
    assert_eq!(child_of.raw().simple_name(), "ChildOf");
}
