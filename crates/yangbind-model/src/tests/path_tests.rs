use super::*;

fn module_for(prefix: Option<&str>) -> Result<QNameModule, ModelError> {
    match prefix {
        None | Some("a") => Ok(QNameModule::new("urn:a", None)),
        Some("b") => Ok(QNameModule::new("urn:b", None)),
        Some(other) => Err(ModelError::UnknownPrefix {
            module: "a".to_string(),
            prefix: other.to_string(),
        }),
    }
}

#[test]
fn test_relative_path_with_parent_steps() {
    let path = PathExpression::parse("../../b:list/name", &module_for).unwrap();
    assert!(!path.absolute);
    assert_eq!(path.steps.len(), 4);
    assert_eq!(path.steps[0], PathStep::Parent);
    assert_eq!(path.steps[1], PathStep::Parent);
    match &path.steps[2] {
        PathStep::Child(q) => {
            assert_eq!(q.module.namespace, "urn:b");
            assert_eq!(q.local_name, "list");
        }
        other => panic!("expected child step, got {other:?}"),
    }
    assert_eq!(path.to_string(), "../../list/name");
}

#[test]
fn test_predicates_are_dropped() {
    let path =
        PathExpression::parse("/a:top/a:entry[a:name = current()/../key]/a:value", &module_for)
            .unwrap();
    assert!(path.absolute);
    assert_eq!(path.to_string(), "/top/entry/value");
}

#[test]
fn test_absolute_path_rejects_parent_step() {
    let err = PathExpression::parse("/a:top/../x", &module_for).unwrap_err();
    assert!(matches!(err, ModelError::InvalidPath { .. }));
}

#[test]
fn test_unbalanced_predicate_is_invalid() {
    let err = PathExpression::parse("/a:top[name", &module_for).unwrap_err();
    assert!(matches!(err, ModelError::InvalidPath { .. }));
}

#[test]
fn test_unknown_prefix_propagates() {
    let err = PathExpression::parse("/zz:top", &module_for).unwrap_err();
    assert!(matches!(err, ModelError::UnknownPrefix { .. }));
}

#[test]
fn test_schema_node_identifier_rejects_parent() {
    let err = SchemaNodeIdentifier::parse("../x", &module_for).unwrap_err();
    assert!(matches!(err, ModelError::InvalidPath { .. }));
    let err = SchemaNodeIdentifier::parse("/", &module_for).unwrap_err();
    assert!(matches!(err, ModelError::InvalidPath { .. }));
}

#[test]
fn test_schema_node_identifier_rebind_keeps_foreign_steps() {
    let id = SchemaNodeIdentifier::parse("b:outer/inner", &module_for).unwrap();
    assert!(!id.absolute);
    let c = QNameModule::new("urn:c", None);
    let rebound = id.rebind(&QNameModule::new("urn:a", None), &c);
    assert_eq!(rebound.steps[0].module.namespace, "urn:b");
    assert_eq!(rebound.steps[1].module, c);
    assert_eq!(rebound.last().map(|q| q.local_name.as_str()), Some("inner"));
}
