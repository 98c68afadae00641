use super::*;
use yangbind_model::{SchemaBuilder, SchemaNodeIdentifier};

fn generator_of(arena: &GeneratorArena, stmt: StmtId) -> GenId {
    arena
        .by_statement(stmt)
        .unwrap_or_else(|| panic!("no generator for {stmt}"))
}

#[test]
fn test_modules_are_built_after_their_imports() {
    let mut b = SchemaBuilder::new();
    let second = b.module("second", "urn:second", None).unwrap();
    b.import(second, "first", "f");
    b.module("first", "urn:first", None).unwrap();
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let order: Vec<&str> = arena
        .modules()
        .iter()
        .map(|&m| arena.namespace_of(m).unwrap().namespace.as_str())
        .collect();
    assert_eq!(order, vec!["urn:first", "urn:second"]);
}

#[test]
fn test_import_cycle_is_reported() {
    let mut b = SchemaBuilder::new();
    let a = b.module("a", "urn:a", None).unwrap();
    let c = b.module("b", "urn:b", None).unwrap();
    b.import(a, "b", "b");
    b.import(c, "a", "a");
    let ctx = b.build();

    match GeneratorArena::build(&ctx) {
        Err(ReactorError::CircularModuleDependency(names)) => {
            assert!(names.contains(&"a".to_string()));
            assert!(names.contains(&"b".to_string()));
        }
        other => panic!("expected an import cycle, got {other:?}"),
    }
}

#[test]
fn test_unknown_import_does_not_block_ordering() {
    let mut b = SchemaBuilder::new();
    let a = b.module("a", "urn:a", None).unwrap();
    b.import(a, "not-loaded", "x");
    let ctx = b.build();
    assert_eq!(GeneratorArena::build(&ctx).unwrap().modules().len(), 1);
}

#[test]
fn test_notification_and_action_kinds_follow_parent() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let top_notification = b.notification(m, "top-event");
    let c = b.container(m, "c");
    let instance_notification = b.notification(c, "changed");
    let plain_action = b.action(c, "reset");
    let l = b.list(m, "l", &["id"]);
    b.string_leaf(l, "id");
    let keyed_notification = b.notification(l, "entry-changed");
    let keyed_action = b.action(l, "restart");
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let kind = |stmt| arena.get(generator_of(&arena, stmt)).kind.name();
    assert_eq!(kind(top_notification), "notification");
    assert_eq!(kind(instance_notification), "instance-notification");
    assert_eq!(kind(keyed_notification), "keyed-list-notification");
    assert_eq!(kind(plain_action), "action");
    assert_eq!(kind(keyed_action), "keyed-list-action");
    assert!(matches!(
        arena.get(generator_of(&arena, l)).kind,
        GeneratorKind::List { keyed: true, .. }
    ));
}

#[test]
fn test_uses_augment_becomes_child_of_using_node() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let g = b.grouping(m, "g");
    b.container(g, "inner");
    let top = b.container(m, "top");
    let uses = b.declare_uses(top, b.qname(m, "g"));
    let augment = b.uses_augment(uses, SchemaNodeIdentifier::descendant(vec![b.qname(m, "inner")]));
    b.string_leaf(augment, "extra");
    b.instantiate_uses(uses).unwrap();
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let top = generator_of(&arena, top);
    let augment = generator_of(&arena, augment);
    let composite = arena.composite(top).unwrap();
    assert_eq!(composite.uses, vec![uses]);
    assert_eq!(composite.augments, vec![augment]);
    assert!(matches!(arena.get(augment).kind, GeneratorKind::UsesAugment(_)));
    assert!(arena.get(augment).kind.is_augment());
    assert!(!arena.get(top).kind.is_augment());
    assert_eq!(arena.get(augment).parent, Some(top));

    // Augments and groupings are not schema nodes of their parent.
    let names: Vec<&str> = arena
        .schema_children(top)
        .iter()
        .map(|&c| arena.get(c).local_name())
        .collect();
    assert_eq!(names, vec!["inner"]);
}

#[test]
fn test_copied_uses_contributes_instantiated_augments() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let g = b.grouping(m, "g");
    b.container(g, "inner");
    let outer = b.grouping(m, "outer");
    let uses = b.declare_uses(outer, b.qname(m, "g"));
    b.uses_augment(uses, SchemaNodeIdentifier::descendant(vec![b.qname(m, "inner")]));
    b.instantiate_uses(uses).unwrap();
    let top = b.container(m, "top");
    b.uses(top, b.qname(m, "outer")).unwrap();
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let top = arena.composite(generator_of(&arena, top)).unwrap();
    assert_eq!(top.uses.len(), 1);
    assert!(top.augments.is_empty());
    assert_eq!(top.instantiated_augments.len(), 1);
}

#[test]
fn test_data_parent_and_children_skip_choice_and_case() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let c = b.container(m, "c");
    let choice = b.choice(c, "how");
    let case = b.case(choice, "fast");
    let leaf = b.string_leaf(case, "speed");
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let c = generator_of(&arena, c);
    let leaf = generator_of(&arena, leaf);
    assert_eq!(arena.data_parent(leaf), Some(c));
    assert_eq!(arena.data_children(c), vec![leaf]);
    assert_eq!(arena.schema_children(c).len(), 1);
}

#[test]
fn test_scope_and_grouping_membership() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let g = b.grouping(m, "g");
    let inner = b.container(g, "inner");
    let leaf = b.string_leaf(inner, "x");
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let module = arena.modules()[0];
    let g = generator_of(&arena, g);
    let inner = generator_of(&arena, inner);
    let leaf = generator_of(&arena, leaf);
    assert_eq!(arena.scope_of(leaf), vec![module, g, inner, leaf]);
    assert!(arena.is_within_grouping(leaf));
    assert!(!arena.is_within_grouping(module));
    assert_eq!(arena.describe(&ctx, leaf), "m:grouping g/container inner/leaf x");
}

#[test]
fn test_frozen_grouping_rejects_new_users() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let g = b.grouping(m, "g");
    let c = b.container(m, "c");
    let ctx = b.build();

    let mut arena = GeneratorArena::build(&ctx).unwrap();
    let g = generator_of(&arena, g);
    let c = generator_of(&arena, c);
    arena.add_grouping_user(g, c).unwrap();
    arena.add_grouping_user(g, c).unwrap();
    assert_eq!(arena.grouping_state(g).unwrap().users, vec![c]);

    arena.grouping_state_mut(g).unwrap().frozen = true;
    assert_eq!(
        arena.add_grouping_user(g, c),
        Err(ReactorError::FrozenGrouping("g".to_string()))
    );
}
