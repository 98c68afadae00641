use super::*;
use yangbind_model::{BuiltinType, SchemaBuilder, StmtId};

fn gen_id(arena: &GeneratorArena, stmt: StmtId) -> GenId {
    arena.by_statement(stmt).unwrap()
}

#[test]
fn test_scoped_lookup_prefers_innermost_grouping() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let outer_g = b.grouping(m, "g");
    let c = b.container(m, "c");
    let inner_g = b.grouping(c, "g");
    let other = b.container(m, "other");
    let name = b.qname(m, "g");
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let in_c = arena.scope_of(gen_id(&arena, c));
    let lookup = LinkContext::new(&arena, &ctx, &in_c);
    assert_eq!(
        lookup.resolve_tree_scoped(ScopedKind::Grouping, &name),
        Ok(gen_id(&arena, inner_g))
    );

    let in_other = arena.scope_of(gen_id(&arena, other));
    let lookup = LinkContext::new(&arena, &ctx, &in_other);
    assert_eq!(
        lookup.resolve_tree_scoped(ScopedKind::Grouping, &name),
        Ok(gen_id(&arena, outer_g))
    );
}

#[test]
fn test_scoped_lookup_in_other_module_uses_top_level() {
    let mut b = SchemaBuilder::new();
    let types = b.module("types", "urn:types", None).unwrap();
    let percent = b.typedef(types, "percent", TypeSpec::Builtin(BuiltinType::Uint8));
    let user = b.module("user", "urn:user", None).unwrap();
    b.import(user, "types", "t");
    let c = b.container(user, "c");
    let name = b.qname(types, "percent");
    let missing = b.qname(types, "absent");
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let stack = arena.scope_of(gen_id(&arena, c));
    let lookup = LinkContext::new(&arena, &ctx, &stack);
    assert_eq!(
        lookup.resolve_tree_scoped(ScopedKind::Typedef, &name),
        Ok(gen_id(&arena, percent))
    );
    assert!(matches!(
        lookup.resolve_tree_scoped(ScopedKind::Typedef, &missing),
        Err(ReactorError::UnresolvedReference { kind: "typedef", .. })
    ));
    assert!(matches!(
        lookup.resolve_module(&QNameModule::new("urn:nowhere", None)),
        Err(ReactorError::UnresolvedModule(_))
    ));
}

#[test]
fn test_bind_type_links_typedefs_and_defers_references() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let counter = b.typedef(m, "counter", TypeSpec::Builtin(BuiltinType::Uint32));
    let c = b.container(m, "c");
    let counter_name = b.qname(m, "counter");
    let peer = PathExpression {
        absolute: false,
        steps: vec![PathStep::Parent, PathStep::Child(b.qname(m, "peer"))],
    };
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let stack = arena.scope_of(gen_id(&arena, c));
    let lookup = LinkContext::new(&arena, &ctx, &stack);
    let spec = TypeSpec::Union(vec![
        TypeSpec::Typedef(counter_name),
        TypeSpec::Leafref(peer.clone()),
    ]);
    assert_eq!(
        lookup.bind_type(&spec),
        Ok(TypeBinding::Union(vec![
            TypeBinding::Typedef(gen_id(&arena, counter)),
            TypeBinding::Leafref {
                path: peer,
                target: RefTarget::Pending,
            },
        ]))
    );
}

#[test]
fn test_leafref_resolution_walks_data_tree() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let c = b.container(m, "c");
    let choice = b.choice(c, "mode");
    let case = b.case(choice, "manual");
    let target = b.string_leaf(case, "address");
    let rel = PathExpression {
        absolute: false,
        steps: vec![PathStep::Parent, PathStep::Child(b.qname(m, "address"))],
    };
    let abs = PathExpression {
        absolute: true,
        steps: vec![
            PathStep::Child(b.qname(m, "c")),
            PathStep::Child(b.qname(m, "address")),
        ],
    };
    let to_container = PathExpression {
        absolute: true,
        steps: vec![PathStep::Child(b.qname(m, "c"))],
    };
    let site = b.leaf(c, "ref", TypeSpec::Leafref(rel.clone()));
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let site = gen_id(&arena, site);
    let target = gen_id(&arena, target);
    let stack = arena.scope_of(site);
    let lookup = LinkContext::new(&arena, &ctx, &stack);
    assert_eq!(lookup.resolve_leafref(site, &rel), Some(target));
    assert_eq!(lookup.resolve_leafref(site, &abs), Some(target));
    assert_eq!(lookup.resolve_leafref(site, &to_container), None);
}

#[test]
fn test_unresolved_references_are_lenient_only_on_request() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let c = b.container(m, "c");
    let dangling = PathExpression {
        absolute: false,
        steps: vec![PathStep::Parent, PathStep::Child(b.qname(m, "nothing"))],
    };
    let site = b.leaf(c, "ref", TypeSpec::Leafref(dangling.clone()));
    let base = b.qname(m, "no-such-identity");
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let site = gen_id(&arena, site);
    let stack = arena.scope_of(site);
    let lookup = LinkContext::new(&arena, &ctx, &stack);
    let leafref = TypeBinding::Leafref {
        path: dangling.clone(),
        target: RefTarget::Pending,
    };
    assert_eq!(
        lookup.bind_references(site, &leafref, Leniency::Lenient),
        Ok(TypeBinding::Leafref {
            path: dangling,
            target: RefTarget::Unresolved,
        })
    );
    assert!(matches!(
        lookup.bind_references(site, &leafref, Leniency::Strict),
        Err(ReactorError::UnresolvedLeafref { .. })
    ));

    let identityref = TypeBinding::Identityref {
        bases: vec![base],
        targets: vec![RefTarget::Pending],
    };
    assert!(matches!(
        lookup.bind_references(site, &identityref, Leniency::Lenient),
        Ok(TypeBinding::Identityref { targets, .. }) if targets == vec![RefTarget::Unresolved]
    ));
    assert!(lookup.bind_references(site, &identityref, Leniency::Strict).is_err());
    assert!(
        lookup
            .bind_references(site, &identityref, Leniency::RelativePaths)
            .is_err()
    );
}

#[test]
fn test_relative_path_leniency_only_covers_relative_paths() {
    let mut b = SchemaBuilder::new();
    let m = b.module("m", "urn:m", None).unwrap();
    let c = b.container(m, "c");
    let relative = PathExpression {
        absolute: false,
        steps: vec![PathStep::Parent, PathStep::Child(b.qname(m, "nothing"))],
    };
    let absolute = PathExpression {
        absolute: true,
        steps: vec![
            PathStep::Child(b.qname(m, "nowhere")),
            PathStep::Child(b.qname(m, "nothing")),
        ],
    };
    let site = b.leaf(c, "ref", TypeSpec::Leafref(relative.clone()));
    let ctx = b.build();

    let arena = GeneratorArena::build(&ctx).unwrap();
    let site = gen_id(&arena, site);
    let stack = arena.scope_of(site);
    let lookup = LinkContext::new(&arena, &ctx, &stack);
    let pending = |path: &PathExpression| TypeBinding::Leafref {
        path: path.clone(),
        target: RefTarget::Pending,
    };
    assert_eq!(
        lookup.bind_references(site, &pending(&relative), Leniency::RelativePaths),
        Ok(TypeBinding::Leafref {
            path: relative,
            target: RefTarget::Unresolved,
        })
    );
    assert!(matches!(
        lookup.bind_references(site, &pending(&absolute), Leniency::RelativePaths),
        Err(ReactorError::UnresolvedLeafref { .. })
    ));
}
