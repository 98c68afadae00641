use super::*;
use crate::naming::StatementNamespace;

fn describe(id: GenId) -> String {
    format!("node {id}")
}

fn names(naming: &Naming, members: &[MemberId]) -> Vec<String> {
    members.iter().map(|&m| naming.current_name(m)).collect()
}

#[test]
fn test_distinct_names_converge_in_one_pass() {
    let mut naming = Naming::default();
    let domain = naming.add_domain(GenId(0));
    let a = naming.add_primary(
        domain,
        GenId(1),
        NamingStrategy::new(StatementNamespace::Container, "alpha"),
    );
    let b = naming.add_primary(
        domain,
        GenId(2),
        NamingStrategy::new(StatementNamespace::List, "beta"),
    );
    assert_eq!(naming.solve(10, &describe), Ok(1));
    assert_eq!(names(&naming, &[a, b]), vec!["Alpha", "Beta"]);
}

#[test]
fn test_different_statement_kinds_get_namespace_suffixes() {
    let mut naming = Naming::default();
    let domain = naming.add_domain(GenId(0));
    let container = naming.add_primary(
        domain,
        GenId(1),
        NamingStrategy::new(StatementNamespace::Container, "foo"),
    );
    let grouping = naming.add_primary(
        domain,
        GenId(2),
        NamingStrategy::new(StatementNamespace::Grouping, "foo"),
    );
    naming.solve(10, &describe).unwrap();
    assert_eq!(names(&naming, &[container, grouping]), vec!["Foo$CO", "Foo$GR"]);
}

#[test]
fn test_separator_variants_become_bijective() {
    let mut naming = Naming::default();
    let domain = naming.add_domain(GenId(0));
    let dashed = naming.add_primary(
        domain,
        GenId(1),
        NamingStrategy::new(StatementNamespace::Container, "foo-bar"),
    );
    let underscored = naming.add_primary(
        domain,
        GenId(2),
        NamingStrategy::new(StatementNamespace::Container, "foo_bar"),
    );
    naming.solve(10, &describe).unwrap();
    assert_eq!(
        names(&naming, &[dashed, underscored]),
        vec!["Foo$2Dbar", "Foo_bar"]
    );
}

#[test]
fn test_secondary_escalates_through_its_primary() {
    let mut naming = Naming::default();
    let domain = naming.add_domain(GenId(0));
    let list = naming.add_primary(
        domain,
        GenId(1),
        NamingStrategy::new(StatementNamespace::List, "foo"),
    );
    let key = naming.add_secondary(domain, GenId(1), list, "Key");
    let container = naming.add_primary(
        domain,
        GenId(2),
        NamingStrategy::new(StatementNamespace::Container, "foo-key"),
    );
    assert_eq!(naming.current_name(key), "FooKey");
    assert_eq!(naming.child_package(key), "fookey");

    naming.solve(10, &describe).unwrap();
    let solved = names(&naming, &[list, key, container]);
    assert_eq!(solved, vec!["Foo$LI", "Foo$LIKey", "FooKey$CO"]);
    assert_eq!(naming.primary_of(key), list);
    assert_eq!(naming.strategy(key), naming.strategy(list));
}

#[test]
fn test_escalation_in_one_domain_renames_primary_elsewhere() {
    let mut naming = Naming::default();
    let outer = naming.add_domain(GenId(0));
    let inner = naming.add_domain(GenId(1));
    let op = naming.add_primary(outer, GenId(1), NamingStrategy::new(StatementNamespace::Rpc, "op"));
    let input = naming.add_secondary(inner, GenId(2), op, "Input");
    let sibling = naming.add_primary(
        inner,
        GenId(3),
        NamingStrategy::new(StatementNamespace::Container, "op-input"),
    );

    assert_eq!(naming.solve(10, &describe), Ok(2));
    assert_eq!(
        names(&naming, &[op, input, sibling]),
        vec!["Op$RP", "Op$RPInput", "OpInput$CO"]
    );
}

#[test]
fn test_terminal_collision_is_a_conflict() {
    let mut naming = Naming::default();
    let domain = naming.add_domain(GenId(0));
    for generator in [GenId(1), GenId(2)] {
        naming.add_primary(
            domain,
            generator,
            NamingStrategy::new(StatementNamespace::Container, "same"),
        );
    }
    match naming.solve(10, &describe) {
        Err(ReactorError::NamingConflict { domain, names }) => {
            assert_eq!(domain, "node g0");
            assert_eq!(names.len(), 2);
        }
        other => panic!("expected a naming conflict, got {other:?}"),
    }
}

#[test]
fn test_pass_bound_is_enforced() {
    let mut naming = Naming::default();
    let domain = naming.add_domain(GenId(0));
    naming.add_primary(domain, GenId(1), NamingStrategy::new(StatementNamespace::Container, "x"));
    naming.add_primary(domain, GenId(2), NamingStrategy::new(StatementNamespace::Grouping, "x"));
    assert!(matches!(
        naming.solve(1, &describe),
        Err(ReactorError::StalledLinkage { stage: "naming", .. })
    ));
}
