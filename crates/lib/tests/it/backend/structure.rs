use nestree::{NestedSet, Scope, TreeScope};

use crate::helpers::*;

#[test]
fn test_sample_tree_intervals() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);

    let bounds = |id| {
        let node = find(&scope, id);
        (node.left, node.right, node.depth)
    };
    assert_eq!(bounds(s.a), (1, 12, 0));
    assert_eq!(bounds(s.b), (2, 7, 1));
    assert_eq!(bounds(s.e), (3, 4, 2));
    assert_eq!(bounds(s.f), (5, 6, 2));
    assert_eq!(bounds(s.c), (8, 9, 1));
    assert_eq!(bounds(s.d), (10, 11, 1));
    assert_eq!(bounds(s.g), (13, 16, 0));
    assert_eq!(bounds(s.h), (14, 15, 1));
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_nodes_in_default_order() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);

    let order: Vec<_> = snapshot(&scope).into_iter().map(|n| n.id).collect();
    assert_eq!(order, vec![s.a, s.b, s.e, s.f, s.c, s.d, s.g, s.h]);
}

#[test]
fn test_siblings_and_children() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);

    assert_eq!(scope.siblings_count(s.c).unwrap(), 2);
    assert_eq!(scope.siblings_count(s.a).unwrap(), 1);
    assert_eq!(scope.children_count(s.a).unwrap(), 3);
    assert_eq!(scope.children_count(s.e).unwrap(), 0);
    assert_eq!(scope.descendants(s.a).unwrap(), vec![s.b, s.e, s.f, s.c, s.d]);
    assert!(scope.descendants(s.h).unwrap().is_empty());
}

#[test]
fn test_up_and_down() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);

    assert!(scope.up(s.d, 2).unwrap());
    assert_eq!(children(&scope, Some(s.a)), vec![s.d, s.b, s.c]);

    assert!(scope.down(s.d, 1).unwrap());
    assert_eq!(children(&scope, Some(s.a)), vec![s.b, s.d, s.c]);

    // Subtrees travel with their root
    assert!(scope.down(s.b, 2).unwrap());
    assert_eq!(children(&scope, Some(s.a)), vec![s.d, s.c, s.b]);
    assert_eq!(children(&scope, Some(s.b)), vec![s.e, s.f]);
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_up_past_first_sibling_does_nothing() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let before = snapshot(&scope);

    assert!(!scope.up(s.c, 2).unwrap());
    assert!(!scope.down(s.c, 2).unwrap());
    assert!(!scope.up(s.a, 1).unwrap());
    assert_eq!(snapshot(&scope), before);
}

#[test]
fn test_append_and_insert() {
    let (store, scope) = setup();
    let s = build_sample(&scope);

    scope.append_node(s.g, s.b).unwrap();
    assert_eq!(children(&scope, Some(s.g)), vec![s.h, s.b]);
    assert_eq!(find(&scope, s.e).depth, 2);

    store.insert_before(s.h, s.c).unwrap();
    assert_eq!(children(&scope, Some(s.g)), vec![s.c, s.h, s.b]);

    store.insert_after(s.a, s.d).unwrap();
    assert_eq!(children(&scope, None), vec![s.a, s.d, s.g]);
    assert!(find(&scope, s.d).is_root());
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_save_as_root_appends_after_roots() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);

    scope.save_as_root(s.b).unwrap();
    assert_eq!(children(&scope, None), vec![s.a, s.g, s.b]);
    assert_eq!(find(&scope, s.b).depth, 0);
    assert_eq!(find(&scope, s.e).depth, 1);
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_move_into_own_subtree_is_rejected() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let before = snapshot(&scope);

    let err = scope.prepend_node(s.e, s.b).unwrap_err();
    assert!(err.is_logical_error());
    let err = scope.append_node(s.b, s.b).unwrap_err();
    assert!(err.is_logical_error());
    assert_eq!(snapshot(&scope), before);
}

#[test]
fn test_delete_removes_subtree() {
    let (store, scope) = setup();
    let s = build_sample(&scope);

    assert_eq!(scope.delete(s.b).unwrap(), 3);
    assert!(scope.find(s.e).unwrap_err().is_not_found());
    assert_eq!(store.len(), 5);
    assert_eq!(children(&scope, Some(s.a)), vec![s.c, s.d]);
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_update_attributes_keeps_structure() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let before = find(&scope, s.c);

    let updated = scope.update_attributes(s.c, titled("Renamed")).unwrap();
    assert_eq!(updated.attribute_text("title"), "Renamed");
    assert_eq!((updated.left, updated.right), (before.left, before.right));
    assert_eq!(updated.parent_id, before.parent_id);
}

#[test]
fn test_missing_node_is_not_found() {
    let (_store, scope) = setup();
    build_sample(&scope);
    let missing = nestree::NodeId::new(999_999);

    for err in [
        scope.find(missing).unwrap_err(),
        scope.up(missing, 1).unwrap_err(),
        scope.save_as_root(missing).unwrap_err(),
        scope.delete(missing).unwrap_err(),
    ] {
        assert!(err.is_not_found());
        assert_eq!(err.module(), "backend");
    }
}

#[test]
fn test_partitions_are_numbered_independently() {
    let (store, header, footer) = setup_menus();
    let home = add(&header, None, "Home");
    let about = add(&header, Some(home), "About");
    let contact = add(&footer, None, "Contact");

    assert_eq!((find(&header, home).left, find(&header, home).right), (1, 4));
    assert_eq!((find(&footer, contact).left, find(&footer, contact).right), (1, 2));
    assert_invariants(&snapshot(&header));
    assert_invariants(&snapshot(&footer));

    // Structural operations never cross partitions
    let err = store.prepend_node(contact, about).unwrap_err();
    assert!(err.is_logical_error());
    assert_eq!(store.nodes(&Scope::all()).unwrap().len(), 3);
}

#[test]
fn test_payload_update_cannot_change_partition() {
    let (store, header, _footer) = setup_menus();
    let home = add(&header, None, "Home");

    let mut attributes = titled("Home");
    attributes.insert("menu_id".into(), serde_json::json!(2));
    let updated = store.update_attributes(home, attributes).unwrap();
    assert_eq!(updated.attribute("menu_id"), Some(&serde_json::json!(1)));
}
