use nestree::page::TreeEvent;
use nestree::{TreeConfig, TreeDefinition, TreePage, TreeScope};
use serde_json::json;
use std::sync::Arc;

use super::page;
use crate::helpers::*;

#[test]
fn test_create_appends_and_marks_tree_stale() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let (node, response) = page.create_node(Some(s.b), titled("X")).unwrap();
    assert_eq!(response.events, vec![TreeEvent::Updated]);
    assert_eq!(response.notification.unwrap().title, "Item created");
    assert_eq!(children(&scope, Some(s.b)), vec![s.e, s.f, node.id]);
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_prescoped_create_stamps_the_scope() {
    let (_store, header, footer) = setup_menus();
    add(&header, None, "Home");
    let page = page(footer.clone(), TreeConfig::default());

    let (node, _) = page.create_node(None, titled("Contact")).unwrap();
    assert_eq!(node.attribute("menu_id"), Some(&json!(2)));
    assert_eq!(children(&footer, None), vec![node.id]);
    assert_eq!(children(&header, None).len(), 1);
}

#[test]
fn test_edit_reparents_and_refreshes_both_parents() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let (saved, response) = page.edit_node(s.c, titled("C2"), Some(s.g)).unwrap();
    assert_eq!(saved.parent_id, Some(s.g));
    assert_eq!(saved.attribute_text("title"), "C2");
    assert_eq!(
        response.events,
        vec![TreeEvent::Refresh(s.a), TreeEvent::Refresh(s.g)]
    );
    assert_eq!(response.notification.unwrap().title, "Item saved");
    assert_eq!(children(&scope, Some(s.g)), vec![s.h, s.c]);
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_edit_to_root() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let (saved, response) = page.edit_node(s.b, titled("B"), None).unwrap();
    assert!(saved.is_root());
    assert_eq!(response.events, vec![TreeEvent::Refresh(s.a), TreeEvent::Updated]);
    assert_eq!(children(&scope, None), vec![s.a, s.g, s.b]);
    assert_eq!(children(&scope, Some(s.b)), vec![s.e, s.f]);

    // Root stays root: only the roots are stale
    let (_, response) = page.edit_node(s.g, titled("G2"), None).unwrap();
    assert_eq!(response.events, vec![TreeEvent::Updated]);
}

#[test]
fn test_edit_rejects_parent_inside_own_subtree() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());
    let before = snapshot(&scope);

    for parent in [s.b, s.e, s.f] {
        let err = page.edit_node(s.b, titled("B2"), Some(parent)).unwrap_err();
        assert!(err.is_operation_rejected(), "parent {parent}");
    }
    assert_eq!(snapshot(&scope), before);
}

#[test]
fn test_edit_without_parent_select_keeps_structure() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let config = TreeConfig {
        show_parent_select_while_edit: false,
        ..TreeConfig::default()
    };
    let page = page(scope.clone(), config);

    let (saved, response) = page.edit_node(s.c, titled("C2"), Some(s.g)).unwrap();
    assert_eq!(saved.parent_id, Some(s.a));
    assert_eq!(saved.attribute_text("title"), "C2");
    assert!(response.events.is_empty());
    assert!(response.is_success());
}

#[test]
fn test_edit_keeps_node_in_its_menu() {
    let (_store, header, footer) = setup_menus();
    let contact = add(&footer, None, "Contact");
    let page = page(footer.clone(), TreeConfig::default());

    let mut attributes = titled("Contact us");
    attributes.insert("menu_id".into(), json!(1));
    let (saved, _) = page.edit_node(contact, attributes, None).unwrap();
    assert_eq!(saved.attribute("menu_id"), Some(&json!(2)));
    assert!(header.nodes().unwrap().is_empty());
}

#[test]
fn test_delete_follows_configuration() {
    let cases = [
        // (allow parent, allow root, leaf, inner parent, root parent)
        (false, false, true, false, false),
        (true, false, true, true, false),
        (false, true, true, false, false),
        (true, true, true, true, true),
    ];

    for (allow_parent, allow_root, leaf, inner, root) in cases {
        let (_store, scope) = setup();
        let s = build_sample(&scope);
        let config = TreeConfig {
            allow_delete_parent: allow_parent,
            allow_delete_root: allow_root,
            ..TreeConfig::default()
        };
        let page = page(scope.clone(), config);

        let label = format!("parent={allow_parent} root={allow_root}");
        assert_eq!(page.can_be_deleted(&find(&scope, s.d)).unwrap(), leaf, "{label}");
        assert_eq!(page.can_be_deleted(&find(&scope, s.b)).unwrap(), inner, "{label}");
        assert_eq!(page.can_be_deleted(&find(&scope, s.a)).unwrap(), root, "{label}");
    }
}

#[test]
fn test_delete_removes_subtree() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let lonely = add(&scope, None, "Z");
    let page = page(scope.clone(), TreeConfig::default());

    // A childless root is just a leaf
    page.delete_node(lonely).unwrap();

    let err = page.delete_node(s.b).unwrap_err();
    assert!(err.is_operation_rejected());
    assert_eq!(err.to_string(), "Cannot delete tree node.");

    let config = TreeConfig {
        allow_delete_parent: true,
        ..TreeConfig::default()
    };
    let page = super::page(scope.clone(), config);
    let response = page.delete_node(s.b).unwrap();
    assert_eq!(response.events, vec![TreeEvent::Updated]);
    assert_eq!(response.notification.unwrap().title, "Item deleted");
    assert_eq!(snapshot(&scope).len(), 5);
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_tree_view_nests_rows() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let tree = page.tree().unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].title, "A");
    assert_eq!(tree[0].row_count(), 6);
    assert_eq!(tree[1].row_count(), 2);
    let b = &tree[0].children[0];
    assert_eq!(b.title, "B");
    assert_eq!(b.children.iter().map(|c| c.node.id).collect::<Vec<_>>(), vec![s.e, s.f]);
    assert!(tree.iter().all(|branch| branch.collapsed));

    assert!(!page.toggle_collapsed(s.a));
    assert!(!page.is_collapsed(s.a));
    assert!(!page.tree().unwrap()[0].collapsed);
    assert!(page.toggle_collapsed(s.a));
}

#[test]
fn test_captions_come_from_the_definition() {
    let (_store, scope) = setup();
    let mut attributes = titled("Home");
    attributes.insert("url".into(), json!("/"));
    scope.create(None, attributes).unwrap();
    add(&scope, None, "Blank");

    let page = TreePage::new(
        Arc::new(scope),
        TreeDefinition::new("title").with_caption("url"),
        TreeConfig::default(),
        Arc::new(nestree::page::InMemoryUiState::new()),
    )
    .unwrap();
    let tree = page.tree().unwrap();
    assert_eq!(tree[0].caption.as_deref(), Some("/"));
    assert_eq!(tree[1].caption, None);
}

#[test]
fn test_invalid_definitions_are_refused() {
    let (_store, header, _footer) = setup_menus();

    for definition in [TreeDefinition::new(""), TreeDefinition::new("menu_id")] {
        let result = TreePage::new(
            Arc::new(header.clone()),
            definition,
            TreeConfig::default(),
            Arc::new(nestree::page::InMemoryUiState::new()),
        );
        let err = result.err().unwrap();
        assert!(err.is_invalid_model());
    }
}
