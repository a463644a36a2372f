use nestree::page::{NodeMoved, NotificationLevel, TreeEvent};
use nestree::{NodeId, TreeConfig};

use super::page;
use crate::helpers::*;

fn moved(id: NodeId, ancestor: &str, parent: &str, from: usize, to: usize) -> NodeMoved {
    NodeMoved {
        id,
        ancestor: Some(ancestor.to_string()),
        parent: Some(parent.to_string()),
        from,
        to,
    }
}

#[test]
fn test_move_between_parents_refreshes_both() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let response = page
        .on_node_moved(moved(s.c, &s.a.to_string(), &s.g.to_string(), 1, 0))
        .unwrap();
    assert_eq!(
        response.events,
        vec![TreeEvent::Refresh(s.c), TreeEvent::Refresh(s.a), TreeEvent::Refresh(s.g)]
    );
    assert!(response.is_success());
    assert_eq!(response.notification.unwrap().title, "Item moved");
    assert_eq!(children(&scope, Some(s.g)), vec![s.c, s.h]);
}

#[test]
fn test_move_to_root_marks_roots_stale() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let response = page
        .on_node_moved(moved(s.h, &s.g.to_string(), "", 0, 0))
        .unwrap();
    assert_eq!(
        response.events,
        vec![TreeEvent::Refresh(s.h), TreeEvent::Refresh(s.g), TreeEvent::Updated]
    );
    assert_eq!(children(&scope, None), vec![s.h, s.a, s.g]);
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_reorder_among_roots() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let response = page
        .on_node_moved(NodeMoved {
            id: s.g,
            ancestor: None,
            parent: None,
            from: 1,
            to: 0,
        })
        .unwrap();
    assert_eq!(response.events, vec![TreeEvent::Refresh(s.g), TreeEvent::Updated]);
    assert_eq!(children(&scope, None), vec![s.g, s.a]);
}

#[test]
fn test_rejected_move_is_a_danger_notification() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());
    let before = snapshot(&scope);

    let response = page
        .on_node_moved(moved(s.b, &s.a.to_string(), &s.e.to_string(), 0, 0))
        .unwrap();
    assert!(response.events.is_empty());
    let notification = response.notification.unwrap();
    assert_eq!(notification.level, NotificationLevel::Danger);
    assert!(!notification.title.is_empty());
    assert_eq!(snapshot(&scope), before);
}

#[test]
fn test_move_of_unknown_node_is_an_error() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let page = page(scope.clone(), TreeConfig::default());

    let err = page
        .on_node_moved(moved(NodeId::new(999_999), "", "", 0, 1))
        .unwrap_err();
    assert!(err.is_not_found());

    let err = page
        .on_node_moved(moved(s.c, &s.a.to_string(), "999999", 1, 0))
        .unwrap_err();
    assert!(err.is_not_found());

    let err = page
        .on_node_moved(moved(s.c, "A", "", 1, 0))
        .unwrap_err();
    assert!(err.is_operation_rejected());
}

#[test]
fn test_fix_tree_reports_update_first() {
    let (store, scope) = setup();
    let s = build_sample(&scope);
    store.corrupt_bounds(s.c, 40, 30).unwrap();
    let page = page(scope.clone(), TreeConfig::default());

    let response = page.on_fix_tree_requested();
    assert_eq!(response.events, vec![TreeEvent::Updated]);
    assert!(response.is_success());
    assert_eq!(response.notification.unwrap().title, "Tree fixed");
    assert_invariants(&snapshot(&scope));
}

#[test]
fn test_prescoped_page_moves_within_its_menu() {
    let (_store, header, footer) = setup_menus();
    let home = add(&header, None, "Home");
    let about = add(&header, None, "About");
    let contact = add(&footer, None, "Contact");
    let page = page(header.clone(), TreeConfig::default());

    page.on_node_moved(moved(about, "", &home.to_string(), 1, 0))
        .unwrap();
    assert_eq!(children(&header, Some(home)), vec![about]);

    let err = page
        .on_node_moved(moved(contact, "", "", 0, 1))
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(children(&footer, None), vec![contact]);
}
