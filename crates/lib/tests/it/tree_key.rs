use nestree::MoveItem;
use nestree::helpers::tree_key;

use crate::helpers::*;

#[test]
fn test_key_is_stable_without_changes() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);

    assert_eq!(tree_key(&find(&scope, s.e)), tree_key(&find(&scope, s.e)));
    assert_eq!(tree_key(&find(&scope, s.a)), format!("{}.1.12.-1", s.a));
    assert_eq!(tree_key(&find(&scope, s.e)), format!("{}.3.4.{}", s.e, s.b));
}

#[test]
fn test_key_changes_when_the_node_moves() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let before = tree_key(&find(&scope, s.c));

    let node = find(&scope, s.c);
    MoveItem.apply(&scope, &node, Some(s.g), 1, 0).unwrap();
    assert_ne!(tree_key(&find(&scope, s.c)), before);
}

#[test]
fn test_key_changes_when_a_sibling_moves_past() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let before = tree_key(&find(&scope, s.d));

    // C and D swap, so D's interval shifts
    let node = find(&scope, s.d);
    MoveItem.apply(&scope, &node, Some(s.a), 2, 1).unwrap();
    assert_ne!(tree_key(&find(&scope, s.d)), before);
}
