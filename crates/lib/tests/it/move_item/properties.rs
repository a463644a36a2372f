//! Properties of MoveItem checked over every position of small trees.

use nestree::{MoveItem, NodeId, TreeScope, UnscopedTreeScope};

use crate::helpers::*;

/// A root `P` with `count` children, returned in sibling order.
fn siblings(scope: &UnscopedTreeScope, count: usize) -> (NodeId, Vec<NodeId>) {
    let parent = add(scope, None, "P");
    let children = (0..count)
        .map(|i| {
            let child = add(scope, Some(parent), &format!("c{i}"));
            // Give every child a subtree so intervals are not trivial
            add(scope, Some(child), &format!("c{i}.0"));
            child
        })
        .collect();
    (parent, children)
}

#[test]
fn test_reorder_to_same_position_is_noop() {
    for k in 0..4 {
        let (_store, scope) = setup();
        let (parent, kids) = siblings(&scope, 4);
        let before = snapshot(&scope);

        let node = find(&scope, kids[k]);
        MoveItem.apply(&scope, &node, Some(parent), k, k).unwrap();
        assert_eq!(snapshot(&scope), before, "position {k}");
    }
}

#[test]
fn test_reorder_lands_on_target_and_is_reversible() {
    for from in 0..4 {
        for to in 0..4 {
            let (_store, scope) = setup();
            let (parent, kids) = siblings(&scope, 4);
            let original = children(&scope, Some(parent));

            let node = find(&scope, kids[from]);
            MoveItem.apply(&scope, &node, Some(parent), from, to).unwrap();
            assert_eq!(scope.position(kids[from]).unwrap(), to, "{from} -> {to}");
            assert_invariants(&snapshot(&scope));

            let node = find(&scope, kids[from]);
            MoveItem.apply(&scope, &node, Some(parent), to, from).unwrap();
            assert_eq!(children(&scope, Some(parent)), original, "{from} -> {to} -> {from}");
        }
    }
}

#[test]
fn test_root_move_position() {
    // Three existing roots plus the moved node
    for p in 0..4 {
        let (_store, scope) = setup();
        let (parent, kids) = siblings(&scope, 2);
        add(&scope, None, "R1");
        add(&scope, None, "R2");
        let moved = kids[1];

        let node = find(&scope, moved);
        MoveItem.apply(&scope, &node, None, 1, p).unwrap();

        let roots = children(&scope, None);
        assert_eq!(roots.len(), 4);
        assert_eq!(roots.iter().position(|id| *id == moved), Some(p), "position {p}");
        assert!(find(&scope, moved).is_root());
        assert_eq!(children(&scope, Some(parent)), vec![kids[0]]);
        assert_invariants(&snapshot(&scope));
    }
}

#[test]
fn test_reparent_depth() {
    for to in 0..3 {
        let (_store, scope) = setup();
        let s = build_sample(&scope);
        // Deepen the target: G > H > I
        let i = add(&scope, Some(s.h), "I");
        add(&scope, Some(i), "J");
        add(&scope, Some(i), "K");

        let node = find(&scope, s.b);
        MoveItem.apply(&scope, &node, Some(i), 0, to).unwrap();

        let target_depth = find(&scope, i).depth;
        assert_eq!(find(&scope, s.b).depth, target_depth + 1);
        assert_eq!(find(&scope, s.e).depth, target_depth + 2);
        assert_eq!(find(&scope, s.f).depth, target_depth + 2);
        assert_eq!(scope.position(s.b).unwrap(), to);
        assert_invariants(&snapshot(&scope));
    }
}

#[test]
fn test_invariants_hold_across_a_sequence_of_moves() {
    let (_store, scope) = setup();
    let s = build_sample(&scope);
    let ids = [s.a, s.b, s.c, s.d, s.e, s.f, s.g, s.h];

    // Deterministic pseudo-random walk
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = |bound: usize| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % bound as u64) as usize
    };

    for _ in 0..200 {
        let node = find(&scope, ids[next(ids.len())]);
        let parent = match next(ids.len() + 1) {
            0 => None,
            i => Some(ids[i - 1]),
        };
        let from = scope.position(node.id).unwrap();
        let to = next(4);

        match MoveItem.apply(&scope, &node, parent, from, to) {
            Ok(_) => {}
            Err(err) => assert!(err.is_logical_error(), "unexpected error: {err}"),
        }
        assert_invariants(&snapshot(&scope));
    }
}
