//! Integration tests: edge validation and graph-model invariants
//!
//! Author: Moroya Sakamoto

mod common;

use alice_csg::prelude::*;
use common::*;
use std::rc::Rc;

#[test]
fn acyclic_graphs_pass_and_stay_untouched() {
    let root = test_complex_graph();
    assert!(!has_cycle(&root));

    // the check owns no persistent state: regeneration still works and a
    // second check agrees
    assert!(!has_cycle(&root));
    assert!(generate_sdf(&root).is_ok());
}

#[test]
fn back_edge_to_ancestor_is_rejected() {
    // root -> mid -> leaf_op; wiring root back under leaf_op must fail
    let leaf_op = Node::union_of(vec![Node::sphere()]);
    let mid = Node::union_of(vec![leaf_op.clone()]);
    let root = Node::union_of(vec![mid.clone()]);

    assert!(has_cycle_if_connected(&leaf_op, &root));
    assert!(has_cycle_if_connected(&leaf_op, &mid));

    // graph is structurally identical afterwards
    assert_eq!(leaf_op.borrow().as_operator().unwrap().input_count(), 1);
    assert!(!has_cycle(&root));
    assert!(generate_sdf(&root).is_ok());
}

#[test]
fn forward_edge_is_accepted() {
    let (root, shared) = test_shared_diamond();
    // a third consumer of the shared sphere is fine
    assert!(!has_cycle_if_connected(&root, &shared));
    assert_eq!(root.borrow().as_operator().unwrap().input_count(), 2);
}

#[test]
fn probe_edge_never_persists() {
    let root = test_csg();
    let candidate = Node::sphere();
    let before = root.borrow().as_operator().unwrap().input_count();

    assert!(!has_cycle_if_connected(&root, &candidate));
    assert!(has_cycle_if_connected(&root, &root));

    assert_eq!(root.borrow().as_operator().unwrap().input_count(), before);
    // and the generated shader is the same as if nothing happened
    let reference = generate_sdf(&test_csg()).unwrap();
    assert_eq!(generate_sdf(&root).unwrap(), reference);
}

#[test]
fn cloned_operator_shares_inputs_without_duplicating_them() {
    let root = test_csg();
    let copy = root.borrow().clone_node();

    let originals = root.borrow().as_operator().unwrap().inputs().to_vec();
    let copies = copy.borrow().as_operator().unwrap().inputs().to_vec();
    assert_eq!(originals.len(), copies.len());
    for (a, b) in originals.iter().zip(&copies) {
        assert!(Rc::ptr_eq(a, b));
    }

    // both roots generate the same code since they share structure
    assert_eq!(
        generate_sdf(&root).unwrap(),
        generate_sdf(&copy).unwrap()
    );
}

#[test]
fn registry_builds_usable_nodes() {
    let mut inputs = Vec::new();
    for name in PrimitiveKind::NAMES {
        inputs.push(Node::primitive(PrimitiveKind::from_name(name).unwrap()));
    }
    let root = Node::union_of(inputs);
    assert!(!has_cycle(&root));
    let glsl = generate_sdf(&root).unwrap();
    for prefix in ["r_sphere", "r_cube", "r_cylinder", "r_torus", "r_ellipsoid", "r_plane"] {
        assert!(glsl.contains(prefix), "{prefix} missing");
    }
}
