//! Common test helpers for ALICE-CSG integration tests
//!
//! Author: Moroya Sakamoto

use alice_csg::prelude::*;
use glam::Vec3;

// ============================================================================
// Standard test graphs
// ============================================================================

/// Single sphere leaf with the default frame
pub fn test_sphere() -> NodeRef {
    Node::sphere()
}

/// Union of a sphere and a translated box
pub fn test_csg() -> NodeRef {
    let cut = Node::box3d(1.0, 1.0, 1.0);
    cut.borrow_mut().as_primitive_mut().unwrap().translate = Vec3::new(0.5, 0.0, 0.0);
    Node::union_of(vec![Node::sphere(), cut])
}

/// Multi-operation graph touching every operator family
pub fn test_complex_graph() -> NodeRef {
    let blend = Node::smooth_union_of(Node::sphere(), Node::torus(0.4, 0.1), 0.25);
    let carved = Node::subtraction_of(vec![Node::box3d(1.0, 2.0, 1.0), Node::cylinder(0.5, 1.0)]);
    Node::intersection_of(vec![blend, carved])
}

/// Diamond: one sphere wired into two unions, both feeding the root
pub fn test_shared_diamond() -> (NodeRef, NodeRef) {
    let shared = Node::sphere();
    let left = Node::union_of(vec![shared.clone(), Node::torus(0.4, 0.1)]);
    let right = Node::union_of(vec![shared.clone(), Node::box3d(1.0, 1.0, 1.0)]);
    (Node::union_of(vec![left, right]), shared)
}

/// Count assignments into register variables ("varN = ...")
pub fn count_register_assignments(glsl: &str) -> usize {
    glsl.lines()
        .filter(|l| {
            l.starts_with("var")
                && l.as_bytes()
                    .get(3)
                    .is_some_and(|b| b.is_ascii_digit())
        })
        .count()
}
