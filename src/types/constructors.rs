//! Node constructors with editor defaults
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

use super::{Node, NodeRef, OperatorKind, OperatorNode, PrimitiveKind, PrimitiveNode};

impl Default for PrimitiveKind {
    fn default() -> Self {
        PrimitiveKind::Sphere
    }
}

impl Default for OperatorKind {
    fn default() -> Self {
        OperatorKind::Union
    }
}

impl Node {
    /// Create a primitive node of the given kind with the default local frame
    /// (no translation/rotation, scale 1, offset 0).
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> NodeRef {
        Rc::new(RefCell::new(Node::Primitive(PrimitiveNode {
            translate: Vec3::ZERO,
            rotate: Vec3::ZERO,
            scale: 1.0,
            offset: 0.0,
            kind,
        })))
    }

    /// Create an operator node of the given kind with no inputs and the
    /// default local frame.
    #[must_use]
    pub fn operator(kind: OperatorKind) -> NodeRef {
        Rc::new(RefCell::new(Node::Operator(OperatorNode {
            translate: Vec3::ZERO,
            rotate: Vec3::ZERO,
            scale: 1.0,
            offset: 0.0,
            kind,
            inputs: Vec::new(),
        })))
    }

    // === Primitive convenience constructors ===

    /// Unit sphere leaf.
    #[must_use]
    pub fn sphere() -> NodeRef {
        Node::primitive(PrimitiveKind::Sphere)
    }

    /// Box leaf with the given full edge lengths.
    #[must_use]
    pub fn box3d(width: f32, height: f32, depth: f32) -> NodeRef {
        Node::primitive(PrimitiveKind::Box {
            dimensions: Vec3::new(width, height, depth),
        })
    }

    /// Cylinder leaf along the Y axis.
    #[must_use]
    pub fn cylinder(radius: f32, height: f32) -> NodeRef {
        Node::primitive(PrimitiveKind::Cylinder { radius, height })
    }

    /// Torus leaf in the XZ plane.
    #[must_use]
    pub fn torus(major_radius: f32, minor_radius: f32) -> NodeRef {
        Node::primitive(PrimitiveKind::Torus {
            major_radius,
            minor_radius,
        })
    }

    /// Ellipsoid leaf with the given semi-axes.
    #[must_use]
    pub fn ellipsoid(radii: Vec3) -> NodeRef {
        Node::primitive(PrimitiveKind::Ellipsoid { radii })
    }

    /// Plane leaf. `normal` is normalized on construction.
    #[must_use]
    pub fn plane(normal: Vec3, h: f32) -> NodeRef {
        Node::primitive(PrimitiveKind::Plane {
            normal: normal.normalize(),
            h,
        })
    }

    // === Operator convenience constructors ===

    /// Union operator over the given inputs.
    #[must_use]
    pub fn union_of(inputs: Vec<NodeRef>) -> NodeRef {
        let node = Node::operator(OperatorKind::Union);
        node.borrow_mut().as_operator_mut().unwrap().set_inputs(inputs);
        node
    }

    /// Intersection operator over the given inputs.
    #[must_use]
    pub fn intersection_of(inputs: Vec<NodeRef>) -> NodeRef {
        let node = Node::operator(OperatorKind::Intersection);
        node.borrow_mut().as_operator_mut().unwrap().set_inputs(inputs);
        node
    }

    /// Subtraction operator: first input minus the rest.
    #[must_use]
    pub fn subtraction_of(inputs: Vec<NodeRef>) -> NodeRef {
        let node = Node::operator(OperatorKind::Subtraction);
        node.borrow_mut().as_operator_mut().unwrap().set_inputs(inputs);
        node
    }

    /// Smooth union of exactly two inputs with blend radius `k`.
    #[must_use]
    pub fn smooth_union_of(a: NodeRef, b: NodeRef, k: f32) -> NodeRef {
        let node = Node::operator(OperatorKind::SmoothUnion { k });
        node.borrow_mut()
            .as_operator_mut()
            .unwrap()
            .set_inputs(vec![a, b]);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_frame() {
        let n = Node::sphere();
        let n = n.borrow();
        assert_eq!(n.translate(), Vec3::ZERO);
        assert_eq!(n.rotate(), Vec3::ZERO);
        assert_eq!(n.scale(), 1.0);
        assert_eq!(n.offset(), 0.0);
    }

    #[test]
    fn plane_normal_is_normalized() {
        let n = Node::plane(Vec3::new(0.0, 2.0, 0.0), 0.5);
        let n = n.borrow();
        match &n.as_primitive().unwrap().kind {
            PrimitiveKind::Plane { normal, h } => {
                assert_eq!(*normal, Vec3::Y);
                assert_eq!(*h, 0.5);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }
}
