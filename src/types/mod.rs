//! Core types for ALICE-CSG
//!
//! Defines the editable CSG node graph: primitive leaves, operator interior
//! nodes, and the shared-ownership references connecting them. The graph is a
//! DAG (a node may feed several operators); acyclicity is enforced by the
//! editor through [`crate::cycle`] before any connection is committed.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

mod constructors;
mod registry;

/// Shared, mutable reference to a graph node.
///
/// The editor owns the graph single-threaded; interior mutability lets it
/// rewire inputs in place while other parts of the graph hold references.
pub type NodeRef = Rc<RefCell<Node>>;

/// Identity of a node for traversal-scoped side tables.
///
/// Derived from the allocation address of the shared cell, so two `NodeRef`
/// clones of the same node compare equal. Only meaningful while the node is
/// alive; side tables never outlive the traversal that built them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Identity key for `node` (see [`NodeId`]).
pub fn node_id(node: &NodeRef) -> NodeId {
    NodeId(Rc::as_ptr(node) as usize)
}

/// Leaf geometry kinds with their kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Unit sphere (fixed radius 0.5, sized via the node's `scale`)
    Sphere,
    /// Axis-aligned box
    Box {
        /// Full edge lengths along each axis
        dimensions: Vec3,
    },
    /// Y-axis cylinder
    Cylinder {
        /// Cylinder radius
        radius: f32,
        /// Full cylinder height
        height: f32,
    },
    /// Torus in the XZ plane
    Torus {
        /// Distance from center to tube center
        major_radius: f32,
        /// Tube radius
        minor_radius: f32,
    },
    /// Axis-aligned ellipsoid
    Ellipsoid {
        /// Semi-axis lengths
        radii: Vec3,
    },
    /// Half-space below a plane
    Plane {
        /// Plane normal (expected normalized)
        normal: Vec3,
        /// Signed distance of the plane from the origin
        h: f32,
    },
}

/// Boolean and blending operator kinds.
///
/// Non-smooth operators accept one or more inputs; smooth variants require
/// exactly two at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperatorKind {
    /// min(a, b, ...)
    Union,
    /// max(a, b, ...)
    Intersection,
    /// max(a, -b, ...)
    Subtraction,
    /// Polynomial smooth min
    SmoothUnion {
        /// Blend radius
        k: f32,
    },
    /// Polynomial smooth max
    SmoothIntersection {
        /// Blend radius
        k: f32,
    },
    /// Smooth subtraction
    SmoothSubtraction {
        /// Blend radius
        k: f32,
    },
}

// IMPORTANT: don't forget to update clone_node for added fields (PrimitiveNode, OperatorNode)

/// Leaf node: a primitive shape with its local frame.
#[derive(Debug, Clone)]
pub struct PrimitiveNode {
    /// Translation of the local frame
    pub translate: Vec3,
    /// Rotation in Euler angles, degrees, applied Z then Y then X
    pub rotate: Vec3,
    /// Uniform scale (> 0 expected)
    pub scale: f32,
    /// Round/shell offset subtracted from the distance
    pub offset: f32,
    /// Which primitive this leaf evaluates
    pub kind: PrimitiveKind,
}

/// Interior node: an operator combining an ordered list of inputs.
#[derive(Debug, Clone)]
pub struct OperatorNode {
    /// Translation of the local frame
    pub translate: Vec3,
    /// Rotation in Euler angles, degrees, applied Z then Y then X
    pub rotate: Vec3,
    /// Uniform scale (> 0 expected)
    pub scale: f32,
    /// Round/shell offset subtracted from the combined distance
    pub offset: f32,
    /// Which operator combines the inputs
    pub kind: OperatorKind,
    inputs: Vec<NodeRef>,
}

/// A node in the CSG graph.
#[derive(Debug, Clone)]
pub enum Node {
    /// Leaf shape
    Primitive(PrimitiveNode),
    /// Operator over inputs
    Operator(OperatorNode),
}

impl OperatorNode {
    /// Ordered input list.
    pub fn inputs(&self) -> &[NodeRef] {
        &self.inputs
    }

    /// First input, if any. The generators reuse its register as this
    /// operator's output slot.
    pub fn first_input(&self) -> Option<&NodeRef> {
        self.inputs.first()
    }

    /// Number of wired inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Append an input at the end of the ordered list.
    pub fn add_input(&mut self, node: NodeRef) {
        self.inputs.push(node);
    }

    /// Remove the most recently added input. Used to roll back the temporary
    /// edge of [`crate::cycle::has_cycle_if_connected`].
    pub fn remove_last_input(&mut self) -> Option<NodeRef> {
        self.inputs.pop()
    }

    /// Remove the first input that is the same node as `node` (pointer
    /// identity). Returns false if `node` is not an input.
    pub fn remove_input(&mut self, node: &NodeRef) -> bool {
        match self.inputs.iter().position(|i| Rc::ptr_eq(i, node)) {
            Some(idx) => {
                self.inputs.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Replace the whole input list.
    pub fn set_inputs(&mut self, inputs: Vec<NodeRef>) {
        self.inputs = inputs;
    }

    /// Disconnect all inputs.
    pub fn clear_inputs(&mut self) {
        self.inputs.clear();
    }
}

impl Node {
    /// Local-frame translation.
    pub fn translate(&self) -> Vec3 {
        match self {
            Node::Primitive(p) => p.translate,
            Node::Operator(o) => o.translate,
        }
    }

    /// Local-frame rotation (Euler degrees, Z·Y·X).
    pub fn rotate(&self) -> Vec3 {
        match self {
            Node::Primitive(p) => p.rotate,
            Node::Operator(o) => o.rotate,
        }
    }

    /// Uniform local scale.
    pub fn scale(&self) -> f32 {
        match self {
            Node::Primitive(p) => p.scale,
            Node::Operator(o) => o.scale,
        }
    }

    /// Round/shell offset.
    pub fn offset(&self) -> f32 {
        match self {
            Node::Primitive(p) => p.offset,
            Node::Operator(o) => o.offset,
        }
    }

    /// Operator view of this node, if it is one.
    pub fn as_operator(&self) -> Option<&OperatorNode> {
        match self {
            Node::Operator(o) => Some(o),
            Node::Primitive(_) => None,
        }
    }

    /// Mutable operator view of this node, if it is one.
    pub fn as_operator_mut(&mut self) -> Option<&mut OperatorNode> {
        match self {
            Node::Operator(o) => Some(o),
            Node::Primitive(_) => None,
        }
    }

    /// Primitive view of this node, if it is one.
    pub fn as_primitive(&self) -> Option<&PrimitiveNode> {
        match self {
            Node::Primitive(p) => Some(p),
            Node::Operator(_) => None,
        }
    }

    /// Mutable primitive view of this node, if it is one.
    pub fn as_primitive_mut(&mut self) -> Option<&mut PrimitiveNode> {
        match self {
            Node::Primitive(p) => Some(p),
            Node::Operator(_) => None,
        }
    }

    /// Duplicate this node into a fresh shared cell.
    ///
    /// Copies every kind-specific field. Shallow over the input list: the
    /// clone references the same input nodes. Duplicating a whole subgraph is
    /// the editor's copy/paste concern, not the graph model's.
    pub fn clone_node(&self) -> NodeRef {
        let copy = match self {
            Node::Primitive(p) => Node::Primitive(PrimitiveNode {
                translate: p.translate,
                rotate: p.rotate,
                scale: p.scale,
                offset: p.offset,
                kind: p.kind.clone(),
            }),
            Node::Operator(o) => Node::Operator(OperatorNode {
                translate: o.translate,
                rotate: o.rotate,
                scale: o.scale,
                offset: o.offset,
                kind: o.kind.clone(),
                inputs: o.inputs.clone(),
            }),
        };
        Rc::new(RefCell::new(copy))
    }
}
