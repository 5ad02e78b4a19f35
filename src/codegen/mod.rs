//! Graph-to-GLSL code generation
//!
//! Two symmetric generators lower the CSG graph into GLSL: [`scalar`]
//! produces the plain-float `sdf` function, [`dual`] the dual-number `dsdf`
//! variant carrying partial derivatives. Both share the traversal helpers
//! here: transform composition, operator/primitive expression emission, and
//! the per-traversal use counting that makes shared sub-DAGs generate once.
//!
//! Author: Moroya Sakamoto

use glam::{Mat4, Vec3, Vec4};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::types::{node_id, Node, NodeId, NodeRef, OperatorKind, PrimitiveKind};

pub mod dual;
pub mod scalar;

pub use dual::generate_dual_sdf;
pub use scalar::generate_sdf;

/// Why a generation failed. These are the only recoverable failures; the
/// editor aborts the whole generation and highlights the offending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenReason {
    /// An operator node has an empty input list.
    #[error("operator node has no inputs")]
    OperatorHasNoInputs,
    /// A smooth operator was wired with an input count other than two.
    #[error("smooth operator needs exactly two inputs")]
    SmoothOperatorNeedsTwoInputs,
}

/// Structured code-generation error carrying the offending node, so the
/// editor can focus and highlight it.
#[derive(Debug, Clone, Error)]
#[error("shader generation failed: {reason}")]
pub struct GenError {
    /// What went wrong.
    pub reason: GenReason,
    /// The node that caused it.
    pub node: NodeRef,
}

/// Local transform of `node`: translate, then Euler Z·Y·X rotation in
/// degrees. Operators fold their uniform scale into the matrix; primitives
/// divide the sample coordinate by scale instead, so they pass
/// `with_scale = false`.
pub(crate) fn local_matrix(node: &Node, with_scale: bool) -> Mat4 {
    let r = node.rotate();
    let mut m = Mat4::from_translation(node.translate())
        * Mat4::from_rotation_z(r.z.to_radians())
        * Mat4::from_rotation_y(r.y.to_radians())
        * Mat4::from_rotation_x(r.x.to_radians());
    if with_scale {
        m *= Mat4::from_scale(Vec3::splat(node.scale()));
    }
    m
}

pub(crate) fn glsl_vec3(v: Vec3) -> String {
    format!("vec3({},{},{})", v.x, v.y, v.z)
}

pub(crate) fn glsl_vec4(v: Vec4) -> String {
    format!("vec4({}, {}, {}, {})", v.x, v.y, v.z, v.w)
}

/// GLSL call expression evaluating `kind` at `coord`, without the
/// real/dual prefix (the generators prepend the `_TEMPLATE_` token).
pub(crate) fn primitive_call(kind: &PrimitiveKind, coord: &str) -> String {
    match kind {
        PrimitiveKind::Sphere => format!("sphere(0.5, {coord})"),
        PrimitiveKind::Box { dimensions } => {
            format!("cube({}, {coord})", glsl_vec3(*dimensions * 0.5))
        }
        PrimitiveKind::Cylinder { radius, height } => {
            format!("cylinder({radius}, {height}, {coord})")
        }
        PrimitiveKind::Torus {
            major_radius,
            minor_radius,
        } => format!("torus({major_radius}, {minor_radius}, {coord})"),
        PrimitiveKind::Ellipsoid { radii } => {
            format!("ellipsoid({}, {coord})", glsl_vec3(*radii))
        }
        PrimitiveKind::Plane { normal, h } => {
            format!("plane({}, {h}, {coord})", glsl_vec3(*normal))
        }
    }
}

fn nested_binary(func: &str, regs: &[String], negate_rest: bool) -> String {
    let mut expr = String::new();
    for _ in 0..regs.len() - 1 {
        expr.push_str(func);
        expr.push('(');
    }
    expr.push_str(&regs[0]);
    for reg in &regs[1..] {
        if negate_rest {
            expr.push_str(", _neg_(");
            expr.push_str(reg);
            expr.push_str("))");
        } else {
            expr.push_str(", ");
            expr.push_str(reg);
            expr.push(')');
        }
    }
    expr
}

/// GLSL expression combining the named input registers under `kind`, in
/// placeholder-token form (`_dmin_`, `_neg_`, `_TEMPLATE_smooth_union`, ...).
///
/// N-ary min/max operators nest binary calls left to right; smooth variants
/// require exactly two inputs.
pub(crate) fn combine_expr(kind: &OperatorKind, regs: &[String]) -> Result<String, GenReason> {
    if kind.is_smooth() && regs.len() != 2 {
        return Err(GenReason::SmoothOperatorNeedsTwoInputs);
    }
    Ok(match kind {
        OperatorKind::Union => nested_binary("_dmin_", regs, false),
        OperatorKind::Intersection => nested_binary("_dmax_", regs, false),
        OperatorKind::Subtraction => nested_binary("_dmax_", regs, true),
        OperatorKind::SmoothUnion { k } => {
            format!("_TEMPLATE_smooth_union({}, {}, {k})", regs[0], regs[1])
        }
        OperatorKind::SmoothIntersection { k } => {
            format!("_TEMPLATE_smooth_intersection({}, {}, {k})", regs[0], regs[1])
        }
        OperatorKind::SmoothSubtraction { k } => {
            format!("_TEMPLATE_smooth_subtraction({}, {}, {k})", regs[0], regs[1])
        }
    })
}

/// Count, per node, how many consuming references the traversal from `root`
/// will make: one per input edge from each distinct operator, plus one for
/// the root's final `return`. Shared nodes are generated once and their
/// register is freed only when this count drains to zero.
pub(crate) fn count_uses(root: &NodeRef) -> HashMap<NodeId, usize> {
    let mut uses: HashMap<NodeId, usize> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    uses.insert(node_id(root), 1);
    walk(root, &mut uses, &mut visited);
    uses
}

fn walk(node: &NodeRef, uses: &mut HashMap<NodeId, usize>, visited: &mut HashSet<NodeId>) {
    if !visited.insert(node_id(node)) {
        return;
    }
    let inputs = match &*node.borrow() {
        Node::Primitive(_) => return,
        Node::Operator(op) => op.inputs().to_vec(),
    };
    for input in &inputs {
        *uses.entry(node_id(input)).or_insert(0) += 1;
        walk(input, uses, visited);
    }
}
