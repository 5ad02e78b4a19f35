//! Scalar SDF generator: graph → `float sdf(vec3 pos)` GLSL
//!
//! Depth-first traversal with an accumulated transform stack. Primitives
//! materialize their inverse transform, sample the shape in its local frame
//! and store the distance into an allocated register variable; operators
//! combine their inputs' registers and reuse the first input's register as
//! their own output slot. A node wired into several operators is generated
//! exactly once; later consumers reuse its register, which is returned to
//! the free-list only when the last consumer is done.
//!
//! Author: Moroya Sakamoto

use glam::Mat4;
use std::collections::HashMap;
use std::fmt::Write;

use crate::registers::RegisterAllocator;
use crate::shaderlib::{substitute, Flavor};
use crate::types::{node_id, Node, NodeId, NodeRef};

use super::{
    combine_expr, count_uses, glsl_vec4, local_matrix, primitive_call, GenError, GenReason,
};

const REG_PREFIX: &str = "var";
const SAMPLE_COORD: &str = "pos";
const TRANSF_COORD: &str = "posTransf";
const INV_NAME: &str = "inv";

/// Generate the scalar distance function for the graph rooted at `root`.
///
/// Output defines `float sdf(vec3 pos)`, already run through the real-variant
/// library substitution. Deterministic: the same unchanged graph yields
/// byte-identical text. On error no partial output is produced and no state
/// survives the call.
pub fn generate_sdf(root: &NodeRef) -> Result<String, GenError> {
    generate(root).map(|(glsl, _)| glsl)
}

/// Like [`generate_sdf`], but hands back the register allocator so the
/// allocate/free bookkeeping stays observable.
pub(crate) fn generate(root: &NodeRef) -> Result<(String, RegisterAllocator), GenError> {
    let mut gen = SdfGenerator::new(root);
    writeln!(gen.code, "float sdf(vec3 {SAMPLE_COORD}) {{").unwrap();
    let reg = gen.visit(root)?;
    writeln!(gen.code, "return {REG_PREFIX}{reg};").unwrap();
    gen.code.push_str("}\n");
    Ok((substitute(&gen.code, Flavor::Real), gen.registers))
}

struct SdfGenerator {
    code: String,
    registers: RegisterAllocator,
    transforms: Vec<Mat4>,
    /// Registers whose GLSL variable has been declared. A recycled id reuses
    /// its declaration; a fresh id declares once, globally.
    declared: usize,
    created_shared_decls: bool,
    /// Memoized output register per generated node.
    results: HashMap<NodeId, usize>,
    /// Remaining consumers per node, from the pre-pass.
    uses: HashMap<NodeId, usize>,
}

impl SdfGenerator {
    fn new(root: &NodeRef) -> Self {
        SdfGenerator {
            code: String::new(),
            registers: RegisterAllocator::new(),
            transforms: vec![Mat4::IDENTITY],
            declared: 0,
            created_shared_decls: false,
            results: HashMap::new(),
            uses: count_uses(root),
        }
    }

    fn visit(&mut self, node: &NodeRef) -> Result<usize, GenError> {
        let id = node_id(node);
        if let Some(&reg) = self.results.get(&id) {
            // shared node: already generated on another path
            return Ok(reg);
        }
        let reg = match &*node.borrow() {
            Node::Primitive(_) => self.visit_primitive(node),
            Node::Operator(_) => return self.visit_operator(node),
        };
        self.results.insert(id, reg);
        Ok(reg)
    }

    fn visit_primitive(&mut self, node: &NodeRef) -> usize {
        let n = node.borrow();
        let prim = n.as_primitive().expect("primitive node");
        let reg = self.registers.allocate();

        // move the sampling point instead of the primitive
        let transform =
            *self.transforms.last().expect("transform stack seeded") * local_matrix(&n, false);
        let inv = transform.inverse();

        if !self.created_shared_decls {
            writeln!(self.code, "mat4 {INV_NAME};").unwrap();
            writeln!(self.code, "vec3 {TRANSF_COORD};").unwrap();
            self.created_shared_decls = true;
        }
        for i in 0..4 {
            writeln!(self.code, "{INV_NAME}[{i}] = {};", glsl_vec4(inv.col(i))).unwrap();
        }
        writeln!(
            self.code,
            "{TRANSF_COORD} = ({INV_NAME} * vec4({SAMPLE_COORD},1)).xyz / {};",
            prim.scale
        )
        .unwrap();

        if reg == self.declared {
            self.declared += 1;
            writeln!(self.code, "float {REG_PREFIX}{reg};").unwrap();
        }

        let call = primitive_call(&prim.kind, TRANSF_COORD);
        write!(self.code, "{REG_PREFIX}{reg} = (_TEMPLATE_{call}").unwrap();
        if prim.offset != 0.0 {
            write!(self.code, " - {}", prim.offset).unwrap();
        }
        writeln!(self.code, ") * {};", prim.scale).unwrap();
        reg
    }

    fn visit_operator(&mut self, node: &NodeRef) -> Result<usize, GenError> {
        let (kind, inputs, scale, offset, local) = {
            let n = node.borrow();
            let op = n.as_operator().expect("operator node");
            if op.input_count() < 1 {
                return Err(GenError {
                    reason: GenReason::OperatorHasNoInputs,
                    node: node.clone(),
                });
            }
            (
                op.kind.clone(),
                op.inputs().to_vec(),
                op.scale,
                op.offset,
                local_matrix(&n, true),
            )
        };

        let top = *self.transforms.last().expect("transform stack seeded");
        self.transforms.push(top * local);
        let mut input_regs = Vec::with_capacity(inputs.len());
        for input in &inputs {
            input_regs.push(self.visit(input)?);
        }
        self.transforms.pop();

        for input in &inputs {
            let count = self
                .uses
                .get_mut(&node_id(input))
                .expect("input counted in pre-pass");
            *count -= 1;
        }

        let reg_names: Vec<String> = input_regs
            .iter()
            .map(|r| format!("{REG_PREFIX}{r}"))
            .collect();
        let expr = combine_expr(&kind, &reg_names).map_err(|reason| GenError {
            reason,
            node: node.clone(),
        })?;

        // reuse the first input's register unless another consumer still needs it
        let first_id = node_id(&inputs[0]);
        let reg = if self.uses[&first_id] == 0 {
            input_regs[0]
        } else {
            self.registers.allocate()
        };
        if reg == self.declared {
            // fresh register (only possible when the first input is shared)
            self.declared += 1;
            writeln!(self.code, "float {REG_PREFIX}{reg};").unwrap();
        }

        write!(self.code, "{REG_PREFIX}{reg} = ({expr}) * {scale}").unwrap();
        if offset != 0.0 {
            write!(self.code, " - {offset}").unwrap();
        }
        self.code.push_str(";\n");

        // release exhausted input registers, keeping the surviving output
        let mut released = std::collections::HashSet::new();
        for (input, &input_reg) in inputs.iter().zip(&input_regs) {
            let iid = node_id(input);
            if self.uses[&iid] == 0 && input_reg != reg && released.insert(iid) {
                self.registers.free(input_reg);
            }
        }

        self.results.insert(node_id(node), reg);
        Ok(reg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, OperatorKind};
    use glam::Vec3;

    #[test]
    fn single_sphere_scenario() {
        let root = Node::sphere();
        let glsl = generate_sdf(&root).unwrap();

        assert!(glsl.starts_with("float sdf(vec3 pos) {"));
        assert!(glsl.contains("var0 = (r_sphere(0.5, posTransf)) * 1;"));
        assert!(glsl.contains("posTransf = (inv * vec4(pos,1)).xyz / 1;"));
        assert!(glsl.ends_with("return var0;\n}\n"));
        assert_eq!(glsl.matches("r_sphere").count(), 1);
    }

    #[test]
    fn union_of_two_spheres_scenario() {
        let root = Node::union_of(vec![Node::sphere(), Node::sphere()]);
        let glsl = generate_sdf(&root).unwrap();

        // two primitive assignments, then the combine into the first register
        assert!(glsl.contains("var0 = (r_sphere(0.5, posTransf)) * 1;"));
        assert!(glsl.contains("var1 = (r_sphere(0.5, posTransf)) * 1;"));
        assert!(glsl.contains("var0 = (r_dmin(var0, var1)) * 1;"));
        assert!(glsl.ends_with("return var0;\n}\n"));
    }

    #[test]
    fn nary_union_nests_binary_min() {
        let root = Node::union_of(vec![Node::sphere(), Node::sphere(), Node::sphere()]);
        let glsl = generate_sdf(&root).unwrap();
        assert!(glsl.contains("var0 = (r_dmin(r_dmin(var0, var1), var2)) * 1;"));
    }

    #[test]
    fn subtraction_negates_second_input() {
        let root = Node::subtraction_of(vec![Node::sphere(), Node::box3d(1.0, 1.0, 1.0)]);
        let glsl = generate_sdf(&root).unwrap();
        assert!(glsl.contains("var0 = (r_dmax(var0, r_neg(var1))) * 1;"));
    }

    #[test]
    fn register_reuse_stays_bounded() {
        // left-deep chain of binary unions: two live registers suffice
        let mut root = Node::union_of(vec![Node::sphere(), Node::sphere()]);
        for _ in 0..6 {
            root = Node::union_of(vec![root, Node::sphere()]);
        }
        let glsl = generate_sdf(&root).unwrap();
        assert!(glsl.contains("float var0;"));
        assert!(glsl.contains("float var1;"));
        assert!(!glsl.contains("float var2;"));
    }

    #[test]
    fn declarations_are_not_repeated_for_recycled_ids() {
        let root = Node::union_of(vec![
            Node::union_of(vec![Node::sphere(), Node::sphere()]),
            Node::union_of(vec![Node::sphere(), Node::sphere()]),
        ]);
        let glsl = generate_sdf(&root).unwrap();
        assert_eq!(glsl.matches("float var0;").count(), 1);
        assert_eq!(glsl.matches("float var1;").count(), 1);
    }

    #[test]
    fn smooth_union_with_three_inputs_fails() {
        let root = Node::operator(OperatorKind::SmoothUnion { k: 0.3 });
        root.borrow_mut()
            .as_operator_mut()
            .unwrap()
            .set_inputs(vec![Node::sphere(), Node::sphere(), Node::sphere()]);
        let err = generate_sdf(&root).unwrap_err();
        assert_eq!(err.reason, GenReason::SmoothOperatorNeedsTwoInputs);
        assert!(std::rc::Rc::ptr_eq(&err.node, &root));
    }

    #[test]
    fn operator_without_inputs_fails() {
        let empty = Node::operator(OperatorKind::Intersection);
        let root = Node::union_of(vec![Node::sphere(), empty.clone()]);
        let err = generate_sdf(&root).unwrap_err();
        assert_eq!(err.reason, GenReason::OperatorHasNoInputs);
        assert!(std::rc::Rc::ptr_eq(&err.node, &empty));
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let root = Node::union_of(vec![
            Node::torus(0.4, 0.1),
            Node::smooth_union_of(Node::sphere(), Node::box3d(1.0, 2.0, 3.0), 0.25),
        ]);
        let first = generate_sdf(&root).unwrap();
        let second = generate_sdf(&root).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shared_node_generates_once() {
        let shared = Node::sphere();
        let left = Node::union_of(vec![shared.clone(), Node::sphere()]);
        let right = Node::union_of(vec![shared.clone(), Node::sphere()]);
        let root = Node::union_of(vec![left, right]);
        let glsl = generate_sdf(&root).unwrap();
        // three primitive bodies, not four
        assert_eq!(glsl.matches("r_sphere").count(), 3);
    }

    #[test]
    fn same_node_twice_in_one_operator() {
        let s = Node::sphere();
        let root = Node::union_of(vec![s.clone(), s.clone()]);
        let glsl = generate_sdf(&root).unwrap();
        assert_eq!(glsl.matches("r_sphere").count(), 1);
        assert!(glsl.contains("var0 = (r_dmin(var0, var0)) * 1;"));
    }

    #[test]
    fn allocations_balance_frees_plus_output() {
        // only the returned root register stays live after generation
        let shared = Node::sphere();
        let left = Node::union_of(vec![shared.clone(), Node::torus(0.4, 0.1)]);
        let right = Node::union_of(vec![shared.clone(), Node::box3d(1.0, 1.0, 1.0)]);
        let graphs = vec![
            Node::sphere(),
            Node::union_of(vec![Node::sphere(), Node::sphere()]),
            Node::intersection_of(vec![
                Node::smooth_union_of(Node::sphere(), Node::torus(0.4, 0.1), 0.25),
                Node::subtraction_of(vec![Node::box3d(1.0, 2.0, 1.0), Node::cylinder(0.5, 1.0)]),
            ]),
            Node::union_of(vec![left, right]),
        ];
        for root in &graphs {
            let (_, regs) = generate(root).unwrap();
            assert_eq!(regs.allocated(), regs.freed() + 1);
        }
    }

    #[test]
    fn transform_and_offset_are_applied() {
        let s = Node::sphere();
        {
            let mut n = s.borrow_mut();
            let p = n.as_primitive_mut().unwrap();
            p.translate = Vec3::new(1.0, 0.0, 0.0);
            p.scale = 2.0;
            p.offset = 0.1;
        }
        let glsl = generate_sdf(&s).unwrap();
        assert!(glsl.contains(".xyz / 2;"));
        assert!(glsl.contains("var0 = (r_sphere(0.5, posTransf) - 0.1) * 2;"));
        // inverse translation shows up in the fourth matrix column
        assert!(glsl.contains("inv[3] = vec4(-1, 0, 0, 1);"));
    }
}
