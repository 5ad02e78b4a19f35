//! Dual-number SDF generator: graph → `dnum dsdf(vec3 pos)` GLSL
//!
//! Mirrors the scalar generator's traversal, transform stack, memoization and
//! register lifetimes exactly, but every emitted value is a dual number and
//! all arithmetic goes through the dual library (`mul`, `sub`, `constant`,
//! `variable3`, ...). Any change to traversal order or register discipline in
//! [`super::scalar`] must be mirrored here.
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

/// Generate the dual-number distance function for the graph rooted at `root`.
///
/// Output defines `dnum dsdf(vec3 pos)` returning the distance together with
/// its partial derivatives, already run through the dual-variant library
/// substitution. Same determinism and error contract as
/// [`super::generate_sdf`].
pub fn generate_dual_sdf(root: &NodeRef) -> Result<String, GenError> {
    generate(root).map(|(glsl, _)| glsl)
}

/// Like [`generate_dual_sdf`], but hands back the register allocator so the
/// allocate/free bookkeeping stays observable.
pub(crate) fn generate(root: &NodeRef) -> Result<(String, RegisterAllocator), GenError> {
    let mut gen = DualSdfGenerator::new(root);
    writeln!(gen.code, "_dnum_ dsdf(vec3 {SAMPLE_COORD}) {{").unwrap();
    let reg = gen.visit(root)?;
    writeln!(gen.code, "return {REG_PREFIX}{reg};").unwrap();
    gen.code.push_str("}\n");
    Ok((substitute(&gen.code, Flavor::Dual), gen.registers))
}

struct DualSdfGenerator {
    code: String,
    registers: RegisterAllocator,
    transforms: Vec<Mat4>,
    declared: usize,
    created_shared_decls: bool,
    results: HashMap<NodeId, usize>,
    uses: HashMap<NodeId, usize>,
}

impl DualSdfGenerator {
    fn new(root: &NodeRef) -> Self {
        DualSdfGenerator {
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

        let transform =
            *self.transforms.last().expect("transform stack seeded") * local_matrix(&n, false);
        let inv = transform.inverse();

        if !self.created_shared_decls {
            writeln!(self.code, "mat4 {INV_NAME};").unwrap();
            writeln!(self.code, "_dnum3_ {TRANSF_COORD};").unwrap();
            self.created_shared_decls = true;
        }
        for i in 0..4 {
            writeln!(self.code, "{INV_NAME}[{i}] = {};", glsl_vec4(inv.col(i))).unwrap();
        }
        // seed the transformed coordinate as the differentiation variable
        writeln!(
            self.code,
            "{TRANSF_COORD} = _variable3_(({INV_NAME} * vec4({SAMPLE_COORD},1)).xyz / {});",
            prim.scale
        )
        .unwrap();

        if reg == self.declared {
            self.declared += 1;
            writeln!(self.code, "_dnum_ {REG_PREFIX}{reg};").unwrap();
        }

        let call = primitive_call(&prim.kind, TRANSF_COORD);
        let body = if prim.offset != 0.0 {
            format!("_sub_(_TEMPLATE_{call}, _constant_({}))", prim.offset)
        } else {
            format!("_TEMPLATE_{call}")
        };
        writeln!(
            self.code,
            "{REG_PREFIX}{reg} = _mul_({body}, _constant_({}));",
            prim.scale
        )
        .unwrap();
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

        let first_id = node_id(&inputs[0]);
        let reg = if self.uses[&first_id] == 0 {
            input_regs[0]
        } else {
            self.registers.allocate()
        };
        if reg == self.declared {
            self.declared += 1;
            writeln!(self.code, "_dnum_ {REG_PREFIX}{reg};").unwrap();
        }

        let scaled = format!("_mul_(({expr}), _constant_({scale}))");
        if offset != 0.0 {
            writeln!(
                self.code,
                "{REG_PREFIX}{reg} = _sub_({scaled}, _constant_({offset}));"
            )
            .unwrap();
        } else {
            writeln!(self.code, "{REG_PREFIX}{reg} = {scaled};").unwrap();
        }

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
