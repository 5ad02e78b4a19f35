//! Shader library templating
//!
//! One GLSL template of the primitive/operator library is written against
//! symbolic placeholder tokens (`_dnum_`, `_add_`, `_dmin_`, ...). Pure text
//! substitution turns it into the two concrete variants linked into the
//! shader program: the real (plain float) library and the dual-number
//! library. This module also generates the dual-number support code that is
//! not templated: the chain-rule derivative functions for the elementary
//! functions the library calls ([`chain_rule`]) and the constants header
//! with the combinatorial index tables ([`generate_constants`]).
//!
//! Author: Moroya Sakamoto

use std::fmt::Write;

pub mod chain_rule;
pub mod combinatorics;
pub mod partitions;

pub use chain_rule::{generate_chain_rule_fn, generate_derivative_library};
pub use combinatorics::{binomial_table, tetrahedral_numbers, triangular_numbers};
pub use partitions::{next_partition, SetPartitions};

/// GLSL name of the dual-number struct.
pub const DUAL_TYPE: &str = "dnum";
/// Name of the coefficient-array member of the dual-number struct.
pub const DUAL_MEMBER: &str = "d";

/// Which concrete variant a template is substituted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Plain float arithmetic (`r_` prefix)
    Real,
    /// Dual-number arithmetic (`d_` prefix)
    Dual,
}

/// Placeholder token → (real name, dual name).
const FUNCTION_NAME_TABLE: &[(&str, &str, &str)] = &[
    ("_dnum_", "float", "dnum"),
    ("_dnum2_", "vec2", "dnum2"),
    ("_dnum3_", "vec3", "dnum3"),
    ("_zero_", "r_zero", "zero"),
    ("_conj_", "r_conj", "conj"),
    ("_realValue_", "r_realValue", "realValue"),
    ("_isReal_", "r_isReal", "isReal"),
    ("_neg_", "r_neg", "neg"),
    ("_add_", "r_add", "add"),
    ("_add3_", "r_add3", "add3"),
    ("_sub_", "r_sub", "sub"),
    ("_sub3_", "r_sub3", "sub3"),
    ("_mul_", "r_mul", "mul"),
    ("_mul3_", "r_mul3", "mul3"),
    ("_div_", "r_div", "div"),
    ("_div3_", "r_div3", "div3"),
    ("_constant_", "r_constant", "constant"),
    ("_constant3_", "r_constant3", "constant3"),
    ("_variable_", "r_variable", "variable"),
    ("_variable3_", "r_variable3", "variable3"),
    ("_dabs_", "r_dabs", "dabs"),
    ("_dabs3_", "r_dabs3", "dabs3"),
    ("_dmin_", "r_dmin", "dmin"),
    ("_dmin3_", "r_dmin3", "dmin3"),
    ("_dmax_", "r_dmax", "dmax"),
    ("_dmax3_", "r_dmax3", "dmax3"),
    ("_dclamp_", "r_dclamp", "dclamp"),
    ("_dmix_", "r_dmix", "dmix"),
    ("_dsqrt_", "r_dsqrt", "dsqrt"),
    ("_dlength_", "r_dlength", "dlength"),
    ("_dsin_", "r_dsin", "dsin"),
    ("_dcos_", "r_dcos", "dcos"),
    ("_ddot_", "r_ddot", "ddot"),
];

/// Substitute every placeholder token in `template` with its `flavor`
/// implementation name, then the generic `_TEMPLATE_` prefix token. Pure
/// text substitution, no parsing.
pub fn substitute(template: &str, flavor: Flavor) -> String {
    let mut out = template.to_string();
    for (token, real, dual) in FUNCTION_NAME_TABLE {
        let replacement = match flavor {
            Flavor::Real => real,
            Flavor::Dual => dual,
        };
        out = out.replace(token, replacement);
    }
    let prefix = match flavor {
        Flavor::Real => "r_",
        Flavor::Dual => "d_",
    };
    out.replace("_TEMPLATE_", prefix)
}

/// Both concrete variants of a shared library template: `(real, dual)`.
pub fn generate_library_pair(template: &str) -> (String, String) {
    (
        substitute(template, Flavor::Real),
        substitute(template, Flavor::Dual),
    )
}

fn const_glsl_array(name: &str, glsl_type: &str, vals: &[usize]) -> String {
    let mut code = String::new();
    writeln!(code, "const {glsl_type} {name}[{}] = {{", vals.len()).unwrap();
    write!(code, "    {}", vals[0]).unwrap();
    for v in &vals[1..] {
        write!(code, ",{v}").unwrap();
    }
    code.push_str("\n};\n");
    code
}

fn const_glsl_array_2d(name: &str, glsl_type: &str, vals: &[Vec<usize>]) -> String {
    let mut code = String::new();
    writeln!(
        code,
        "const {glsl_type} {name}[{}][{}] = {{",
        vals.len(),
        vals[0].len()
    )
    .unwrap();
    for row in vals {
        write!(code, "    {{{}", row[0]).unwrap();
        for v in &row[1..] {
            write!(code, ",{v}").unwrap();
        }
        code.push_str("},\n");
    }
    code.push_str("};\n");
    code
}

/// Generate the GLSL constants header for `order`: the derivative-order
/// define, the derivatives feature flag (order > 0), the `tetra`/`tri`/
/// `choose` index tables, and `SIZE`, the derivative-coefficient array
/// length of the dual-number type.
pub fn generate_constants(order: usize) -> String {
    let mut code = String::new();
    code.push_str("#version 460\n");
    writeln!(code, "#define DERIVATIVE_ORDER {order}").unwrap();
    if order > 0 {
        code.push_str("#define DERIVATIVES_ENABLED\n");
    }

    // computed one past the order so the arrays are never empty
    let tetra = tetrahedral_numbers(order + 1);
    code.push_str(&const_glsl_array("tetra", "int", &tetra));
    let tri = triangular_numbers(order + 1);
    code.push_str(&const_glsl_array("tri", "int", &tri));
    let choose = binomial_table(order + 1);
    code.push_str(&const_glsl_array_2d("choose", "int", &choose));
    writeln!(code, "#define SIZE {}", tetra[order + 1]).unwrap();
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_substitution() {
        let template = "_dnum_ _TEMPLATE_sphere(float r, _dnum3_ p) { return _zero_(); }";
        let real = substitute(template, Flavor::Real);
        assert_eq!(
            real,
            "float r_sphere(float r, vec3 p) { return r_zero(); }"
        );
    }

    #[test]
    fn dual_substitution() {
        let template = "_dnum_ d = _dmin_(_dsqrt_(_ddot_(p, p)), _constant_(0.5));";
        let dual = substitute(template, Flavor::Dual);
        assert_eq!(dual, "dnum d = dmin(dsqrt(ddot(p, p)), constant(0.5));");
    }

    #[test]
    fn library_pair_differs_only_in_names() {
        let template = "_dnum_ _TEMPLATE_f(_dnum_ a) { return _neg_(a); }";
        let (real, dual) = generate_library_pair(template);
        assert_eq!(real, "float r_f(float a) { return r_neg(a); }");
        assert_eq!(dual, "dnum d_f(dnum a) { return neg(a); }");
    }

    #[test]
    fn longer_tokens_survive_shorter_ones() {
        // _dmin3_ must not be clipped by the _dmin_ pass
        let out = substitute("_dmin_(_dmin3_(a, b), c)", Flavor::Dual);
        assert_eq!(out, "dmin(dmin3(a, b), c)");
    }

    #[test]
    fn constants_header_order_two() {
        let header = generate_constants(2);
        assert!(header.starts_with("#version 460\n"));
        assert!(header.contains("#define DERIVATIVE_ORDER 2\n"));
        assert!(header.contains("#define DERIVATIVES_ENABLED\n"));
        assert!(header.contains("const int tetra[4] = {\n    0,1,4,10\n};\n"));
        assert!(header.contains("const int tri[4] = {\n    0,1,3,6\n};\n"));
        assert!(header.contains("const int choose[3][3] = {"));
        assert!(header.contains("    {1,0,0},\n    {1,1,0},\n    {1,2,1},\n"));
        assert!(header.contains("#define SIZE 10\n"));
    }

    #[test]
    fn constants_header_order_zero_disables_derivatives() {
        let header = generate_constants(0);
        assert!(header.contains("#define DERIVATIVE_ORDER 0\n"));
        assert!(!header.contains("DERIVATIVES_ENABLED"));
        assert!(header.contains("#define SIZE 1\n"));
    }
}
