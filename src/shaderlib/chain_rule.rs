//! Chain-rule GLSL generator for elementary functions
//!
//! Given a scalar function and its successive derivatives as expressions in
//! `x`, generates a GLSL function lifting it to dual numbers: for every
//! multi-index (x,y,z) with 0 < x+y+z ≤ order, the multivariate Faà di Bruno
//! expansion sums over all set partitions of the derivative applications.
//! Each group of a partition selects one stored derivative coefficient of
//! the input (its per-direction application tally), the partition's group
//! count selects the outer derivative, and the partition products accumulate
//! into the output coefficient at `IDX(x, y, z)`.
//!
//! Author: Moroya Sakamoto

use std::fmt::Write;

use super::partitions::SetPartitions;
use super::{DUAL_MEMBER, DUAL_TYPE};

/// Generate `dnum name(dnum d)` applying `derivatives[0]` and propagating
/// derivatives up to total `order` in 3 directions.
///
/// `derivatives[k]` is the k-th derivative of the function as a GLSL
/// expression in `x` (e.g. `["sin(x)", "cos(x)", "-sin(x)"]`). The table
/// must extend past `order`; a shorter table is a programming error.
pub fn generate_chain_rule_fn(name: &str, derivatives: &[&str], order: usize) -> String {
    assert!(
        derivatives.len() > order,
        "chain-rule table for {name} needs derivatives up to order {order}"
    );

    let indent = "    ";
    let at_value = |expr: &str| expr.replace('x', &format!("d.{DUAL_MEMBER}[0]"));

    let mut code = String::new();
    writeln!(code, "{DUAL_TYPE} {name}({DUAL_TYPE} d) {{").unwrap();
    writeln!(code, "{indent}float tmp;").unwrap();
    writeln!(code, "{indent}{DUAL_TYPE} result = zero();").unwrap();
    writeln!(
        code,
        "{indent}result.{DUAL_MEMBER}[0] = {};",
        at_value(derivatives[0])
    )
    .unwrap();

    for x in 0..=order {
        for y in 0..=order - x {
            for z in 0..=order - x - y {
                let n = x + y + z;
                if n == 0 {
                    continue;
                }

                // the first x elements derive in direction 1, the next y in
                // direction 2, the rest in direction 3
                for (rgs, groups) in SetPartitions::new(n) {
                    let mut tally = vec![[0usize; 3]; groups];
                    for i in 0..x {
                        tally[rgs[i] - 1][0] += 1;
                    }
                    for i in x..x + y {
                        tally[rgs[i] - 1][1] += 1;
                    }
                    for i in x + y..n {
                        tally[rgs[i] - 1][2] += 1;
                    }

                    writeln!(code, "{indent}tmp = {};", at_value(derivatives[groups])).unwrap();
                    for t in &tally {
                        writeln!(
                            code,
                            "{indent}tmp *= d.{DUAL_MEMBER}[IDX({}, {}, {})];",
                            t[0], t[1], t[2]
                        )
                        .unwrap();
                    }
                    writeln!(
                        code,
                        "{indent}result.{DUAL_MEMBER}[IDX({x}, {y}, {z})] += tmp;"
                    )
                    .unwrap();
                }
            }
        }
    }

    writeln!(code, "{indent}return result;").unwrap();
    code.push_str("}\n");
    code
}

/// The fixed elementary-function set the primitive library calls into:
/// `dsqrt`, `dsin` and `dcos`, each lifted to the given derivative order.
///
/// The built-in derivative tables extend to order 3; a higher `order` is a
/// programming error.
pub fn generate_derivative_library(order: usize) -> String {
    let dsqrt = generate_chain_rule_fn(
        "dsqrt",
        &[
            "sqrt(x)",
            "1/(2*sqrt(x))",
            "-1.0/4 * 1/sqrt(x*x*x)",
            "3.0/8 * 1/sqrt(x*x*x*x*x)",
        ],
        order,
    );
    let dsin = generate_chain_rule_fn("dsin", &["sin(x)", "cos(x)", "-sin(x)", "-cos(x)"], order);
    let dcos = generate_chain_rule_fn("dcos", &["cos(x)", "-sin(x)", "-cos(x)", "sin(x)"], order);

    let mut lib = String::with_capacity(dsqrt.len() + dsin.len() + dcos.len());
    lib.push_str(&dsqrt);
    lib.push_str(&dsin);
    lib.push_str(&dcos);
    lib
}
