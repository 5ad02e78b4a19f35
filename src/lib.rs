//! # ALICE-CSG
//!
//! **A.L.I.C.E. - Adaptive Lightweight Implicit Compression Engine, CSG core**
//!
//! Compiles an editable constructive-solid-geometry node graph into GLSL
//! source implementing the scene's signed distance function, optionally
//! together with a forward-mode automatically-differentiated (dual-number)
//! variant computing exact derivatives on the GPU.
//!
//! ## Features
//!
//! - **Graph model**: primitive leaves (Sphere, Box, Cylinder, Torus,
//!   Ellipsoid, Plane) and operator nodes (Union, Intersection, Subtraction
//!   and their smooth variants), freely shared between operators
//! - **Edge validation**: cycle-safe DFS gating every connection the editor
//!   makes, with transactional probe edges
//! - **Scalar generation**: `float sdf(vec3 pos)` with register reuse and
//!   accumulated-transform inversion
//! - **Dual generation**: `dnum dsdf(vec3 pos)`, structurally symmetric to
//!   the scalar output
//! - **Library templating**: real/dual variants of the shared primitive
//!   library by token substitution, plus a generated chain-rule (Faà di
//!   Bruno) derivative library and the combinatorial constants header
//!
//! The crate only produces GLSL text. Rendering, shader compilation, JSON
//! persistence and the node-editor UI are external collaborators.
//!
//! ## Example
//!
//! ```rust
//! use alice_csg::prelude::*;
//!
//! // carve a box out of a sphere
//! let sphere = Node::sphere();
//! let cut = Node::box3d(1.0, 1.0, 1.0);
//! let root = Node::subtraction_of(vec![sphere, cut.clone()]);
//!
//! // the editor validates edges before wiring them
//! assert!(!has_cycle_if_connected(&root, &Node::torus(0.4, 0.1)));
//!
//! // lower the graph to GLSL
//! let sdf = generate_sdf(&root).unwrap();
//! assert!(sdf.contains("float sdf(vec3 pos)"));
//! ```
//!
//! ## Author
//!
//! Moroya Sakamoto

#![warn(missing_docs)]

pub mod codegen;
pub mod cycle;
pub mod registers;
pub mod shaderlib;
pub mod types;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::codegen::{generate_dual_sdf, generate_sdf, GenError, GenReason};
    pub use crate::cycle::{has_cycle, has_cycle_if_connected};
    pub use crate::registers::RegisterAllocator;
    pub use crate::shaderlib::{
        generate_chain_rule_fn, generate_constants, generate_derivative_library,
        generate_library_pair, substitute, Flavor,
    };
    pub use crate::types::{
        node_id, Node, NodeId, NodeRef, OperatorKind, OperatorNode, PrimitiveKind, PrimitiveNode,
    };
}
