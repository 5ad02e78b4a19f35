//! Cycle detection for the CSG graph
//!
//! The editor calls [`has_cycle_if_connected`] before committing any link, so
//! the generators can assume every traversal from their root terminates. The
//! check uses three-state coloring over a call-local side table: nodes absent
//! from the table are unvisited, `Entered` marks nodes on the DFS stack, and
//! `Returned` marks fully explored sub-DAGs that are safe to skip. Because the
//! table lives on the call stack, the graph itself is never marked and
//! repeated checks are independent by construction.
//!
//! Author: Moroya Sakamoto

use std::collections::HashMap;
use std::rc::Rc;

use crate::types::{node_id, Node, NodeId, NodeRef};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Entered,
    Returned,
}

/// True if a cycle is reachable from `root` over input edges.
///
/// Halts at the first cycle found. Leaves the graph untouched.
pub fn has_cycle(root: &NodeRef) -> bool {
    let mut colors: HashMap<NodeId, Color> = HashMap::new();
    visit(root, &mut colors)
}

fn visit(node: &NodeRef, colors: &mut HashMap<NodeId, Color>) -> bool {
    let id = node_id(node);
    match colors.get(&id) {
        Some(Color::Entered) => return true,
        Some(Color::Returned) => return false,
        None => {}
    }

    let inputs = match &*node.borrow() {
        Node::Primitive(_) => {
            colors.insert(id, Color::Returned);
            return false;
        }
        Node::Operator(op) => op.inputs().to_vec(),
    };

    colors.insert(id, Color::Entered);
    for input in &inputs {
        if visit(input, colors) {
            return true;
        }
    }
    colors.insert(id, Color::Returned);
    false
}

/// Removes the temporary candidate edge even if the check unwinds.
struct TempEdge {
    parent: NodeRef,
}

impl Drop for TempEdge {
    fn drop(&mut self) {
        if let Some(op) = self.parent.borrow_mut().as_operator_mut() {
            op.remove_last_input();
        }
    }
}

/// True if appending `candidate` to `parent`'s inputs would close a cycle.
///
/// Validates a prospective edge without committing it: the candidate input is
/// appended, [`has_cycle`] runs from `parent`, and the temporary edge is
/// removed again on every exit path. The graph is structurally identical
/// before and after the call; the editor accepts the link only if this
/// returns false.
///
/// A `parent` that is not an operator cannot take inputs; only the degenerate
/// self-loop (`candidate` is `parent`) reports true in that case.
pub fn has_cycle_if_connected(parent: &NodeRef, candidate: &NodeRef) -> bool {
    if Rc::ptr_eq(parent, candidate) {
        return true;
    }

    let added = match parent.borrow_mut().as_operator_mut() {
        Some(op) => {
            op.add_input(candidate.clone());
            true
        }
        None => false,
    };
    if !added {
        return false;
    }

    let _rollback = TempEdge {
        parent: parent.clone(),
    };
    has_cycle(parent)
}
