//! AST walking utilities

use crate::parser::ast::Node;

/// Result of a visitor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkResult {
    /// Continue walking.
    Continue,
    /// Prune this branch.
    Prune,
    /// Abort the walk.
    Abort,
}

/// Trait for visiting AST nodes.
pub trait Visitor {
    /// Called for each node before its children.
    fn visit_node(&mut self, node: &Node) -> WalkResult;
}

/// Walk a tree in pre-order.
///
/// Returns [`WalkResult::Abort`] if the visitor aborted, otherwise
/// [`WalkResult::Continue`].
pub fn walk<V: Visitor>(visitor: &mut V, node: &Node) -> WalkResult {
    match visitor.visit_node(node) {
        WalkResult::Abort => return WalkResult::Abort,
        WalkResult::Prune => return WalkResult::Continue,
        WalkResult::Continue => {}
    }

    for child in node.children() {
        if walk(visitor, child) == WalkResult::Abort {
            return WalkResult::Abort;
        }
    }

    WalkResult::Continue
}
