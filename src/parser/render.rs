//! Tree rendering
//!
//! Turns any AST node into an indented box-drawing diagram. Rendering
//! is pure and deterministic, depends only on the generic label and
//! ordered-children contract, and is total: there is no error path for
//! a well-formed tree.

use crate::parser::ast::Node;

/// Render a tree as an ordered sequence of display lines.
///
/// The first line is the node's own label. Each child's lines follow,
/// indented one level: a non-last child gets `├ ` on its first line and
/// `│ ` on the rest, the last child gets `└ ` and a blank continuation.
pub fn render(node: &Node) -> Vec<String> {
    let mut lines = vec![node.label()];
    let children = node.children();
    let last = children.len().saturating_sub(1);

    for (i, child) in children.iter().enumerate() {
        let (head, cont) = if i == last { ("└", " ") } else { ("├", "│") };
        for (j, line) in render(child).iter().enumerate() {
            let glyph = if j == 0 { head } else { cont };
            lines.push(format!("{} {}", glyph, line));
        }
    }

    lines
}

/// Render a tree as one newline-joined string
pub fn render_to_string(node: &Node) -> String {
    render(node).join("\n")
}
