//! Abstract Syntax Tree
//!
//! Defines the AST node model for the restricted SELECT language. A
//! parse produces one tree rooted at [`Node::Select`]; every node owns
//! its children outright, is immutable once built, and exposes the
//! generic label-plus-ordered-children contract the renderer and the
//! walker operate on.

use std::fmt;

// ============================================================================
// Operators
// ============================================================================

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
    NotEq,
    Or,
    And,
    As,
}

impl BinOp {
    /// Surface syntax for this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Ge => ">=",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Or => "||",
            BinOp::And => "and",
            BinOp::As => "as",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operator
///
/// The grammar's `not` level only produces [`UnOp::Not`]; [`UnOp::Neg`]
/// is part of the node model for programmatic consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
}

impl UnOp {
    /// Surface syntax for this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Join kind
///
/// The five kinds are mutually exclusive and never combine, so this is
/// a closed enum rather than a flag set. CROSS is the only kind that
/// carries no ON condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
    Full,
    Cross,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Inner => "inner",
            JoinKind::Full => "full",
            JoinKind::Cross => "cross",
        })
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// An AST node.
///
/// Trees are acyclic by construction: a node is never shared and never
/// references an ancestor. The two sentinel variants [`Node::NoExpr`]
/// and [`Node::NoList`] stand in for syntactically absent optional
/// clauses so a `Select` always has the same 6-slot shape; being unit
/// variants, their tag is their identity and they can never collide
/// with user identifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal
    Num(f64),
    /// Identifier, optionally dot-qualified (`table.column`)
    Ident(String),
    /// Function call; children are the argument expressions
    Call { name: String, args: Vec<Node> },
    /// Binary operation (including aliasing via [`BinOp::As`])
    BinOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Unary operation
    UnOp { op: UnOp, operand: Box<Node> },
    /// Join between a previously built source (left) and a table
    /// reference (right); `on` is absent exactly for CROSS joins
    Join {
        kind: JoinKind,
        left: Box<Node>,
        right: Box<Node>,
        on: Option<Box<Node>>,
    },
    /// Projection list
    Exprs(Vec<Node>),
    /// GROUP BY column list
    GroupBy(Vec<Node>),
    /// ORDER BY column list
    OrderBy(Vec<Node>),
    /// SELECT statement; children are always exactly
    /// {projection, source, where, group-by, having, order-by}
    Select {
        projection: Box<Node>,
        source: Box<Node>,
        where_clause: Box<Node>,
        group_by: Box<Node>,
        having: Box<Node>,
        order_by: Box<Node>,
    },
    /// Scalar sentinel filling an absent WHERE or HAVING slot
    NoExpr,
    /// List sentinel filling an absent GROUP BY or ORDER BY slot
    NoList,
}

impl Node {
    /// Create an identifier node
    pub fn ident(name: impl Into<String>) -> Node {
        Node::Ident(name.into())
    }

    /// Create a binary operation node
    pub fn binary(op: BinOp, left: Node, right: Node) -> Node {
        Node::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary operation node
    pub fn unary(op: UnOp, operand: Node) -> Node {
        Node::UnOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a join node
    pub fn join(kind: JoinKind, left: Node, right: Node, on: Option<Node>) -> Node {
        Node::Join {
            kind,
            left: Box::new(left),
            right: Box::new(right),
            on: on.map(Box::new),
        }
    }

    /// Create a SELECT node, substituting the sentinels for absent
    /// optional clauses so the 6-slot shape is uniform.
    pub fn select(
        projection: Node,
        source: Node,
        where_clause: Option<Node>,
        group_by: Option<Node>,
        having: Option<Node>,
        order_by: Option<Node>,
    ) -> Node {
        Node::Select {
            projection: Box::new(projection),
            source: Box::new(source),
            where_clause: Box::new(where_clause.unwrap_or(Node::NoExpr)),
            group_by: Box::new(group_by.unwrap_or(Node::NoList)),
            having: Box::new(having.unwrap_or(Node::NoExpr)),
            order_by: Box::new(order_by.unwrap_or(Node::NoList)),
        }
    }

    /// One-line label used by the tree renderer
    pub fn label(&self) -> String {
        match self {
            Node::Num(value) => format!("{:?}", value),
            Node::Ident(name) => name.clone(),
            Node::Call { name, .. } => format!("call {}", name),
            Node::BinOp { op, .. } => op.symbol().to_string(),
            Node::UnOp { op, .. } => op.symbol().to_string(),
            Node::Join { kind, .. } => format!("{} join", kind),
            Node::Exprs(_) => "...".to_string(),
            Node::GroupBy(_) => "group by".to_string(),
            Node::OrderBy(_) => "order by".to_string(),
            Node::Select { .. } => "select".to_string(),
            Node::NoExpr | Node::NoList => "(none)".to_string(),
        }
    }

    /// Ordered child list. For `Select` this is always exactly 6
    /// entries regardless of which optional clauses were written.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Num(_) | Node::Ident(_) | Node::NoExpr | Node::NoList => Vec::new(),
            Node::Call { args, .. } => args.iter().collect(),
            Node::BinOp { left, right, .. } => vec![left, right],
            Node::UnOp { operand, .. } => vec![operand],
            Node::Join {
                left, right, on, ..
            } => {
                let mut childs: Vec<&Node> = vec![left, right];
                if let Some(cond) = on {
                    childs.push(cond);
                }
                childs
            }
            Node::Exprs(items) | Node::GroupBy(items) | Node::OrderBy(items) => {
                items.iter().collect()
            }
            Node::Select {
                projection,
                source,
                where_clause,
                group_by,
                having,
                order_by,
            } => vec![projection, source, where_clause, group_by, having, order_by],
        }
    }

    /// True for the sentinel variants that fill absent clause slots
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Node::NoExpr | Node::NoList)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================
