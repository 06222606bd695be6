//! Query grammar/parser
//!
//! A recursive descent parser for the restricted SELECT language. Uses
//! the tokenizer to read tokens and builds one [`Node::Select`] tree,
//! with one method per grammar production and explicit precedence
//! climbing for expressions.
//!
//! The clause combination is constrained, not orthogonal: HAVING is
//! only accepted after GROUP BY, and ORDER BY only after HAVING, so of
//! the sixteen presence-combinations of {WHERE, GROUP BY, HAVING,
//! ORDER BY} exactly eight are legal.

use crate::error::{Error, Result};
use crate::parser::ast::{BinOp, JoinKind, Node, UnOp};
use crate::parser::tokenizer::{tokenize, Token, TokenKind};

// ============================================================================
// Parser
// ============================================================================

/// Query parser. Single-use: build one per input string.
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    diagnostics: Vec<Error>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given query source.
    ///
    /// Tokenizes up front; fails only on numeric overflow. Recoverable
    /// lexical diagnostics are collected and exposed via
    /// [`Parser::diagnostics`] so the caller can report unclean input.
    pub fn new(source: &'a str) -> Result<Self> {
        let lexed = tokenize(source)?;
        Ok(Parser {
            source,
            tokens: lexed.tokens,
            diagnostics: lexed.diagnostics,
            pos: 0,
        })
    }

    /// Lexical diagnostics collected while tokenizing
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Parse one complete SELECT statement.
    ///
    /// The whole input must be consumed; trailing tokens are a syntax
    /// error. On error no partial tree is returned.
    pub fn parse_select(&mut self) -> Result<Node> {
        let select = self.parse_select_stmt()?;
        if !self.check(TokenKind::EndOfInput) {
            return Err(self.error("expected end of input"));
        }
        Ok(select)
    }

    /// Parse a single expression (the `or` level)
    pub fn parse_expression(&mut self) -> Result<Node> {
        self.parse_or()
    }

    // ========================================================================
    // SELECT Statement
    // ========================================================================

    /// `select := 'select' exprs 'from' join [where] [group [having [order]]]`
    fn parse_select_stmt(&mut self) -> Result<Node> {
        self.expect(TokenKind::Select)?;
        let projection = self.parse_projection()?;

        self.expect(TokenKind::From)?;
        let source = self.parse_join()?;

        let where_clause = if self.match_token(TokenKind::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        // HAVING is only reachable through GROUP BY, and ORDER BY only
        // through HAVING: the nesting is the language restriction.
        let mut group_by = None;
        let mut having = None;
        let mut order_by = None;
        if self.match_token(TokenKind::Group) {
            self.expect(TokenKind::By)?;
            group_by = Some(Node::GroupBy(self.parse_expr_list()?));

            if self.match_token(TokenKind::Having) {
                having = Some(self.parse_expression()?);

                if self.match_token(TokenKind::Order) {
                    self.expect(TokenKind::By)?;
                    order_by = Some(Node::OrderBy(self.parse_expr_list()?));
                }
            }
        }

        Ok(Node::select(
            projection,
            source,
            where_clause,
            group_by,
            having,
            order_by,
        ))
    }

    /// Parse the projection list into one flat `Exprs` node
    fn parse_projection(&mut self) -> Result<Node> {
        let mut items = vec![self.parse_column()?];
        while self.match_token(TokenKind::Comma) {
            items.push(self.parse_column()?);
        }
        Ok(Node::Exprs(items))
    }

    /// `column := or ('as' ident)*`
    ///
    /// Aliasing is a binary operation so it renders uniformly with the
    /// other operators; chained aliases nest to the left.
    fn parse_column(&mut self) -> Result<Node> {
        let mut expr = self.parse_expression()?;
        while self.match_token(TokenKind::As) {
            let alias = self.expect_ident()?;
            expr = Node::binary(BinOp::As, expr, alias);
        }
        Ok(expr)
    }

    /// Parse a comma-separated expression list (GROUP BY / ORDER BY)
    fn parse_expr_list(&mut self) -> Result<Vec<Node>> {
        let mut items = vec![self.parse_expression()?];
        while self.match_token(TokenKind::Comma) {
            items.push(self.parse_expression()?);
        }
        Ok(items)
    }

    // ========================================================================
    // FROM clause
    // ========================================================================

    /// `join := ident | join kind 'join' ident 'on' or | join 'cross' 'join' ident`
    ///
    /// Builds a left-leaning chain: each further JOIN wraps the
    /// previously built source as its left operand. CROSS joins carry
    /// no condition.
    fn parse_join(&mut self) -> Result<Node> {
        let mut source = self.expect_ident()?;

        loop {
            let kind = match self.current().kind {
                TokenKind::Left => JoinKind::Left,
                TokenKind::Right => JoinKind::Right,
                TokenKind::Inner => JoinKind::Inner,
                TokenKind::Full => JoinKind::Full,
                TokenKind::Cross => JoinKind::Cross,
                _ => break,
            };
            self.advance();
            self.expect(TokenKind::Join)?;
            let right = self.expect_ident()?;

            let on = if kind == JoinKind::Cross {
                None
            } else {
                self.expect(TokenKind::On)?;
                Some(self.parse_expression()?)
            };

            source = Node::join(kind, source, right, on);
        }

        Ok(source)
    }

    // ========================================================================
    // Expressions (precedence climbing, lowest level first)
    // ========================================================================

    /// `or := and ('||' and)*`
    fn parse_or(&mut self) -> Result<Node> {
        let mut left = self.parse_and()?;
        while self.match_token(TokenKind::Or) {
            let right = self.parse_and()?;
            left = Node::binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    /// `and := compare ('and' compare)*`
    fn parse_and(&mut self) -> Result<Node> {
        let mut left = self.parse_compare()?;
        while self.match_token(TokenKind::And) {
            let right = self.parse_compare()?;
            left = Node::binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    /// `compare := add [op add]` — at most one comparison; the level
    /// does not recurse into itself, so `a < b < c` cannot parse
    fn parse_compare(&mut self) -> Result<Node> {
        let left = self.parse_add()?;

        let op = match self.current().kind {
            TokenKind::Ge => Some(BinOp::Ge),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Eq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::NotEq),
            _ => None,
        };

        match op {
            Some(op) => {
                self.advance();
                let right = self.parse_add()?;
                Ok(Node::binary(op, left, right))
            }
            None => Ok(left),
        }
    }

    /// `add := mult (('+'|'-') mult)*`
    fn parse_add(&mut self) -> Result<Node> {
        let mut left = self.parse_mult()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Add => BinOp::Add,
                TokenKind::Sub => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mult()?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    /// `mult := not (('*'|'/'|'%') not)*`
    fn parse_mult(&mut self) -> Result<Node> {
        let mut left = self.parse_not()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Mul => BinOp::Mul,
                TokenKind::Div => BinOp::Div,
                TokenKind::Mod => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_not()?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    /// `not := ['!'] group`
    fn parse_not(&mut self) -> Result<Node> {
        if self.match_token(TokenKind::Not) {
            let operand = self.parse_group()?;
            Ok(Node::unary(UnOp::Not, operand))
        } else {
            self.parse_group()
        }
    }

    /// `group := ident | number | '(' or ')' | call`
    fn parse_group(&mut self) -> Result<Node> {
        match self.current().kind {
            TokenKind::Number => {
                let value: f64 = self
                    .current_text()
                    .parse()
                    .map_err(|_| self.error("invalid numeric literal"))?;
                self.advance();
                Ok(Node::Num(value))
            }
            TokenKind::Ident => {
                if self.peek().kind == TokenKind::LParen {
                    self.parse_call()
                } else {
                    let name = self.current_text().to_string();
                    self.advance();
                    Ok(Node::Ident(name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.error("expected expression")),
        }
    }

    /// `call := ident '(' [or (',' or)*] ')'`
    fn parse_call(&mut self) -> Result<Node> {
        let name = self.current_text().to_string();
        self.advance(); // identifier
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            args.push(self.parse_expression()?);
            while self.match_token(TokenKind::Comma) {
                args.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(Node::Call { name, args })
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn current_text(&self) -> &str {
        self.current().text(self.source)
    }

    fn peek(&self) -> &Token {
        if self.pos + 1 < self.tokens.len() {
            &self.tokens[self.pos + 1]
        } else {
            &self.tokens[self.tokens.len() - 1]
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("expected {:?}", kind)))
        }
    }

    fn expect_ident(&mut self) -> Result<Node> {
        if self.check(TokenKind::Ident) {
            let name = self.current_text().to_string();
            self.advance();
            Ok(Node::Ident(name))
        } else {
            Err(self.error("expected identifier"))
        }
    }

    fn error(&self, message: &str) -> Error {
        let token = self.current();
        let found = if token.kind == TokenKind::EndOfInput {
            "end of input".to_string()
        } else {
            token.text(self.source).to_string()
        };
        Error::Syntax {
            message: message.to_string(),
            found,
            line: token.line,
            column: token.column,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Parse a query string into a SELECT tree.
///
/// Convenience wrapper for callers that do not inspect lexical
/// diagnostics; use [`Parser`] directly to report unclean input.
pub fn parse(source: &str) -> Result<Node> {
    Parser::new(source)?.parse_select()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(source: &str) -> Node {
        Parser::new(source).unwrap().parse_expression().unwrap()
    }

    fn ident(name: &str) -> Node {
        Node::ident(name)
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse_expr("1 + 2 * 3"),
            Node::binary(
                BinOp::Add,
                Node::Num(1.0),
                Node::binary(BinOp::Mul, Node::Num(2.0), Node::Num(3.0)),
            )
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        assert_eq!(
            parse_expr("8 - 3 - 2"),
            Node::binary(
                BinOp::Sub,
                Node::binary(BinOp::Sub, Node::Num(8.0), Node::Num(3.0)),
                Node::Num(2.0),
            )
        );
    }

    #[test]
    fn test_comparison_binds_tighter_than_and() {
        assert_eq!(
            parse_expr("a > 1 and b < 2"),
            Node::binary(
                BinOp::And,
                Node::binary(BinOp::Gt, ident("a"), Node::Num(1.0)),
                Node::binary(BinOp::Lt, ident("b"), Node::Num(2.0)),
            )
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            parse_expr("a and b || c and d"),
            Node::binary(
                BinOp::Or,
                Node::binary(BinOp::And, ident("a"), ident("b")),
                Node::binary(BinOp::And, ident("c"), ident("d")),
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            parse_expr("(1 + 2) * 3"),
            Node::binary(
                BinOp::Mul,
                Node::binary(BinOp::Add, Node::Num(1.0), Node::Num(2.0)),
                Node::Num(3.0),
            )
        );
    }

    #[test]
    fn test_not_prefix() {
        assert_eq!(
            parse_expr("!flag"),
            Node::unary(UnOp::Not, ident("flag"))
        );
    }

    #[test]
    fn test_call_with_arguments() {
        assert_eq!(
            parse_expr("max(a, b + 1)"),
            Node::Call {
                name: "max".to_string(),
                args: vec![
                    ident("a"),
                    Node::binary(BinOp::Add, ident("b"), Node::Num(1.0)),
                ],
            }
        );
    }

    #[test]
    fn test_call_without_arguments() {
        assert_eq!(
            parse_expr("now()"),
            Node::Call {
                name: "now".to_string(),
                args: Vec::new(),
            }
        );
    }

    #[test]
    fn test_chained_comparison_is_rejected() {
        let err = parse("select x from t where a < b < c").unwrap_err();
        match err {
            Error::Syntax { found, .. } => assert_eq!(found, "<"),
            other => panic!("expected Syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_projection_list_is_flat() {
        let select = parse("select a, b, c from t").unwrap();
        match &select.children()[0] {
            Node::Exprs(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], ident("a"));
                assert_eq!(items[2], ident("c"));
            }
            other => panic!("expected Exprs, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_is_an_as_operation() {
        let select = parse("select age as a from t").unwrap();
        match &select.children()[0] {
            Node::Exprs(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(
                    items[0],
                    Node::binary(BinOp::As, ident("age"), ident("a"))
                );
            }
            other => panic!("expected Exprs, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_alias_nests_left() {
        let select = parse("select x as a as b from t").unwrap();
        match &select.children()[0] {
            Node::Exprs(items) => assert_eq!(
                items[0],
                Node::binary(
                    BinOp::As,
                    Node::binary(BinOp::As, ident("x"), ident("a")),
                    ident("b"),
                )
            ),
            other => panic!("expected Exprs, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_target_must_be_identifier() {
        assert!(parse("select a as 1 from t").is_err());
    }

    #[test]
    fn test_join_chain_nests_left() {
        let select = parse("select x from a left join b on a.k == b.k cross join c").unwrap();
        let expected = Node::join(
            JoinKind::Cross,
            Node::join(
                JoinKind::Left,
                ident("a"),
                ident("b"),
                Some(Node::binary(BinOp::Eq, ident("a.k"), ident("b.k"))),
            ),
            ident("c"),
            None,
        );
        assert_eq!(*select.children()[1], expected);
    }

    #[test]
    fn test_cross_join_rejects_on_clause() {
        assert!(parse("select x from a cross join b on a.k == b.k").is_err());
    }

    #[test]
    fn test_non_cross_join_requires_on_clause() {
        assert!(parse("select x from a inner join b").is_err());
    }

    #[test]
    fn test_from_is_mandatory() {
        assert!(parse("select a").is_err());
        assert!(parse("select a where b > 1").is_err());
    }

    #[test]
    fn test_having_requires_group_by() {
        assert!(parse("select a from t having a > 1").is_err());
        assert!(parse("select a from t group by a having a > 1").is_ok());
    }

    #[test]
    fn test_order_by_requires_having() {
        assert!(parse("select a from t order by a").is_err());
        assert!(parse("select a from t group by a order by a").is_err());
        assert!(parse("select a from t group by a having a > 1 order by a").is_ok());
    }

    #[test]
    fn test_where_must_precede_group_by() {
        assert!(parse("select a from t group by a where a > 1").is_err());
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        assert!(parse("select a from t extra").is_err());
    }

    #[test]
    fn test_empty_projection_is_rejected() {
        assert!(parse("select from t").is_err());
    }

    #[test]
    fn test_select_has_uniform_shape() {
        for source in [
            "select a from t",
            "select a from t where a > 1",
            "select a from t group by a having a > 1 order by a",
        ] {
            let select = parse(source).unwrap();
            assert_eq!(select.children().len(), 6, "shape of {:?}", source);
        }
    }

    #[test]
    fn test_syntax_error_carries_position() {
        let err = parse("select a\nfrom t where").unwrap_err();
        match err {
            Error::Syntax {
                found,
                line,
                column,
                ..
            } => {
                assert_eq!(found, "end of input");
                assert_eq!(line, 2);
                assert_eq!(column, 13);
            }
            other => panic!("expected Syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_surfaces_lexical_diagnostics() {
        let parser = Parser::new("select ? from t").unwrap();
        assert_eq!(parser.diagnostics().len(), 1);
    }

    #[test]
    fn test_parse_still_succeeds_after_lexical_diagnostic() {
        // The bad character is skipped; the remaining stream is valid
        let mut parser = Parser::new("select a ? from t").unwrap();
        assert_eq!(parser.diagnostics().len(), 1);
        assert!(parser.parse_select().is_ok());
    }
}
