//! Query tokenization
//!
//! Implements the lexer for the restricted SELECT language: identifiers
//! (with one optional dotted qualifier), numeric literals, operators,
//! punctuation, and reserved keywords matched case-sensitively. The
//! lexer is resilient at the character level: an unrecognized character
//! becomes a collected diagnostic, never part of a token.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

// ============================================================================
// Token Types
// ============================================================================

/// Token kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Number,

    // Identifiers
    Ident,

    // Operators
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    Ge,     // >=
    Le,     // <=
    Gt,     // >
    Lt,     // <
    Eq,     // ==
    NotEq,  // !=
    Or,     // ||
    Not,    // !

    // Punctuation
    LParen, // (
    RParen, // )
    Comma,  // ,

    // Keywords
    And,
    As,
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Join,
    On,
    Left,
    Right,
    Inner,
    Full,
    Cross,

    // Special
    EndOfInput,
}

impl TokenKind {
    /// Check if this token is a reserved keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::As
                | TokenKind::Select
                | TokenKind::From
                | TokenKind::Where
                | TokenKind::Group
                | TokenKind::By
                | TokenKind::Having
                | TokenKind::Order
                | TokenKind::Join
                | TokenKind::On
                | TokenKind::Left
                | TokenKind::Right
                | TokenKind::Inner
                | TokenKind::Full
                | TokenKind::Cross
        )
    }
}

// ============================================================================
// Token
// ============================================================================

/// A token from the query source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token type
    pub kind: TokenKind,
    /// Start position in source
    pub start: usize,
    /// End position in source (exclusive)
    pub end: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, start: usize, end: usize, line: u32, column: u32) -> Self {
        Token {
            kind,
            start,
            end,
            line,
            column,
        }
    }

    /// Get the text of this token from the source
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Result of tokenizing a query.
///
/// `tokens` always ends with one [`TokenKind::EndOfInput`] token.
/// `diagnostics` holds the recoverable lexical errors encountered on
/// the way; when it is non-empty the stream is best-effort and the
/// caller should report that the input was not fully clean.
#[derive(Debug, Clone)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Error>,
}

// ============================================================================
// Tokenizer
// ============================================================================

/// Query tokenizer. Single-use: build one per input string.
pub struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire source.
    ///
    /// Fails only on numeric overflow; an unrecognized character is
    /// recorded as a diagnostic, skipped, and lexing resumes.
    pub fn tokenize(mut self) -> Result<Tokenized> {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_eof() {
                tokens.push(Token::new(
                    TokenKind::EndOfInput,
                    self.pos,
                    self.pos,
                    self.line,
                    self.column,
                ));
                break;
            }

            let start = self.pos;
            let line = self.line;
            let column = self.column;
            let c = self.current();

            if c.is_ascii_digit() {
                let kind = self.scan_number(line, column)?;
                tokens.push(Token::new(kind, start, self.pos, line, column));
            } else if c.is_ascii_alphabetic() || c == b'_' {
                let kind = self.scan_identifier();
                tokens.push(Token::new(kind, start, self.pos, line, column));
            } else if c.is_ascii() {
                match self.scan_operator() {
                    Some(kind) => tokens.push(Token::new(kind, start, self.pos, line, column)),
                    // scan_operator consumed the one offending character
                    None => diagnostics.push(Error::Lexical {
                        ch: c as char,
                        line,
                        column,
                    }),
                }
            } else {
                // Skip exactly one (multi-byte) character
                let ch = self.source[self.pos..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.pos += ch.len_utf8();
                self.column += 1;
                diagnostics.push(Error::Lexical { ch, line, column });
            }
        }

        Ok(Tokenized {
            tokens,
            diagnostics,
        })
    }

    /// Scan a numeric literal: a maximal run of decimal digits.
    ///
    /// Overflow policy is rejection: a literal that does not fit in an
    /// `i64` fails tokenization instead of being silently truncated.
    fn scan_number(&mut self, line: u32, column: u32) -> Result<TokenKind> {
        let start = self.pos;

        while !self.is_eof() && self.current().is_ascii_digit() {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        if text.parse::<i64>().is_err() {
            return Err(Error::NumericOverflow {
                text: text.to_string(),
                line,
                column,
            });
        }

        Ok(TokenKind::Number)
    }

    /// Scan an identifier or keyword.
    ///
    /// Identifiers admit one optional dotted qualifier (`table.column`);
    /// the qualifier may be empty, so `t.` is a single token. The raw
    /// text is then looked up in the keyword table.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;

        while !self.is_eof() {
            let c = self.current();
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        if !self.is_eof() && self.current() == b'.' {
            self.advance();
            while !self.is_eof() {
                let c = self.current();
                if c.is_ascii_alphanumeric() || c == b'_' {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        keyword_or_identifier(&self.source[start..self.pos])
    }

    /// Scan an operator or punctuation token.
    ///
    /// Consumes one character, plus a second for the two-character
    /// operators. Returns `None` when the consumed character begins no
    /// token of the language; the tokenizer reports it and resumes.
    fn scan_operator(&mut self) -> Option<TokenKind> {
        let c = self.current();
        self.advance();

        match c {
            b'+' => Some(TokenKind::Add),
            b'-' => Some(TokenKind::Sub),
            b'*' => Some(TokenKind::Mul),
            b'/' => Some(TokenKind::Div),
            b'%' => Some(TokenKind::Mod),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b',' => Some(TokenKind::Comma),
            b'>' => {
                if !self.is_eof() && self.current() == b'=' {
                    self.advance();
                    Some(TokenKind::Ge)
                } else {
                    Some(TokenKind::Gt)
                }
            }
            b'<' => {
                if !self.is_eof() && self.current() == b'=' {
                    self.advance();
                    Some(TokenKind::Le)
                } else {
                    Some(TokenKind::Lt)
                }
            }
            b'!' => {
                if !self.is_eof() && self.current() == b'=' {
                    self.advance();
                    Some(TokenKind::NotEq)
                } else {
                    Some(TokenKind::Not)
                }
            }
            // '=' and '|' only form tokens as '==' and '||'
            b'=' => {
                if !self.is_eof() && self.current() == b'=' {
                    self.advance();
                    Some(TokenKind::Eq)
                } else {
                    None
                }
            }
            b'|' => {
                if !self.is_eof() && self.current() == b'|' {
                    self.advance();
                    Some(TokenKind::Or)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            // Skip whitespace
            while !self.is_eof() && self.current().is_ascii_whitespace() {
                if self.current() == b'\n' {
                    self.line += 1;
                    self.column = 0;
                }
                self.advance();
            }

            if self.is_eof() {
                break;
            }

            // Skip // comments
            if self.current() == b'/' && self.peek() == Some(b'/') {
                while !self.is_eof() && self.current() != b'\n' {
                    self.advance();
                }
                continue;
            }

            // Skip /* */ comments (non-greedy; unterminated runs to EOF)
            if self.current() == b'/' && self.peek() == Some(b'*') {
                self.advance();
                self.advance();
                while !self.is_eof() {
                    if self.current() == b'*' && self.peek() == Some(b'/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.current() == b'\n' {
                        self.line += 1;
                        self.column = 0;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    /// Check if at end of input
    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Get current byte
    fn current(&self) -> u8 {
        self.bytes[self.pos]
    }

    /// Peek at next byte
    fn peek(&self) -> Option<u8> {
        if self.pos + 1 < self.bytes.len() {
            Some(self.bytes[self.pos + 1])
        } else {
            None
        }
    }

    /// Advance to next byte
    fn advance(&mut self) {
        self.pos += 1;
        self.column += 1;
    }
}

// ============================================================================
// Keyword Recognition
// ============================================================================

lazy_static! {
    /// Reserved words of the language, matched case-sensitively against
    /// the raw identifier text. Built once, never mutated, shared by
    /// every tokenizer instance.
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("and", TokenKind::And);
        map.insert("as", TokenKind::As);
        map.insert("select", TokenKind::Select);
        map.insert("from", TokenKind::From);
        map.insert("where", TokenKind::Where);
        map.insert("group", TokenKind::Group);
        map.insert("by", TokenKind::By);
        map.insert("having", TokenKind::Having);
        map.insert("order", TokenKind::Order);
        map.insert("join", TokenKind::Join);
        map.insert("on", TokenKind::On);
        map.insert("left", TokenKind::Left);
        map.insert("right", TokenKind::Right);
        map.insert("inner", TokenKind::Inner);
        map.insert("full", TokenKind::Full);
        map.insert("cross", TokenKind::Cross);
        map
    };
}

/// Map a text to a keyword or identifier token
fn keyword_or_identifier(text: &str) -> TokenKind {
    KEYWORDS.get(text).copied().unwrap_or(TokenKind::Ident)
}

// ============================================================================
// Public API
// ============================================================================

/// Tokenize a query string
pub fn tokenize(source: &str) -> Result<Tokenized> {
    Tokenizer::new(source).tokenize()
}

// ============================================================================
// Tests
// ============================================================================
