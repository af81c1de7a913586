//! The main parser implementation.
//!
//! Tokens are pulled from the lexer one at a time. Each request names the
//! [`LexMode`] for the position being parsed, so the same source offset can
//! be rescanned when the parser changes its mind about what comes next.

use crate::ast::{Node, Program};
use crate::error::{Error, Result};
use crate::lexer::{LexMode, Token, TokenKind, next_token};

/// The next significant token, scanned but not yet consumed.
#[derive(Debug, Clone)]
pub(super) struct Lookahead {
    pub(super) token: Token,
    /// Offset just past the token
    end: usize,
    /// Mode the token was scanned in
    mode: LexMode,
    /// Whether a line terminator separates it from the previous token
    pub(super) line_break: bool,
}

/// A precedence-climbing parser.
pub struct Parser<'a> {
    source: &'a str,
    /// Offset just past the last consumed token
    offset: usize,
    lookahead: Option<Lookahead>,
    /// Number of loops enclosing the current statement inside the current function
    pub(super) loop_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            lookahead: None,
            loop_depth: 0,
        }
    }

    /// Parses the source code into a Program AST node.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut body = Vec::new();

        while !self.check(&TokenKind::Eof, LexMode::Prefix)? {
            body.push(self.statement()?);
        }

        Ok(Program { body })
    }

    /// Parses source consisting of exactly one expression.
    pub fn parse_expression(&mut self) -> Result<Node> {
        let node = self.expression(0)?;
        self.expect(&TokenKind::Eof, LexMode::Infix)?;
        Ok(node)
    }

    // Helper methods

    /// Returns the next significant token scanned in `mode`.
    ///
    /// Line breaks are folded into the returned lookahead's `line_break` flag.
    pub(super) fn peek(&mut self, mode: LexMode) -> Result<&Lookahead> {
        let cached = self
            .lookahead
            .as_ref()
            .is_some_and(|lookahead| lookahead.mode == mode);

        if !cached {
            let mut offset = self.offset;
            let mut line_break = false;
            let (token, end) = loop {
                let (token, end) = next_token(self.source, offset, mode)?;
                if token.kind == TokenKind::LineBreak {
                    line_break = true;
                    offset = end;
                } else {
                    break (token, end);
                }
            };
            self.lookahead = Some(Lookahead {
                token,
                end,
                mode,
                line_break,
            });
        }

        self.lookahead
            .as_ref()
            .ok_or_else(|| Error::Internal("lookahead missing after scan".into()))
    }

    /// Returns the kind of the next significant token.
    pub(super) fn peek_kind(&mut self, mode: LexMode) -> Result<&TokenKind> {
        Ok(&self.peek(mode)?.token.kind)
    }

    /// Consumes and returns the next significant token.
    pub(super) fn advance(&mut self, mode: LexMode) -> Result<Token> {
        self.peek(mode)?;
        let lookahead = self
            .lookahead
            .take()
            .ok_or_else(|| Error::Internal("lookahead missing after scan".into()))?;
        self.offset = lookahead.end;
        Ok(lookahead.token)
    }

    pub(super) fn check(&mut self, kind: &TokenKind, mode: LexMode) -> Result<bool> {
        Ok(std::mem::discriminant(self.peek_kind(mode)?) == std::mem::discriminant(kind))
    }

    /// Consumes the next token if it has the given kind.
    pub(super) fn eat(&mut self, kind: &TokenKind, mode: LexMode) -> Result<bool> {
        if self.check(kind, mode)? {
            self.advance(mode)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(super) fn expect(&mut self, kind: &TokenKind, mode: LexMode) -> Result<Token> {
        if self.check(kind, mode)? {
            self.advance(mode)
        } else {
            Err(self.unexpected(mode, kind.to_string())?)
        }
    }

    pub(super) fn expect_identifier(&mut self) -> Result<String> {
        let token = self.advance(LexMode::Prefix)?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            found => Err(Error::unexpected(found, token.span.start, "identifier")),
        }
    }

    /// Builds a parse error for the next token.
    pub(super) fn unexpected(&mut self, mode: LexMode, expected: impl Into<String>) -> Result<Error> {
        let token = &self.peek(mode)?.token;
        Ok(Error::unexpected(
            token.kind.clone(),
            token.span.start,
            expected,
        ))
    }

    /// Consumes a statement-terminating `;` or applies semicolon insertion.
    ///
    /// A missing `;` is accepted before `}`, at end of input, or when a line
    /// break separates the next token from the statement.
    pub(super) fn consume_semicolon(&mut self) -> Result<()> {
        let lookahead = self.peek(LexMode::Infix)?;
        let explicit = lookahead.token.kind == TokenKind::Semicolon;
        let inserted = lookahead.line_break
            || matches!(lookahead.token.kind, TokenKind::RightBrace | TokenKind::Eof);

        if explicit {
            self.advance(LexMode::Infix)?;
            Ok(())
        } else if inserted {
            Ok(())
        } else {
            Err(self.unexpected(LexMode::Infix, TokenKind::Semicolon.to_string())?)
        }
    }
}
