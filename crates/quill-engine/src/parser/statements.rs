//! Statement parsing.
//!
//! Statements are chosen by their first token, in this order:
//!
//! | First token | Statement |
//! |-------------|-----------|
//! | `;` | empty statement |
//! | `{` | block |
//! | `return` `break` `continue` | control transfer |
//! | `if` `while` `do` `for` | control flow |
//! | `var` | variable statement |
//! | `function` | function declaration |
//! | anything else | expression statement |
//!
//! ## Grammar
//!
//! ```text
//! IfStatement :
//!     if ( Expression ) Statement [else Statement]
//!
//! IterationStatement :
//!     do Statement while ( Expression ) [;]
//!     while ( Expression ) Statement
//!     for ( [VarList | Expression] ; [Expression] ; [Expression] ) Statement
//!
//! VariableStatement :
//!     var Identifier [= AssignmentExpression] {, Identifier [= AssignmentExpression]} ;
//! ```
//!
//! Statements that end in `;` go through semicolon insertion, see
//! `Parser::consume_semicolon`.

use super::Parser;
use super::expressions::COMMA;
use crate::ast::{ForStatement, IfStatement, Node, VariableDeclarator, WhileStatement};
use crate::error::{Error, Result};
use crate::lexer::{LexMode, TokenKind};

impl Parser<'_> {
    /// Parses a single statement.
    pub(super) fn statement(&mut self) -> Result<Node> {
        match self.peek_kind(LexMode::Prefix)? {
            TokenKind::Semicolon => {
                self.advance(LexMode::Prefix)?;
                Ok(Node::Empty)
            }
            TokenKind::LeftBrace => Ok(Node::Block(self.block_body()?)),
            TokenKind::Return => self.return_statement(),
            TokenKind::Break | TokenKind::Continue => self.jump_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Do => self.do_while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Var => {
                self.advance(LexMode::Prefix)?;
                let declarations = self.variable_declarations()?;
                self.consume_semicolon()?;
                Ok(Node::VariableStatement(declarations))
            }
            TokenKind::Function => {
                self.advance(LexMode::Prefix)?;
                Ok(Node::FunctionDeclaration(self.function_definition(true)?))
            }
            _ => {
                let expression = self.expression(0)?;
                self.consume_semicolon()?;
                Ok(expression)
            }
        }
    }

    /// Parses `{ statements }` and returns the statements.
    pub(super) fn block_body(&mut self) -> Result<Vec<Node>> {
        self.expect(&TokenKind::LeftBrace, LexMode::Prefix)?;

        let mut body = Vec::new();
        loop {
            match self.peek_kind(LexMode::Prefix)? {
                TokenKind::RightBrace => break,
                TokenKind::Eof => {
                    return Err(self.unexpected(LexMode::Prefix, TokenKind::RightBrace.to_string())?);
                }
                _ => body.push(self.statement()?),
            }
        }
        self.advance(LexMode::Prefix)?;

        Ok(body)
    }

    fn return_statement(&mut self) -> Result<Node> {
        self.advance(LexMode::Prefix)?; // consume 'return'

        // `return` followed by a line break returns nothing
        let lookahead = self.peek(LexMode::Prefix)?;
        let bare = lookahead.line_break
            || matches!(
                lookahead.token.kind,
                TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
            );

        let argument = if bare {
            None
        } else {
            Some(Box::new(self.expression(0)?))
        };
        self.consume_semicolon()?;

        Ok(Node::Return(argument))
    }

    fn jump_statement(&mut self) -> Result<Node> {
        let token = self.advance(LexMode::Prefix)?;
        if self.loop_depth == 0 {
            return Err(Error::unexpected(
                token.kind,
                token.span.start,
                "statement outside of a loop",
            ));
        }
        self.consume_semicolon()?;

        Ok(if token.kind == TokenKind::Break {
            Node::Break
        } else {
            Node::Continue
        })
    }

    fn if_statement(&mut self) -> Result<Node> {
        self.advance(LexMode::Prefix)?; // consume 'if'
        let test = self.condition()?;
        let consequent = self.statement()?;
        let alternate = if self.eat(&TokenKind::Else, LexMode::Prefix)? {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Node::If(IfStatement {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate,
        }))
    }

    fn while_statement(&mut self) -> Result<Node> {
        self.advance(LexMode::Prefix)?; // consume 'while'
        let test = self.condition()?;
        let body = self.loop_body()?;

        Ok(Node::While(WhileStatement {
            test: Box::new(test),
            body: Box::new(body),
        }))
    }

    fn do_while_statement(&mut self) -> Result<Node> {
        self.advance(LexMode::Prefix)?; // consume 'do'
        let body = self.loop_body()?;
        self.expect(&TokenKind::While, LexMode::Prefix)?;
        let test = self.condition()?;
        self.eat(&TokenKind::Semicolon, LexMode::Infix)?;

        Ok(Node::DoWhile(WhileStatement {
            test: Box::new(test),
            body: Box::new(body),
        }))
    }

    fn for_statement(&mut self) -> Result<Node> {
        self.advance(LexMode::Prefix)?; // consume 'for'
        self.expect(&TokenKind::LeftParen, LexMode::Prefix)?;

        let init = match self.peek_kind(LexMode::Prefix)? {
            TokenKind::Semicolon => None,
            TokenKind::Var => {
                self.advance(LexMode::Prefix)?;
                Some(Node::VariableStatement(self.variable_declarations()?))
            }
            _ => Some(self.expression(0)?),
        };
        self.expect(&TokenKind::Semicolon, LexMode::Infix)?;

        let test = if self.check(&TokenKind::Semicolon, LexMode::Prefix)? {
            None
        } else {
            Some(self.expression(0)?)
        };
        self.expect(&TokenKind::Semicolon, LexMode::Infix)?;

        let update = if self.check(&TokenKind::RightParen, LexMode::Prefix)? {
            None
        } else {
            Some(self.expression(0)?)
        };
        self.expect(&TokenKind::RightParen, LexMode::Infix)?;

        let body = self.loop_body()?;

        Ok(Node::For(ForStatement {
            init: init.map(Box::new),
            test: test.map(Box::new),
            update: update.map(Box::new),
            body: Box::new(body),
        }))
    }

    /// Parses `( Expression )` after `if` or `while`.
    fn condition(&mut self) -> Result<Node> {
        self.expect(&TokenKind::LeftParen, LexMode::Prefix)?;
        let test = self.expression(0)?;
        self.expect(&TokenKind::RightParen, LexMode::Infix)?;
        Ok(test)
    }

    fn loop_body(&mut self) -> Result<Node> {
        self.loop_depth += 1;
        let body = self.statement();
        self.loop_depth -= 1;
        body
    }

    /// Parses the declarator list after `var`, without the terminator.
    fn variable_declarations(&mut self) -> Result<Vec<VariableDeclarator>> {
        let mut declarations = Vec::new();

        loop {
            let name = self.expect_identifier()?;
            let init = if self.eat(&TokenKind::Equal, LexMode::Infix)? {
                Some(self.expression(COMMA)?)
            } else {
                None
            };

            declarations.push(VariableDeclarator { name, init });

            if !self.eat(&TokenKind::Comma, LexMode::Infix)? {
                break;
            }
        }

        Ok(declarations)
    }
}
