//! Expression parsing by precedence climbing.
//!
//! Every token kind has a left binding power. A token that can start an
//! expression has a prefix production; a token that can follow one has a
//! suffix production. `expression(min)` runs one prefix production, then
//! keeps applying suffix productions while the next token binds tighter
//! than `min`.
//!
//! ## Binding Powers (lowest to highest)
//!
//! | Power | Operators |
//! |-------|-----------|
//! | 10 | `,` |
//! | 20 | `=` `+=` `-=` etc. |
//! | 30 | `?:` |
//! | 40 | `\|\|` |
//! | 50 | `&&` |
//! | 60 | `\|` |
//! | 70 | `^` |
//! | 80 | `&` |
//! | 90 | `==` `!=` `===` `!==` |
//! | 100 | `<` `>` `<=` `>=` |
//! | 110 | `<<` `>>` `>>>` |
//! | 120 | `+` `-` |
//! | 130 | `*` `/` `%` |
//! | 140 | operand of prefix `!` `~` `+` `-` `typeof` `void` `delete` `++` `--` |
//! | 150 | postfix `++` `--` |
//! | 160 | `.` `[]` `()` |
//!
//! A binary operator parses its right operand at its own power, which makes
//! operators of equal power left-associative. Assignment right-hand sides
//! and both branches of `?:` are parsed at comma power, so they may contain
//! nested assignments and conditionals but never a bare `,`.

use std::rc::Rc;

use super::Parser;
use crate::ast::{
    AssignmentOperator, BinaryOperator, FunctionDefinition, Node, UnaryOperator, UpdateOperator,
};
use crate::error::{Error, Result};
use crate::lexer::{LexMode, Token, TokenKind};

pub(super) const COMMA: u8 = 10;
const ASSIGNMENT: u8 = 20;
const CONDITIONAL: u8 = 30;
const LOGICAL_OR: u8 = 40;
const LOGICAL_AND: u8 = 50;
const BITWISE_OR: u8 = 60;
const BITWISE_XOR: u8 = 70;
const BITWISE_AND: u8 = 80;
const EQUALITY: u8 = 90;
const RELATIONAL: u8 = 100;
const SHIFT: u8 = 110;
const ADDITIVE: u8 = 120;
const MULTIPLICATIVE: u8 = 130;
const UNARY: u8 = 140;
const POSTFIX: u8 = 150;
const MEMBER: u8 = 160;

/// Left binding power of a token in operator position.
///
/// Tokens without a suffix production return 0 and end the expression.
pub fn binding_power(kind: &TokenKind) -> u8 {
    match kind {
        TokenKind::Comma => COMMA,
        TokenKind::Equal
        | TokenKind::PlusEqual
        | TokenKind::MinusEqual
        | TokenKind::StarEqual
        | TokenKind::SlashEqual
        | TokenKind::PercentEqual
        | TokenKind::LeftShiftEqual
        | TokenKind::RightShiftEqual
        | TokenKind::UnsignedRightShiftEqual
        | TokenKind::AmpersandEqual
        | TokenKind::PipeEqual
        | TokenKind::CaretEqual => ASSIGNMENT,
        TokenKind::Question => CONDITIONAL,
        TokenKind::PipePipe => LOGICAL_OR,
        TokenKind::AmpersandAmpersand => LOGICAL_AND,
        TokenKind::Pipe => BITWISE_OR,
        TokenKind::Caret => BITWISE_XOR,
        TokenKind::Ampersand => BITWISE_AND,
        TokenKind::EqualEqual
        | TokenKind::NotEqual
        | TokenKind::StrictEqual
        | TokenKind::StrictNotEqual => EQUALITY,
        TokenKind::LessThan
        | TokenKind::GreaterThan
        | TokenKind::LessThanEqual
        | TokenKind::GreaterThanEqual => RELATIONAL,
        TokenKind::LeftShift | TokenKind::RightShift | TokenKind::UnsignedRightShift => SHIFT,
        TokenKind::Plus | TokenKind::Minus => ADDITIVE,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => MULTIPLICATIVE,
        TokenKind::PlusPlus | TokenKind::MinusMinus => POSTFIX,
        TokenKind::Dot | TokenKind::LeftBracket | TokenKind::LeftParen => MEMBER,
        _ => 0,
    }
}

fn binary_operator(kind: &TokenKind) -> Option<BinaryOperator> {
    let op = match kind {
        TokenKind::Comma => BinaryOperator::Sequence,
        TokenKind::PipePipe => BinaryOperator::Or,
        TokenKind::AmpersandAmpersand => BinaryOperator::And,
        TokenKind::Pipe => BinaryOperator::BitwiseOr,
        TokenKind::Caret => BinaryOperator::BitwiseXOr,
        TokenKind::Ampersand => BinaryOperator::BitwiseAnd,
        TokenKind::EqualEqual => BinaryOperator::Equal,
        TokenKind::NotEqual => BinaryOperator::NotEqual,
        TokenKind::StrictEqual => BinaryOperator::StrictlyEqual,
        TokenKind::StrictNotEqual => BinaryOperator::StrictlyNotEqual,
        TokenKind::LessThan => BinaryOperator::LessThan,
        TokenKind::GreaterThan => BinaryOperator::GreaterThan,
        TokenKind::LessThanEqual => BinaryOperator::LessThanOrEqual,
        TokenKind::GreaterThanEqual => BinaryOperator::GreaterThanOrEqual,
        TokenKind::LeftShift => BinaryOperator::LeftShift,
        TokenKind::RightShift => BinaryOperator::SignedRightShift,
        TokenKind::UnsignedRightShift => BinaryOperator::UnsignedRightShift,
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::Percent => BinaryOperator::Modulus,
        _ => return None,
    };
    Some(op)
}

fn assignment_operator(kind: &TokenKind) -> Option<AssignmentOperator> {
    let op = match kind {
        TokenKind::Equal => AssignmentOperator::Assign,
        TokenKind::PlusEqual => AssignmentOperator::AddAssign,
        TokenKind::MinusEqual => AssignmentOperator::SubtractAssign,
        TokenKind::StarEqual => AssignmentOperator::MultiplyAssign,
        TokenKind::SlashEqual => AssignmentOperator::DivideAssign,
        TokenKind::PercentEqual => AssignmentOperator::ModulusAssign,
        TokenKind::LeftShiftEqual => AssignmentOperator::LeftShiftAssign,
        TokenKind::RightShiftEqual => AssignmentOperator::SignedRightShiftAssign,
        TokenKind::UnsignedRightShiftEqual => AssignmentOperator::UnsignedRightShiftAssign,
        TokenKind::AmpersandEqual => AssignmentOperator::BitwiseAndAssign,
        TokenKind::PipeEqual => AssignmentOperator::BitwiseOrAssign,
        TokenKind::CaretEqual => AssignmentOperator::BitwiseXOrAssign,
        _ => return None,
    };
    Some(op)
}

fn update_operator(kind: &TokenKind, postfix: bool) -> Option<UpdateOperator> {
    let op = match (kind, postfix) {
        (TokenKind::PlusPlus, false) => UpdateOperator::PreIncrement,
        (TokenKind::MinusMinus, false) => UpdateOperator::PreDecrement,
        (TokenKind::PlusPlus, true) => UpdateOperator::PostIncrement,
        (TokenKind::MinusMinus, true) => UpdateOperator::PostDecrement,
        _ => return None,
    };
    Some(op)
}

fn unary_operator(kind: &TokenKind) -> Option<UnaryOperator> {
    let op = match kind {
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Minus => UnaryOperator::Minus,
        TokenKind::Bang => UnaryOperator::Not,
        TokenKind::Tilde => UnaryOperator::BitwiseNot,
        TokenKind::Typeof => UnaryOperator::TypeOf,
        TokenKind::Void => UnaryOperator::Void,
        TokenKind::Delete => UnaryOperator::Delete,
        _ => return None,
    };
    Some(op)
}

impl Parser<'_> {
    /// Parses an expression whose operators all bind tighter than `min_power`.
    pub(super) fn expression(&mut self, min_power: u8) -> Result<Node> {
        let token = self.advance(LexMode::Prefix)?;
        let mut left = self.prefix(token)?;

        loop {
            let lookahead = self.peek(LexMode::Infix)?;
            let kind = &lookahead.token.kind;
            // `a\n++b` is `a; ++b`
            let restricted =
                lookahead.line_break && matches!(kind, TokenKind::PlusPlus | TokenKind::MinusMinus);
            if restricted || binding_power(kind) <= min_power {
                break;
            }

            let token = self.advance(LexMode::Infix)?;
            left = self.suffix(token, left)?;
        }

        Ok(left)
    }

    fn prefix(&mut self, token: Token) -> Result<Node> {
        if let Some(operator) = update_operator(&token.kind, false) {
            let argument = self.expression(UNARY)?;
            return Ok(Node::update(operator, assignment_target(argument, &token)?));
        }

        let offset = token.span.start;
        let node = match token.kind {
            TokenKind::Number(n) => Node::Number(n),
            TokenKind::String(s) => Node::String(s),
            TokenKind::Boolean(b) => Node::Boolean(b),
            TokenKind::Null => Node::Null,
            TokenKind::RegExp { pattern, flags } => Node::RegExp { pattern, flags },
            TokenKind::Identifier(name) => Node::Identifier(name),
            TokenKind::LeftParen => {
                let inner = self.expression(0)?;
                self.expect(&TokenKind::RightParen, LexMode::Infix)?;
                inner
            }
            TokenKind::Function => Node::Function(self.function_definition(false)?),
            kind => match unary_operator(&kind) {
                Some(operator) => Node::unary(operator, self.expression(UNARY)?),
                None => return Err(Error::unexpected(kind, offset, "expression")),
            },
        };
        Ok(node)
    }

    fn suffix(&mut self, token: Token, left: Node) -> Result<Node> {
        let power = binding_power(&token.kind);

        if let Some(operator) = binary_operator(&token.kind) {
            let right = self.expression(power)?;
            return Ok(Node::binary(operator, left, right));
        }

        if let Some(operator) = assignment_operator(&token.kind) {
            let target = assignment_target(left, &token)?;
            let value = self.expression(COMMA)?;
            return Ok(Node::assignment(operator, target, value));
        }

        if let Some(operator) = update_operator(&token.kind, true) {
            return Ok(Node::update(operator, assignment_target(left, &token)?));
        }

        let node = match token.kind {
            TokenKind::Question => {
                let consequent = self.expression(COMMA)?;
                self.expect(&TokenKind::Colon, LexMode::Infix)?;
                let alternate = self.expression(COMMA)?;
                Node::condition(left, consequent, alternate)
            }
            TokenKind::Dot => {
                let name = self.expect_identifier()?;
                Node::property(left, Node::String(name))
            }
            TokenKind::LeftBracket => {
                let property = self.expression(0)?;
                self.expect(&TokenKind::RightBracket, LexMode::Infix)?;
                Node::property(left, property)
            }
            TokenKind::LeftParen => Node::call(left, self.arguments()?),
            kind => return Err(Error::unexpected(kind, token.span.start, "operator")),
        };
        Ok(node)
    }

    /// Parses call arguments after the opening `(`.
    fn arguments(&mut self) -> Result<Vec<Node>> {
        let mut arguments = Vec::new();
        if self.eat(&TokenKind::RightParen, LexMode::Prefix)? {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.expression(COMMA)?);
            if !self.eat(&TokenKind::Comma, LexMode::Infix)? {
                break;
            }
        }
        self.expect(&TokenKind::RightParen, LexMode::Infix)?;

        Ok(arguments)
    }

    /// Parses a function after the `function` keyword.
    ///
    /// Declarations must be named; expressions may be anonymous.
    pub(super) fn function_definition(&mut self, declaration: bool) -> Result<FunctionDefinition> {
        let name = if declaration || !self.check(&TokenKind::LeftParen, LexMode::Prefix)? {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        self.expect(&TokenKind::LeftParen, LexMode::Prefix)?;
        let mut params = Vec::new();
        if !self.eat(&TokenKind::RightParen, LexMode::Prefix)? {
            loop {
                params.push(self.expect_identifier()?);
                if !self.eat(&TokenKind::Comma, LexMode::Infix)? {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen, LexMode::Infix)?;
        }

        // Loops outside the function do not enclose its body
        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.block_body();
        self.loop_depth = outer_loops;

        Ok(FunctionDefinition {
            name,
            params,
            body: Rc::from(body?),
        })
    }
}

/// Checks that `node`, the operand of `operator`, can be assigned to.
fn assignment_target(node: Node, operator: &Token) -> Result<Node> {
    if node.is_assignment_target() {
        Ok(node)
    } else {
        Err(Error::unexpected(
            operator.kind.clone(),
            operator.span.start,
            "assignment target",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expr(src: &str) -> Node {
        Parser::new(src).parse_expression().unwrap()
    }

    fn expr_err(src: &str) -> Error {
        Parser::new(src).parse_expression().unwrap_err()
    }

    fn num(n: f64) -> Node {
        Node::Number(n)
    }

    fn id(name: &str) -> Node {
        Node::identifier(name)
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr("1"), num(1.0));
        assert_eq!(expr("true"), Node::Boolean(true));
        assert_eq!(expr("null"), Node::Null);
        assert_eq!(expr("'foo'"), Node::string("foo"));
        assert_eq!(expr("foo"), id("foo"));
        assert_eq!(
            expr("/a|b/i"),
            Node::RegExp {
                pattern: "a|b".into(),
                flags: "i".into()
            }
        );
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            expr("1 + 2 * 3"),
            Node::binary(
                BinaryOperator::Add,
                num(1.0),
                Node::binary(BinaryOperator::Multiply, num(2.0), num(3.0))
            )
        );
        assert_eq!(
            expr("1 * 2 + 3"),
            Node::binary(
                BinaryOperator::Add,
                Node::binary(BinaryOperator::Multiply, num(1.0), num(2.0)),
                num(3.0)
            )
        );
    }

    #[test]
    fn test_equal_powers_are_left_associative() {
        assert_eq!(
            expr("1 * 2 / 3"),
            Node::binary(
                BinaryOperator::Divide,
                Node::binary(BinaryOperator::Multiply, num(1.0), num(2.0)),
                num(3.0)
            )
        );
        assert_eq!(
            expr("8 - 4 - 2"),
            Node::binary(
                BinaryOperator::Subtract,
                Node::binary(BinaryOperator::Subtract, num(8.0), num(4.0)),
                num(2.0)
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            expr("(1 + 2) * 3"),
            Node::binary(
                BinaryOperator::Multiply,
                Node::binary(BinaryOperator::Add, num(1.0), num(2.0)),
                num(3.0)
            )
        );
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        assert_eq!(
            expr("-1+-+2"),
            Node::binary(
                BinaryOperator::Add,
                Node::unary(UnaryOperator::Minus, num(1.0)),
                Node::unary(
                    UnaryOperator::Minus,
                    Node::unary(UnaryOperator::Plus, num(2.0))
                )
            )
        );
        assert_eq!(
            expr("!a && typeof b"),
            Node::binary(
                BinaryOperator::And,
                Node::unary(UnaryOperator::Not, id("a")),
                Node::unary(UnaryOperator::TypeOf, id("b"))
            )
        );
    }

    #[test]
    fn test_conditional_is_right_associative() {
        assert_eq!(
            expr("1 ? 2 : 3 ? 4 : 5"),
            Node::condition(
                num(1.0),
                num(2.0),
                Node::condition(num(3.0), num(4.0), num(5.0))
            )
        );
    }

    #[test]
    fn test_logical_operators_precedence() {
        assert_eq!(
            expr("a || b && c"),
            Node::binary(
                BinaryOperator::Or,
                id("a"),
                Node::binary(BinaryOperator::And, id("b"), id("c"))
            )
        );
        assert_eq!(
            expr("a || b ? c : d"),
            Node::condition(
                Node::binary(BinaryOperator::Or, id("a"), id("b")),
                id("c"),
                id("d")
            )
        );
    }

    #[test]
    fn test_comma_is_lower_than_assignment() {
        assert_eq!(
            expr("a=1,b=2"),
            Node::binary(
                BinaryOperator::Sequence,
                Node::assignment(AssignmentOperator::Assign, id("a"), num(1.0)),
                Node::assignment(AssignmentOperator::Assign, id("b"), num(2.0))
            )
        );
    }

    #[test]
    fn test_assignment_chains_to_the_right() {
        assert_eq!(
            expr("a = b += 2"),
            Node::assignment(
                AssignmentOperator::Assign,
                id("a"),
                Node::assignment(AssignmentOperator::AddAssign, id("b"), num(2.0))
            )
        );
    }

    #[test]
    fn test_all_compound_assignments() {
        let cases = [
            ("-=", AssignmentOperator::SubtractAssign),
            ("*=", AssignmentOperator::MultiplyAssign),
            ("/=", AssignmentOperator::DivideAssign),
            ("%=", AssignmentOperator::ModulusAssign),
            ("<<=", AssignmentOperator::LeftShiftAssign),
            (">>=", AssignmentOperator::SignedRightShiftAssign),
            (">>>=", AssignmentOperator::UnsignedRightShiftAssign),
            ("&=", AssignmentOperator::BitwiseAndAssign),
            ("|=", AssignmentOperator::BitwiseOrAssign),
            ("^=", AssignmentOperator::BitwiseXOrAssign),
        ];
        for (op, expected) in cases {
            assert_eq!(
                expr(&format!("x {} 1", op)),
                Node::assignment(expected, id("x"), num(1.0))
            );
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert!(matches!(
            expr_err("1 = 2"),
            Error::ParseError { ref expected, offset: 2, .. } if expected == "assignment target"
        ));
        assert!(matches!(
            expr_err("a + b = c"),
            Error::ParseError { ref expected, .. } if expected == "assignment target"
        ));
        assert!(matches!(
            expr_err("++f()"),
            Error::ParseError { ref expected, .. } if expected == "assignment target"
        ));
    }

    #[test]
    fn test_update_expressions() {
        assert_eq!(
            expr("++a"),
            Node::update(UpdateOperator::PreIncrement, id("a"))
        );
        assert_eq!(
            expr("a--"),
            Node::update(UpdateOperator::PostDecrement, id("a"))
        );
        assert_eq!(
            expr("-a++"),
            Node::unary(
                UnaryOperator::Minus,
                Node::update(UpdateOperator::PostIncrement, id("a"))
            )
        );
    }

    #[test]
    fn test_member_and_call_chain_left_to_right() {
        assert_eq!(
            expr("a.b(1, 2)[c]++"),
            Node::update(
                UpdateOperator::PostIncrement,
                Node::property(
                    Node::call(
                        Node::property(id("a"), Node::string("b")),
                        vec![num(1.0), num(2.0)]
                    ),
                    id("c")
                )
            )
        );
    }

    #[test]
    fn test_call_arguments_exclude_comma_operator() {
        assert_eq!(
            expr("f(a = 1, (b, c))"),
            Node::call(
                id("f"),
                vec![
                    Node::assignment(AssignmentOperator::Assign, id("a"), num(1.0)),
                    Node::binary(BinaryOperator::Sequence, id("b"), id("c")),
                ]
            )
        );
        assert_eq!(expr("f()"), Node::call(id("f"), vec![]));
    }

    #[test]
    fn test_division_and_regexp_in_one_expression() {
        assert_eq!(
            expr("a / /b/"),
            Node::binary(
                BinaryOperator::Divide,
                id("a"),
                Node::RegExp {
                    pattern: "b".into(),
                    flags: String::new()
                }
            )
        );
    }

    #[test]
    fn test_shift_and_comparison_precedence() {
        assert_eq!(
            expr("1 << 2 < 3 == 4"),
            Node::binary(
                BinaryOperator::Equal,
                Node::binary(
                    BinaryOperator::LessThan,
                    Node::binary(BinaryOperator::LeftShift, num(1.0), num(2.0)),
                    num(3.0)
                ),
                num(4.0)
            )
        );
        assert_eq!(
            expr("a | b ^ c & d"),
            Node::binary(
                BinaryOperator::BitwiseOr,
                id("a"),
                Node::binary(
                    BinaryOperator::BitwiseXOr,
                    id("b"),
                    Node::binary(BinaryOperator::BitwiseAnd, id("c"), id("d"))
                )
            )
        );
    }

    #[test]
    fn test_function_expression() {
        assert_eq!(
            expr("function (a, b) { return a }"),
            Node::Function(FunctionDefinition {
                name: None,
                params: vec!["a".into(), "b".into()],
                body: Rc::from(vec![Node::Return(Some(Box::new(id("a"))))]),
            })
        );
        assert!(matches!(
            expr("function fact(n) {}"),
            Node::Function(FunctionDefinition { name: Some(ref n), .. }) if n == "fact"
        ));
    }

    #[test]
    fn test_unexpected_token_in_prefix_position() {
        assert_eq!(
            expr_err("1 + )"),
            Error::unexpected(TokenKind::RightParen, 4, "expression")
        );
        assert_eq!(
            expr_err("class"),
            Error::unexpected(TokenKind::Class, 0, "expression")
        );
    }

    #[test]
    fn test_unclosed_paren() {
        assert_eq!(
            expr_err("(1 + 2"),
            Error::unexpected(TokenKind::Eof, 6, "`)`")
        );
    }

    #[test]
    fn test_binding_power_table() {
        assert!(binding_power(&TokenKind::Comma) < binding_power(&TokenKind::Equal));
        assert!(binding_power(&TokenKind::Star) > binding_power(&TokenKind::Plus));
        assert!(binding_power(&TokenKind::LeftParen) > binding_power(&TokenKind::PlusPlus));
        assert_eq!(binding_power(&TokenKind::Semicolon), 0);
        assert_eq!(binding_power(&TokenKind::Number(1.0)), 0);
    }
}
