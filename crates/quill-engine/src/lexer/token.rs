//! Token definitions for the lexer.

use std::fmt;

/// A span in the source code, representing a range of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Grammatical position the lexer is scanning for.
///
/// The only token whose meaning depends on position is `/`: where an
/// operand is expected it opens a regular-expression literal, after an
/// operand it is division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexMode {
    /// An operand is expected; `/` starts a regular expression.
    Prefix,
    /// An operator is expected; `/` is division.
    Infix,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Numeric literal (decimal or hex)
    Number(f64),
    /// String literal, delimiters removed
    String(String),
    /// Regular expression literal
    RegExp {
        /// Body between the slashes
        pattern: String,
        /// Trailing identifier characters
        flags: String,
    },
    /// `true` or `false`
    Boolean(bool),
    /// null
    Null,

    /// Identifier
    Identifier(String),

    // Keywords
    /// `break`
    Break,
    /// `case`
    Case,
    /// `catch`
    Catch,
    /// `continue`
    Continue,
    /// `debugger`
    Debugger,
    /// `default`
    Default,
    /// `delete`
    Delete,
    /// `do`
    Do,
    /// `else`
    Else,
    /// `finally`
    Finally,
    /// `for`
    For,
    /// `function`
    Function,
    /// `if`
    If,
    /// `in`
    In,
    /// `instanceof`
    Instanceof,
    /// `new`
    New,
    /// `return`
    Return,
    /// `switch`
    Switch,
    /// `this`
    This,
    /// `throw`
    Throw,
    /// `try`
    Try,
    /// `typeof`
    Typeof,
    /// `var`
    Var,
    /// `void`
    Void,
    /// `while`
    While,
    /// `with`
    With,

    // Reserved for future use
    /// `class`, reserved
    Class,
    /// `const`, reserved
    Const,
    /// `enum`, reserved
    Enum,
    /// `export`, reserved
    Export,
    /// `extends`, reserved
    Extends,
    /// `import`, reserved
    Import,
    /// `super`, reserved
    Super,

    // Punctuation
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// .
    Dot,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// <
    LessThan,
    /// >
    GreaterThan,
    /// <=
    LessThanEqual,
    /// >=
    GreaterThanEqual,
    /// ==
    EqualEqual,
    /// !=
    NotEqual,
    /// ===
    StrictEqual,
    /// !==
    StrictNotEqual,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ++
    PlusPlus,
    /// --
    MinusMinus,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// >>>
    UnsignedRightShift,
    /// &
    Ampersand,
    /// |
    Pipe,
    /// ^
    Caret,
    /// !
    Bang,
    /// ~
    Tilde,
    /// &&
    AmpersandAmpersand,
    /// ||
    PipePipe,
    /// ?
    Question,
    /// :
    Colon,
    /// =
    Equal,
    /// +=
    PlusEqual,
    /// -=
    MinusEqual,
    /// *=
    StarEqual,
    /// /=
    SlashEqual,
    /// %=
    PercentEqual,
    /// <<=
    LeftShiftEqual,
    /// >>=
    RightShiftEqual,
    /// >>>=
    UnsignedRightShiftEqual,
    /// &=
    AmpersandEqual,
    /// |=
    PipeEqual,
    /// ^=
    CaretEqual,

    // Special
    /// One or more line terminators, possibly mixed with other whitespace
    LineBreak,
    /// End of file
    Eof,
}

impl TokenKind {
    /// Looks up the keyword, reserved word or word literal spelled `word`.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "debugger" => TokenKind::Debugger,
            "default" => TokenKind::Default,
            "delete" => TokenKind::Delete,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "enum" => TokenKind::Enum,
            "export" => TokenKind::Export,
            "extends" => TokenKind::Extends,
            "false" => TokenKind::Boolean(false),
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "in" => TokenKind::In,
            "instanceof" => TokenKind::Instanceof,
            "new" => TokenKind::New,
            "null" => TokenKind::Null,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "switch" => TokenKind::Switch,
            "this" => TokenKind::This,
            "throw" => TokenKind::Throw,
            "true" => TokenKind::Boolean(true),
            "try" => TokenKind::Try,
            "typeof" => TokenKind::Typeof,
            "var" => TokenKind::Var,
            "void" => TokenKind::Void,
            "while" => TokenKind::While,
            "with" => TokenKind::With,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Break
                | TokenKind::Case
                | TokenKind::Catch
                | TokenKind::Continue
                | TokenKind::Debugger
                | TokenKind::Default
                | TokenKind::Delete
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::Finally
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::In
                | TokenKind::Instanceof
                | TokenKind::New
                | TokenKind::Return
                | TokenKind::Switch
                | TokenKind::This
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::Typeof
                | TokenKind::Var
                | TokenKind::Void
                | TokenKind::While
                | TokenKind::With
        )
    }

    /// Returns true if this token is a future reserved word.
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Const
                | TokenKind::Enum
                | TokenKind::Export
                | TokenKind::Extends
                | TokenKind::Import
                | TokenKind::Super
        )
    }

    /// Returns true if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::RegExp { .. }
                | TokenKind::Boolean(_)
                | TokenKind::Null
        )
    }

    /// Returns true if an operator, not an operand, may follow this token.
    ///
    /// Used to pick the lexing mode when tokens are scanned without a parser.
    pub fn ends_operand(&self) -> bool {
        self.is_literal()
            || matches!(
                self,
                TokenKind::Identifier(_)
                    | TokenKind::This
                    | TokenKind::RightParen
                    | TokenKind::RightBracket
                    | TokenKind::PlusPlus
                    | TokenKind::MinusMinus
            )
    }

    /// Returns the source spelling of fixed tokens.
    pub fn as_str(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Boolean(true) => "true",
            TokenKind::Boolean(false) => "false",
            TokenKind::Null => "null",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Catch => "catch",
            TokenKind::Continue => "continue",
            TokenKind::Debugger => "debugger",
            TokenKind::Default => "default",
            TokenKind::Delete => "delete",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::Instanceof => "instanceof",
            TokenKind::New => "new",
            TokenKind::Return => "return",
            TokenKind::Switch => "switch",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Typeof => "typeof",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::With => "with",
            TokenKind::Class => "class",
            TokenKind::Const => "const",
            TokenKind::Enum => "enum",
            TokenKind::Export => "export",
            TokenKind::Extends => "extends",
            TokenKind::Import => "import",
            TokenKind::Super => "super",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::LessThanEqual => "<=",
            TokenKind::GreaterThanEqual => ">=",
            TokenKind::EqualEqual => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::StrictEqual => "===",
            TokenKind::StrictNotEqual => "!==",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::LeftShift => "<<",
            TokenKind::RightShift => ">>",
            TokenKind::UnsignedRightShift => ">>>",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Equal => "=",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::PercentEqual => "%=",
            TokenKind::LeftShiftEqual => "<<=",
            TokenKind::RightShiftEqual => ">>=",
            TokenKind::UnsignedRightShiftEqual => ">>>=",
            TokenKind::AmpersandEqual => "&=",
            TokenKind::PipeEqual => "|=",
            TokenKind::CaretEqual => "^=",
            TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::RegExp { .. }
            | TokenKind::Identifier(_)
            | TokenKind::LineBreak
            | TokenKind::Eof => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number `{}`", n),
            TokenKind::String(s) => write!(f, "string `{}`", s),
            TokenKind::RegExp { pattern, flags } => {
                write!(f, "regular expression `/{}/{}`", pattern, flags)
            }
            TokenKind::Identifier(name) => write!(f, "identifier `{}`", name),
            TokenKind::LineBreak => write!(f, "line break"),
            TokenKind::Eof => write!(f, "end of input"),
            other => match other.as_str() {
                Some(text) => write!(f, "`{}`", text),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 15);
        assert_eq!(span.len(), 10);
    }

    #[test]
    fn test_span_is_empty() {
        let empty = Span::new(5, 5);
        let non_empty = Span::new(5, 10);

        assert!(empty.is_empty());
        assert!(!non_empty.is_empty());
    }

    #[test]
    fn test_token_equality() {
        let t1 = Token::new(TokenKind::Plus, Span::new(0, 1));
        let t2 = Token::new(TokenKind::Plus, Span::new(0, 1));
        let t3 = Token::new(TokenKind::Minus, Span::new(0, 1));

        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
    }

    #[test]
    fn test_payload_takes_part_in_equality() {
        assert_eq!(TokenKind::Number(1.0), TokenKind::Number(1.0));
        assert_ne!(TokenKind::Number(1.0), TokenKind::Number(2.0));
        assert_ne!(
            TokenKind::Identifier("a".to_string()),
            TokenKind::String("a".to_string())
        );
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::keyword("true"), Some(TokenKind::Boolean(true)));
        assert_eq!(TokenKind::keyword("null"), Some(TokenKind::Null));
        assert_eq!(TokenKind::keyword("class"), Some(TokenKind::Class));
        assert_eq!(TokenKind::keyword("While"), None);
        assert_eq!(TokenKind::keyword("let"), None);
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::If.is_keyword());
        assert!(TokenKind::Typeof.is_keyword());
        assert!(TokenKind::With.is_keyword());
        assert!(!TokenKind::Class.is_keyword());
        assert!(!TokenKind::Boolean(true).is_keyword());
        assert!(!TokenKind::Identifier("x".to_string()).is_keyword());
    }

    #[test]
    fn test_is_reserved() {
        assert!(TokenKind::Class.is_reserved());
        assert!(TokenKind::Super.is_reserved());
        assert!(!TokenKind::Var.is_reserved());
    }

    #[test]
    fn test_is_literal() {
        assert!(TokenKind::Number(42.0).is_literal());
        assert!(TokenKind::String("hello".to_string()).is_literal());
        assert!(
            TokenKind::RegExp {
                pattern: ".*".to_string(),
                flags: "g".to_string()
            }
            .is_literal()
        );
        assert!(TokenKind::Boolean(false).is_literal());
        assert!(TokenKind::Null.is_literal());
        assert!(!TokenKind::Identifier("x".to_string()).is_literal());
        assert!(!TokenKind::Eof.is_literal());
    }

    #[test]
    fn test_ends_operand() {
        assert!(TokenKind::Number(1.0).ends_operand());
        assert!(TokenKind::Identifier("x".to_string()).ends_operand());
        assert!(TokenKind::RightParen.ends_operand());
        assert!(TokenKind::PlusPlus.ends_operand());
        assert!(!TokenKind::Plus.ends_operand());
        assert!(!TokenKind::LeftParen.ends_operand());
        assert!(!TokenKind::Return.ends_operand());
    }

    #[test]
    fn test_keyword_spelling_round_trips() {
        for word in ["break", "typeof", "instanceof", "super", "false", "null"] {
            let kind = TokenKind::keyword(word).expect("keyword");
            assert_eq!(kind.as_str(), Some(word));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::RightParen.to_string(), "`)`");
        assert_eq!(TokenKind::UnsignedRightShiftEqual.to_string(), "`>>>=`");
        assert_eq!(TokenKind::Number(1.5).to_string(), "number `1.5`");
        assert_eq!(
            TokenKind::Identifier("foo".to_string()).to_string(),
            "identifier `foo`"
        );
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
