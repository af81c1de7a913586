//! Lexical analysis (tokenization) of source code.
//!
//! The lexer is offset-driven: the parser asks for one token at a time,
//! passing the byte offset to resume from and the [`LexMode`] that says
//! whether an operand or an operator is expected at that point.
//!
//! ## Structure
//!
//! - `scanner.rs` - `Scanner` and the `next_token` entry point
//! - `token.rs` - `Token`, `TokenKind`, `Span` and `LexMode`
//!
//! ## Usage
//!
//! ```rust
//! use quill_engine::lexer::{next_token, LexMode, TokenKind};
//!
//! let (token, offset) = next_token("/a+/g / 2", 0, LexMode::Prefix).unwrap();
//! assert!(matches!(token.kind, TokenKind::RegExp { .. }));
//!
//! let (token, _) = next_token("/a+/g / 2", offset, LexMode::Infix).unwrap();
//! assert_eq!(token.kind, TokenKind::Slash);
//! ```

mod scanner;
mod token;

pub use scanner::{Scanner, next_token};
pub use token::{LexMode, Span, Token, TokenKind};
