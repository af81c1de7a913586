//! The scanner that produces tokens from source text.

use super::{LexMode, Span, Token, TokenKind};
use crate::error::{Error, Result};

/// Scans a single token starting at byte `offset` of `source`.
///
/// Returns the token together with the offset just past it. Whitespace
/// before the token is skipped; whitespace that contains a line terminator
/// is reported as one [`TokenKind::LineBreak`].
pub fn next_token(source: &str, offset: usize, mode: LexMode) -> Result<(Token, usize)> {
    let mut scanner = Scanner::at(source, offset);
    let token = scanner.scan_token(mode)?;
    Ok((token, scanner.offset()))
}

/// A scanner that tokenizes source code.
///
/// The parser drives it through [`Scanner::scan_token`], choosing the mode for
/// each token. Used as an [`Iterator`] it picks the mode itself from the
/// previous token, which is enough for token dumps.
pub struct Scanner<'a> {
    source: &'a str,
    current_pos: usize,
    previous: Option<TokenKind>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self::at(source, 0)
    }

    /// Creates a scanner positioned at byte `offset`.
    pub fn at(source: &'a str, offset: usize) -> Self {
        Self {
            source,
            current_pos: offset.min(source.len()),
            previous: None,
            finished: false,
        }
    }

    /// Byte offset of the next unscanned character.
    pub fn offset(&self) -> usize {
        self.current_pos
    }

    /// Returns the next token from the source.
    pub fn scan_token(&mut self, mode: LexMode) -> Result<Token> {
        let start = self.current_pos;
        if self.skip_whitespace() {
            return Ok(Token::new(
                TokenKind::LineBreak,
                Span::new(start, self.current_pos),
            ));
        }

        let start = self.current_pos;

        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };

        let kind = match ch {
            // Single-character tokens
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '~' => TokenKind::Tilde,

            // Multi-character tokens
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(start)?,
            '.' => TokenKind::Dot,
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_assignable(TokenKind::Star, TokenKind::StarEqual),
            '%' => self.scan_assignable(TokenKind::Percent, TokenKind::PercentEqual),
            '^' => self.scan_assignable(TokenKind::Caret, TokenKind::CaretEqual),
            '/' => match mode {
                LexMode::Prefix => self.scan_regexp(start)?,
                LexMode::Infix => self.scan_assignable(TokenKind::Slash, TokenKind::SlashEqual),
            },
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equal(),
            '!' => self.scan_bang(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),

            // String literals
            '"' | '\'' => self.scan_string(ch, start)?,

            // Numbers
            '0'..='9' => self.scan_number(start)?,

            // Identifiers and keywords
            _ if is_id_start(ch) => self.scan_identifier(start),

            _ => return Err(Error::InvalidToken { offset: start }),
        };

        Ok(Token::new(kind, Span::new(start, self.current_pos)))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source[self.current_pos..].chars().next()?;
        self.current_pos += ch.len_utf8();
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current_pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.current_pos..].chars();
        chars.next();
        chars.next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips whitespace, returning true if a line terminator was crossed.
    fn skip_whitespace(&mut self) -> bool {
        let mut crossed_line = false;
        while let Some(ch) = self.peek() {
            if is_line_terminator(ch) {
                crossed_line = true;
            } else if !ch.is_whitespace() && ch != '\u{FEFF}' {
                break;
            }
            self.advance();
        }
        crossed_line
    }

    fn scan_assignable(&mut self, plain: TokenKind, compound: TokenKind) -> TokenKind {
        if self.eat('=') { compound } else { plain }
    }

    fn scan_plus(&mut self) -> TokenKind {
        match self.peek() {
            Some('+') => {
                self.advance();
                TokenKind::PlusPlus
            }
            Some('=') => {
                self.advance();
                TokenKind::PlusEqual
            }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        match self.peek() {
            Some('-') => {
                self.advance();
                TokenKind::MinusMinus
            }
            Some('=') => {
                self.advance();
                TokenKind::MinusEqual
            }
            _ => TokenKind::Minus,
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        match self.peek() {
            Some('<') => {
                self.advance();
                self.scan_assignable(TokenKind::LeftShift, TokenKind::LeftShiftEqual)
            }
            Some('=') => {
                self.advance();
                TokenKind::LessThanEqual
            }
            _ => TokenKind::LessThan,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        match self.peek() {
            Some('>') => {
                self.advance();
                match self.peek() {
                    Some('>') => {
                        self.advance();
                        self.scan_assignable(
                            TokenKind::UnsignedRightShift,
                            TokenKind::UnsignedRightShiftEqual,
                        )
                    }
                    Some('=') => {
                        self.advance();
                        TokenKind::RightShiftEqual
                    }
                    _ => TokenKind::RightShift,
                }
            }
            Some('=') => {
                self.advance();
                TokenKind::GreaterThanEqual
            }
            _ => TokenKind::GreaterThan,
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        if self.eat('=') {
            self.scan_assignable(TokenKind::EqualEqual, TokenKind::StrictEqual)
        } else {
            TokenKind::Equal
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.eat('=') {
            self.scan_assignable(TokenKind::NotEqual, TokenKind::StrictNotEqual)
        } else {
            TokenKind::Bang
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        match self.peek() {
            Some('&') => {
                self.advance();
                TokenKind::AmpersandAmpersand
            }
            Some('=') => {
                self.advance();
                TokenKind::AmpersandEqual
            }
            _ => TokenKind::Ampersand,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        match self.peek() {
            Some('|') => {
                self.advance();
                TokenKind::PipePipe
            }
            Some('=') => {
                self.advance();
                TokenKind::PipeEqual
            }
            _ => TokenKind::Pipe,
        }
    }

    /// Quotes only delimit; backslashes are kept as written.
    fn scan_string(&mut self, quote: char, start: usize) -> Result<TokenKind> {
        let body_start = self.current_pos;
        loop {
            match self.advance() {
                None => return Err(Error::InvalidToken { offset: start }),
                Some(ch) if ch == quote => break,
                Some(_) => {}
            }
        }
        let body = &self.source[body_start..self.current_pos - quote.len_utf8()];
        Ok(TokenKind::String(body.to_string()))
    }

    /// Scans a regular expression literal; the opening `/` is consumed.
    fn scan_regexp(&mut self, start: usize) -> Result<TokenKind> {
        let body_start = self.current_pos;
        let mut in_class = false;

        loop {
            match self.advance() {
                None => return Err(Error::InvalidToken { offset: start }),
                Some(ch) if is_line_terminator(ch) => {
                    return Err(Error::InvalidToken { offset: start });
                }
                Some('\\') => match self.advance() {
                    Some(ch) if !is_line_terminator(ch) => {}
                    _ => return Err(Error::InvalidToken { offset: start }),
                },
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }

        let pattern = self.source[body_start..self.current_pos - 1].to_string();
        let flags_start = self.current_pos;
        while self.peek().is_some_and(is_id_continue) {
            self.advance();
        }
        let flags = self.source[flags_start..self.current_pos].to_string();

        Ok(TokenKind::RegExp { pattern, flags })
    }

    /// Scans a numeric literal whose first character is already consumed.
    fn scan_number(&mut self, start: usize) -> Result<TokenKind> {
        let first = self.source[start..].chars().next();

        let value = if first == Some('0') && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            self.scan_hex_digits(start)?
        } else {
            if first != Some('.') {
                // `0` may not be followed by more integer digits
                if first != Some('0') {
                    self.skip_digits();
                }
                if self.eat('.') {
                    self.skip_digits();
                }
            } else {
                self.skip_digits();
            }
            self.scan_exponent();

            self.source[start..self.current_pos]
                .parse::<f64>()
                .map_err(|_| Error::InvalidToken { offset: start })?
        };

        if self.peek().is_some_and(is_id_continue) {
            return Err(Error::InvalidToken { offset: start });
        }

        Ok(TokenKind::Number(value))
    }

    fn scan_hex_digits(&mut self, start: usize) -> Result<f64> {
        let mut value = 0.0_f64;
        let mut any = false;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) {
            value = value * 16.0 + f64::from(digit);
            any = true;
            self.advance();
        }
        if any {
            Ok(value)
        } else {
            Err(Error::InvalidToken { offset: start })
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Consumes `e[+-]digits` only when the digits are present.
    fn scan_exponent(&mut self) {
        if !matches!(self.peek(), Some('e' | 'E')) {
            return;
        }
        let has_digits = match self.peek_next() {
            Some('+' | '-') => self.source[self.current_pos + 2..]
                .starts_with(|c: char| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        };
        if has_digits {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.skip_digits();
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(is_id_continue) {
            self.advance();
        }

        let name = &self.source[start..self.current_pos];
        TokenKind::keyword(name).unwrap_or_else(|| TokenKind::Identifier(name.to_string()))
    }
}

/// Checks if a character can start an identifier.
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphabetic()
}

/// Checks if a character can continue an identifier.
fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphanumeric()
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mode = match &self.previous {
            Some(kind) if kind.ends_operand() => LexMode::Infix,
            _ => LexMode::Prefix,
        };

        match self.scan_token(mode) {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.finished = true;
                None
            }
            Ok(token) => {
                if token.kind != TokenKind::LineBreak {
                    self.previous = Some(token.kind.clone());
                }
                Some(Ok(token))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
