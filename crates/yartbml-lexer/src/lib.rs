//! YARTBML lexer -- tokenizer for the YARTBML scripting language.

mod cursor;

use cursor::Cursor;
use yartbml_common::token::{keyword_from_str, Token, TokenKind};

/// The YARTBML lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or
/// collect them into a `Vec`. Whitespace (space, tab, newline, carriage
/// return) is skipped silently -- it carries no meaning in YARTBML.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token. Once emitted,
    /// `next()` returns `None` forever so downstream consumers can treat
    /// `Eof` as a true sentinel rather than re-checking `is_eof()`.
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn produce_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, "");
        };

        match c {
            '=' => self.lex_eq(),
            '+' => self.single_char_token(TokenKind::Plus),
            '-' => self.single_char_token(TokenKind::Minus),
            '!' => self.lex_bang(),
            '*' => self.single_char_token(TokenKind::Asterisk),
            '/' => self.single_char_token(TokenKind::Slash),
            '<' => self.single_char_token(TokenKind::Lt),
            '>' => self.single_char_token(TokenKind::Gt),
            ',' => self.single_char_token(TokenKind::Comma),
            ';' => self.single_char_token(TokenKind::Semicolon),
            ':' => self.single_char_token(TokenKind::Colon),
            '(' => self.single_char_token(TokenKind::LParen),
            ')' => self.single_char_token(TokenKind::RParen),
            '{' => self.single_char_token(TokenKind::LBrace),
            '}' => self.single_char_token(TokenKind::RBrace),
            '[' => self.single_char_token(TokenKind::LBracket),
            ']' => self.single_char_token(TokenKind::RBracket),
            '"' => self.lex_string(),
            '0'..='9' => self.lex_number(),
            c if is_ident_start(c) => self.lex_ident(),
            _ => self.single_char_token(TokenKind::Illegal),
        }
    }

    /// Skip spaces, tabs, newlines, and carriage returns. None of them are
    /// significant in YARTBML -- there is no statement terminator inferred
    /// from layout, only the optional trailing `;`.
    fn skip_whitespace(&mut self) {
        self.cursor
            .eat_while(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r');
    }

    /// Consume one character and return a single-character token of the
    /// given kind, using that character as the literal.
    fn single_char_token(&mut self, kind: TokenKind) -> Token {
        let start = self.cursor.pos();
        self.cursor.advance();
        let literal = self.cursor.slice(start, self.cursor.pos());
        Token::new(kind, literal)
    }

    /// `=` -> `Assign`, `==` -> `Eq`
    fn lex_eq(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.advance(); // consume '='
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
        }
        let literal = self.cursor.slice(start, self.cursor.pos());
        let kind = if literal.len() == 2 {
            TokenKind::Eq
        } else {
            TokenKind::Assign
        };
        Token::new(kind, literal)
    }

    /// `!` -> `Bang`, `!=` -> `NotEq`
    fn lex_bang(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.advance(); // consume '!'
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
        }
        let literal = self.cursor.slice(start, self.cursor.pos());
        let kind = if literal.len() == 2 {
            TokenKind::NotEq
        } else {
            TokenKind::Bang
        };
        Token::new(kind, literal)
    }

    /// Integer literals are runs of decimal digits. Overflow or a malformed
    /// literal is not rejected here -- it surfaces as a parser error when
    /// the literal is later interpreted (`could not parse "..." as integer`).
    fn lex_number(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.eat_while(|c| c.is_ascii_digit());
        let literal = self.cursor.slice(start, self.cursor.pos());
        Token::new(TokenKind::Int, literal)
    }

    /// String literals are delimited by `"`. No escape processing is
    /// performed -- every byte except the closing quote is included
    /// verbatim. An unterminated string runs to end of input and is
    /// reported as `Illegal`.
    fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // consume opening '"'
        let start = self.cursor.pos();
        loop {
            match self.cursor.peek() {
                Some('"') => {
                    let literal = self.cursor.slice(start, self.cursor.pos()).to_string();
                    self.cursor.advance(); // consume closing '"'
                    return Token::new(TokenKind::String, literal);
                }
                Some(_) => {
                    self.cursor.advance();
                }
                None => {
                    let literal = self.cursor.slice(start, self.cursor.pos()).to_string();
                    return Token::new(TokenKind::Illegal, literal);
                }
            }
        }
    }

    /// Identifiers start with a letter or `_` and continue with letters,
    /// digits, or `_`. Keywords are identifier-shaped but resolve to a
    /// dedicated `TokenKind` via [`keyword_from_str`].
    fn lex_ident(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.advance(); // consume first char
        self.cursor.eat_while(is_ident_continue);
        let literal = self.cursor.slice(start, self.cursor.pos());
        let kind = keyword_from_str(literal).unwrap_or(TokenKind::Ident);
        Token::new(kind, literal)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.produce_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

/// Whether a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Whether a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
