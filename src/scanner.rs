use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Reportable, SyntaxError};
use crate::literal::Literal;
use crate::token::{Location, Token, Type};

/// Converts source text into a token stream. A thin state machine over a
/// two-token-lookahead character iterator — the lookahead is what lets
/// operators like `<=`, `&&`, `+=`, and the `/* */` comment opener resolve
/// without backtracking.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column_offset: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 0,
            column_offset: 0,
        }
    }

    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, Location::new(self.line, 0)));
        self.tokens.clone()
    }

    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(c) => {
                self.current += 1;
                c
            }
            None => panic!("tried to advance past end of the file."),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.source.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        self.source.peek_next().copied()
    }

    fn match_next(&mut self, expected: char) -> bool {
        match self.peek_next() {
            Some(c) if c == expected => true,
            _ => false,
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn location_at_start(&self) -> Location {
        Location::new(self.line, self.start - self.column_offset)
    }

    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.location_at_start()));
    }

    fn add_single(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    fn add_double(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();
        self.add_token(r#type, format!("{first}{second}"), None);
    }

    fn error(&self, message: impl Into<String>) {
        SyntaxError { location: self.location_at_start(), message: message.into() }.throw();
    }

    /// `//` is both the floor-division operator (token contract, infix
    /// position) and the line-comment opener (token contract, trivia) —
    /// the same two-character lexeme serves both roles. Disambiguate by
    /// the previous token: a `//` immediately following something that can
    /// end an expression (a literal, identifier, `)`, `]`, `this`, or a
    /// boolean/null keyword) is the operator; anywhere else — start of
    /// file, after another operator, after `(`/`{`/`,`/`;` — it opens a
    /// comment.
    fn prev_token_ends_expression(&self) -> bool {
        matches!(
            self.tokens.last().map(|t| t.r#type),
            Some(
                Type::Integer
                    | Type::Float
                    | Type::String
                    | Type::Identifier
                    | Type::RightParen
                    | Type::RightBracket
                    | Type::This
                    | Type::True
                    | Type::False
                    | Type::Null
            )
        )
    }

    /// Handles a string literal, including the escape table from the
    /// token contract. An unknown escape simply drops the backslash.
    fn string(&mut self) {
        let start_location = self.location_at_start();
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    SyntaxError { location: start_location, message: "Unterminated string".to_string() }.throw();
                    return;
                }
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(escaped) => {
                            self.advance();
                            value.push(match escaped {
                                'n' => '\n',
                                't' => '\t',
                                'r' => '\r',
                                '"' => '"',
                                '\\' => '\\',
                                '\'' => '\'',
                                'b' => '\u{0008}',
                                'f' => '\u{000C}',
                                other => other,
                            });
                        }
                        None => {
                            SyntaxError { location: start_location, message: "Unterminated string".to_string() }.throw();
                            return;
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    if c == '\n' {
                        self.line += 1;
                        self.column_offset = self.current;
                    }
                    value.push(c);
                }
            }
        }

        self.advance(); // closing quote
        self.add_token(Type::String, value.clone(), Some(Literal::String(value)));
    }

    /// Handles an integer or float literal; the two are distinguished by
    /// the presence of a `.` followed by at least one digit.
    fn number(&mut self) {
        let mut text = String::new();

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance());
        }

        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            is_float = true;
            text.push(self.advance()); // consume '.'
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance());
            }
        }

        if is_float {
            let value: f64 = text.parse().expect("validated float literal");
            self.add_token(Type::Float, text, Some(Literal::Float(value)));
        } else {
            let value: i64 = text.parse().expect("validated integer literal");
            self.add_token(Type::Integer, text, Some(Literal::Integer(value)));
        }
    }

    fn identifier(&mut self) {
        let mut text = String::new();

        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            text.push(self.advance());
        }

        let token_type = match text.as_str() {
            "fn" => Type::Fn,
            "let" => Type::Let,
            "const" => Type::Const,
            "if" => Type::If,
            "elif" => Type::Elif,
            "else" => Type::Else,
            "return" => Type::Return,
            "while" => Type::While,
            "for" => Type::For,
            "break" => Type::Break,
            "continue" => Type::Continue,
            "true" => Type::True,
            "false" => Type::False,
            "null" => Type::Null,
            "class" => Type::Class,
            "extends" => Type::Extends,
            "super" => Type::Super,
            "this" => Type::This,
            "new" => Type::New,
            _ => Type::Identifier,
        };

        self.add_token(token_type, text, None);
    }

    /// Consumes a `/* ... */` block comment, including nested ones.
    fn block_comment(&mut self) {
        let start_location = self.location_at_start();
        self.advance();
        self.advance();

        let mut depth = 1;
        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                (Some(c), _) => {
                    self.advance();
                    if c == '\n' {
                        self.line += 1;
                        self.column_offset = self.current;
                    }
                }
                (None, _) => {
                    SyntaxError { location: start_location, message: "Unterminated block comment".to_string() }.throw();
                    return;
                }
            }
        }
    }

    fn scan_token(&mut self) {
        let c = self.peek().expect("scan_token called with input remaining");
        match c {
            '(' => self.add_single(Type::LeftParen),
            ')' => self.add_single(Type::RightParen),
            '{' => self.add_single(Type::LeftBrace),
            '}' => self.add_single(Type::RightBrace),
            '[' => self.add_single(Type::LeftBracket),
            ']' => self.add_single(Type::RightBracket),
            ',' => self.add_single(Type::Comma),
            ';' => self.add_single(Type::Semicolon),
            ':' => self.add_single(Type::Colon),
            '.' => self.add_single(Type::Dot),
            '^' => self.add_single(Type::Caret),
            '~' => self.add_single(Type::Tilde),

            '+' => if self.match_next('=') { self.add_double(Type::PlusEqual) } else { self.add_single(Type::Plus) },
            '-' => if self.match_next('=') { self.add_double(Type::MinusEqual) } else { self.add_single(Type::Minus) },
            '*' => if self.match_next('=') { self.add_double(Type::StarEqual) } else { self.add_single(Type::Star) },
            '%' => if self.match_next('=') { self.add_double(Type::PercentEqual) } else { self.add_single(Type::Percent) },
            '!' => if self.match_next('=') { self.add_double(Type::NotEqual) } else { self.add_single(Type::Bang) },
            '=' => if self.match_next('=') { self.add_double(Type::Equal) } else { self.add_single(Type::Assign) },
            '<' => {
                if self.match_next('=') {
                    self.add_double(Type::LessEqual);
                } else if self.match_next('<') {
                    self.add_double(Type::LeftShift);
                } else {
                    self.add_single(Type::Less);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_double(Type::GreaterEqual);
                } else if self.match_next('>') {
                    self.add_double(Type::RightShift);
                } else {
                    self.add_single(Type::Greater);
                }
            }
            '&' => if self.match_next('&') { self.add_double(Type::And) } else { self.add_single(Type::Ampersand) },
            '|' => if self.match_next('|') { self.add_double(Type::Or) } else { self.add_single(Type::Pipe) },

            '/' => {
                if self.match_next('/') {
                    if self.prev_token_ends_expression() {
                        self.add_double(Type::SlashSlash);
                    } else {
                        while !matches!(self.peek(), Some('\n') | None) {
                            self.advance();
                        }
                    }
                } else if self.match_next('*') {
                    self.block_comment();
                } else if self.match_next('=') {
                    self.add_double(Type::SlashEqual);
                } else {
                    self.add_single(Type::Slash);
                }
            }

            ' ' | '\r' | '\t' => {
                self.advance();
            }

            '\n' => {
                self.advance();
                self.line += 1;
                self.column_offset = self.current;
            }

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();
                self.error(format!("Unexpected character '{c}'"));
                self.add_token(Type::Illegal, c.to_string(), None);
            }
        }
    }
}
