use std::{iter::Peekable, str::CharIndices};

use crate::token::{Span, Token, TokenKind};

/// On-demand scanner over a borrowed source buffer.
///
/// Lexing never fails: characters outside the language come back as
/// `TokenKind::Unknown` and the parser rejects them in context.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Returns the next token. Once the input is exhausted every call yields
    /// `EndOfInput` at the same position.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_trivia();

        let start_line = self.line;
        let start_column = self.column;
        let Some(&(start_idx, ch)) = self.chars.peek() else {
            let index = self.input.len();
            return Token::new(
                TokenKind::EndOfInput,
                "",
                Span {
                    start: index,
                    end: index,
                    line: start_line,
                    column: start_column,
                },
            );
        };

        if ch.is_ascii_alphabetic() || ch == '_' {
            return self.read_word(start_idx, start_line, start_column);
        }
        if ch.is_ascii_digit() {
            return self.read_number(start_idx, start_line, start_column);
        }

        self.advance_char();
        let kind = match ch {
            '=' => {
                if matches!(self.chars.peek(), Some(&(_, '='))) {
                    self.advance_char();
                    TokenKind::Equal
                } else {
                    TokenKind::Assign
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            _ => TokenKind::Unknown,
        };
        let end_idx = self.current_index();
        Token::new(
            kind,
            &self.input[start_idx..end_idx],
            Span {
                start: start_idx,
                end: end_idx,
                line: start_line,
                column: start_column,
            },
        )
    }

    /// Whitespace and `//` comments may alternate any number of times.
    fn skip_trivia(&mut self) {
        loop {
            while let Some(&(_, c)) = self.chars.peek() {
                if is_space(c) {
                    self.advance_char();
                } else {
                    break;
                }
            }

            let index = self.current_index();
            if !self.input[index..].starts_with("//") {
                return;
            }
            while let Some(&(_, c)) = self.chars.peek() {
                if c == '\n' {
                    break;
                }
                self.advance_char();
            }
        }
    }

    fn read_word(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char(); // Consume first char
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        let end_idx = self.current_index();
        let word = &self.input[start..end_idx];
        let kind = match word {
            "int" => TokenKind::Int,
            "if" => TokenKind::If,
            _ => TokenKind::Identifier,
        };
        Token::new(
            kind,
            word,
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        )
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char(); // Consume first digit
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance_char();
            } else {
                break;
            }
        }

        let end_idx = self.current_index();
        Token::new(
            TokenKind::Number,
            &self.input[start..end_idx],
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        )
    }

    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

/// Yields every token up to and including the first `EndOfInput`.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::EndOfInput;
        Some(token)
    }
}

// Same set as C's `isspace`.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}
