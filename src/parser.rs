use thiserror::Error;

use crate::ast::{BinaryOperator, Expression, Program, Statement};
use crate::token::{Span, Token, TokenKind};

/// Deepest syntax tree the parser will build. Counts parentheses, `if`
/// bodies and every extra operand of a `+`/`-` chain, since each of them
/// adds a level that code generation walks recursively.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Parse error at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        expected: &'static str,
        found: String,
    },
    #[error("Parse error at line {line}: unexpected token {found} in statement")]
    InvalidStatement {
        line: usize,
        column: usize,
        found: String,
    },
    #[error("Parse error at line {line}: unexpected token {found} in expression")]
    InvalidExpression {
        line: usize,
        column: usize,
        found: String,
    },
    #[error("Parse error at line {line}: nesting exceeds {} levels", MAX_NESTING)]
    NestingTooDeep { line: usize, column: usize },
    #[error("Parse error at line {line}: integer literal '{literal}' is out of range")]
    InvalidIntegerLiteral {
        line: usize,
        column: usize,
        literal: String,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::InvalidStatement { line, .. }
            | ParseError::InvalidExpression { line, .. }
            | ParseError::NestingTooDeep { line, .. }
            | ParseError::InvalidIntegerLiteral { line, .. } => *line,
        }
    }
}

/// Result of a parse run: every statement read before the first failure,
/// together with that failure if there was one.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub program: Program,
    pub error: Option<ParseError>,
}

impl Parsed {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    depth: usize,
    end: Token<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        let span = tokens.last().map(|token| token.span).unwrap_or(Span {
            line: 1,
            column: 1,
            ..Span::default()
        });
        Self {
            tokens,
            position: 0,
            depth: 0,
            end: Token::new(TokenKind::EndOfInput, "", span),
        }
    }

    /// Parses statements until end of input. The first syntax error stops the
    /// run; statements after it are not attempted.
    pub fn parse(mut self) -> Parsed {
        let mut program = Program::default();
        while self.current().kind != TokenKind::EndOfInput {
            match self.parse_statement() {
                Ok(statement) => program.statements.push(statement),
                Err(error) => {
                    return Parsed {
                        program,
                        error: Some(error),
                    };
                }
            }
        }
        Parsed {
            program,
            error: None,
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current().kind {
            TokenKind::Int => self.parse_variable_declaration(),
            TokenKind::Identifier => self.parse_assignment(),
            TokenKind::If => self.parse_if(),
            _ => {
                let token = self.current();
                Err(ParseError::InvalidStatement {
                    line: token.line(),
                    column: token.column(),
                    found: describe(token),
                })
            }
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Int)?;
        let name = self.expect(TokenKind::Identifier)?.text.to_string();
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::VariableDeclaration { name })
    }

    fn parse_assignment(&mut self) -> Result<Statement, ParseError> {
        let name = self.expect(TokenKind::Identifier)?.text.to_string();
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Assignment { name, value })
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        self.enter()?;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_comparison()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        let body = self.parse_statement()?;
        self.expect(TokenKind::RBrace)?;
        self.leave(1);
        Ok(Statement::If {
            condition,
            body: Box::new(body),
        })
    }

    /// At most one `==`; a second one is left for the caller to reject.
    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_expression()?;
        if self.current().kind != TokenKind::Equal {
            return Ok(left);
        }
        self.advance();
        let right = self.parse_expression()?;
        Ok(Expression::BinaryOp {
            left: Box::new(left),
            op: BinaryOperator::Equal,
            right: Box::new(right),
        })
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_primary()?;
        let mut levels = 0;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.enter()?;
            levels += 1;
            self.advance();
            let right = self.parse_primary()?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        self.leave(levels);
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number => {
                let value = token.text.parse::<i32>().map_err(|_| {
                    ParseError::InvalidIntegerLiteral {
                        line: token.line(),
                        column: token.column(),
                        literal: token.text.to_string(),
                    }
                })?;
                self.advance();
                Ok(Expression::Number(value))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expression::Identifier(token.text.to_string()))
            }
            TokenKind::LParen => {
                self.enter()?;
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                self.leave(1);
                Ok(expr)
            }
            _ => Err(ParseError::InvalidExpression {
                line: token.line(),
                column: token.column(),
                found: describe(&token),
            }),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        let token = self.current().clone();
        if token.kind == kind {
            self.advance();
            Ok(token)
        } else {
            Err(ParseError::UnexpectedToken {
                line: token.line(),
                column: token.column(),
                expected: kind.describe(),
                found: describe(&token),
            })
        }
    }

    /// Descends one level; fails at the current token once the limit is hit.
    /// A failed parse is abandoned, so the counter is not unwound on errors.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            let token = self.current();
            return Err(ParseError::NestingTooDeep {
                line: token.line(),
                column: token.column(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn current(&self) -> &Token<'a> {
        self.tokens.get(self.position).unwrap_or(&self.end)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::EndOfInput => token.kind.describe().to_string(),
        _ => format!("'{}'", token.text),
    }
}

pub fn parse_tokens(tokens: Vec<Token<'_>>) -> Parsed {
    Parser::new(tokens).parse()
}
