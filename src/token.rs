#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,

    // Keywords
    Int,
    If,

    // Operators
    Assign, // =
    Equal,  // ==
    Plus,   // +
    Minus,  // -

    // Delimiters
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;

    // Structural
    EndOfInput,
    Unknown,
}

impl TokenKind {
    /// Human-readable name used in parser diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Int => "'int'",
            TokenKind::If => "'if'",
            TokenKind::Assign => "'='",
            TokenKind::Equal => "'=='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::EndOfInput => "end of input",
            TokenKind::Unknown => "unknown character",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}
