//! Pipeline driver: source text in, assembly listing out.
//!
//! Each call to [`Compiler::compile`] builds a fresh lexer, parser and
//! generator, so compilations never share counters or symbol tables.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::codegen::{CodeGenerator, CodegenError};
use crate::lexer;
use crate::parser::{self, ParseError};

/// Demo program compiled when no input file is supplied.
pub const EXAMPLE_PROGRAM: &str = r#"
// Variable declarations
int a;
int b;
int c;

// Assignments
a = 70;
b = 120;
c = a + b;

// Conditional
if (c == 30) {
    c = c + 1;
}
"#;

#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// Tokens produced, including the end-of-input marker.
    pub tokens: usize,
    pub statements: usize,
    /// Set when parsing stopped early; the listing covers only the
    /// statements read before it.
    pub parse_error: Option<ParseError>,
    pub assembly: Vec<String>,
}

impl Compilation {
    /// Line reported on stderr when parsing stopped early.
    pub fn parse_report(&self) -> Option<String> {
        self.parse_error
            .as_ref()
            .map(|error| format!("Parser error: {error}"))
    }

    pub fn listing(&self) -> String {
        let mut out = String::new();
        for line in &self.assembly {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Compiler;

impl Compiler {
    pub fn new() -> Self {
        Self
    }

    pub fn compile(&self, source: &str) -> Result<Compilation, CodegenError> {
        info!("=== LEXICAL ANALYSIS ===");
        let tokens = lexer::tokenize(source);
        for token in &tokens {
            debug!(
                kind = ?token.kind,
                text = token.text,
                line = token.line(),
                column = token.column(),
                "token"
            );
        }
        let token_count = tokens.len();

        info!("=== SYNTAX ANALYSIS ===");
        let parsed = parser::parse_tokens(tokens);
        if let Some(error) = &parsed.error {
            warn!(%error, "parsing stopped early");
        }
        info!(
            statements = parsed.program.statements.len(),
            "abstract syntax tree generated"
        );

        info!("=== CODE GENERATION ===");
        let mut generator = CodeGenerator::new();
        generator.generate_code(&parsed.program)?;

        Ok(Compilation {
            tokens: token_count,
            statements: parsed.program.statements.len(),
            parse_error: parsed.error,
            assembly: generator.into_assembly(),
        })
    }
}

/// Writes one listing line per row to `path`, replacing any existing file.
pub fn write_listing(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
