//! Code generation: lower the parsed AST into assembly for an 8-bit
//! accumulator machine.
//!
//! Every expression leaves its value in `A`. Binary operations park the left
//! operand on the hardware stack while the right one is evaluated, then move
//! the right operand into `X` and combine. Variables live in consecutive
//! memory cells starting at [`BASE_ADDRESS`].

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::ast::{BinaryOperator, Expression, Program, Statement};

/// First memory cell handed out to a declared variable.
pub const BASE_ADDRESS: usize = 0x80;

const HEADER: [&str; 3] = [
    "; SimpleLang Compiler Output",
    "; Generated Assembly for 8-bit CPU",
    "",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("Comparison '==' is only supported as the condition of an if statement")]
    MisplacedComparison,
}

pub struct CodeGenerator {
    addresses: HashMap<String, usize>,
    next_address: usize,
    label_counter: usize,
    assembly: Vec<String>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            addresses: HashMap::new(),
            next_address: BASE_ADDRESS,
            label_counter: 0,
            assembly: HEADER.iter().map(|line| line.to_string()).collect(),
        }
    }

    /// Appends code for every statement followed by the halt instruction.
    /// Stops at the first error; lines emitted before it stay in the listing.
    pub fn generate_code(&mut self, program: &Program) -> Result<(), CodegenError> {
        for statement in &program.statements {
            self.emit_statement(statement)?;
        }

        self.emit("");
        self.emit("    HLT              ; Halt the processor");
        Ok(())
    }

    pub fn assembly(&self) -> &[String] {
        &self.assembly
    }

    pub fn into_assembly(self) -> Vec<String> {
        self.assembly
    }

    pub fn address_of(&self, name: &str) -> Option<usize> {
        self.addresses.get(name).copied()
    }

    fn emit_statement(&mut self, statement: &Statement) -> Result<(), CodegenError> {
        match statement {
            Statement::VariableDeclaration { name } => {
                // A repeated declaration rebinds the name to a fresh cell.
                let address = self.next_address;
                self.next_address += 1;
                self.addresses.insert(name.clone(), address);
                debug!(name = %name, address, "declared variable");
                self.emit(format!("; Declare variable: {name} at address ${address}"));
            }
            Statement::Assignment { name, value } => {
                self.emit(format!("; Assignment: {name}"));
                self.emit_value(value)?;
                let address = self.lookup(name)?;
                self.emit(format!("    STA ${address}  ; Store to variable {name}"));
            }
            Statement::If { condition, body } => {
                let end_label = self.next_label();
                self.emit("; If statement");
                self.emit_condition(condition)?;
                self.emit(format!(
                    "    BNE {end_label}    ; Branch if not equal (condition false)"
                ));
                self.emit_statement(body)?;
                self.emit(format!("{end_label}:"));
            }
        }

        self.emit("");
        Ok(())
    }

    /// A condition may carry one top-level `==`; its result lives in the
    /// flags, which the following branch consumes.
    fn emit_condition(&mut self, condition: &Expression) -> Result<(), CodegenError> {
        match condition {
            Expression::BinaryOp {
                left,
                op: BinaryOperator::Equal,
                right,
            } => self.emit_binary(left, BinaryOperator::Equal, right),
            other => self.emit_value(other),
        }
    }

    fn emit_value(&mut self, expr: &Expression) -> Result<(), CodegenError> {
        match expr {
            Expression::Number(value) => {
                self.emit(format!("    LDA #{value}  ; Load immediate value"));
            }
            Expression::Identifier(name) => {
                let address = self.lookup(name)?;
                self.emit(format!("    LDA ${address}  ; Load variable {name}"));
            }
            Expression::BinaryOp {
                op: BinaryOperator::Equal,
                ..
            } => return Err(CodegenError::MisplacedComparison),
            Expression::BinaryOp { left, op, right } => self.emit_binary(left, *op, right)?,
        }
        Ok(())
    }

    fn emit_binary(
        &mut self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
    ) -> Result<(), CodegenError> {
        self.emit_value(left)?;
        self.emit("    PHA              ; Push left operand");
        self.emit_value(right)?;
        self.emit("    TAX              ; Transfer A to X");
        self.emit("    PLA              ; Pop left operand");
        self.emit(match op {
            BinaryOperator::Add => "    ADC X            ; Add X to A",
            BinaryOperator::Sub => "    SBC X            ; Subtract X from A",
            BinaryOperator::Equal => "    CMP X            ; Compare A with X",
        });
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<usize, CodegenError> {
        self.address_of(name)
            .ok_or_else(|| CodegenError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    fn next_label(&mut self) -> String {
        let label = format!("L{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    fn emit(&mut self, line: impl Into<String>) {
        self.assembly.push(line.into());
    }
}

/// Generates the full listing for `program` with a fresh generator.
pub fn generate(program: &Program) -> Result<Vec<String>, CodegenError> {
    let mut generator = CodeGenerator::new();
    generator.generate_code(program)?;
    Ok(generator.into_assembly())
}
