//! Syntax tree produced by the parser and consumed by the code generator.
//!
//! Every node owns its children outright. Names are the only link between a
//! use and its declaration; they are resolved during code generation.

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number(i32),
    Identifier(String),
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    /// Only valid as the outermost operator of an `if` condition.
    Equal,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Equal => "==",
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    VariableDeclaration {
        name: String,
    },
    Assignment {
        name: String,
        value: Expression,
    },
    /// The body is a single statement, not a block.
    If {
        condition: Expression,
        body: Box<Statement>,
    },
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}
