//! Syntax tree for the `OpenQASM` 2 subset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed QASM program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Version from the `OPENQASM` header, e.g. "2.0".
    pub version: String,
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Program {
    /// Quantum register declarations in source order.
    pub fn qregs(&self) -> impl Iterator<Item = &RegisterDecl> + '_ {
        self.statements.iter().filter_map(|s| match s {
            Statement::QReg(decl) => Some(decl),
            _ => None,
        })
    }

    /// Classical register declarations in source order.
    pub fn cregs(&self) -> impl Iterator<Item = &RegisterDecl> + '_ {
        self.statements.iter().filter_map(|s| match s {
            Statement::CReg(decl) => Some(decl),
            _ => None,
        })
    }
}

/// A statement of the subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `include "file";`
    Include(String),

    /// `qreg name[size];`
    QReg(RegisterDecl),

    /// `creg name[size];`
    CReg(RegisterDecl),

    /// Gate application with one or two operands.
    Gate(GateCall),

    /// `measure q -> c;`
    Measure { qubit: Operand, bit: Operand },

    /// `reset q;`
    Reset(Operand),

    /// `barrier a, b, ...;`
    Barrier(Vec<Operand>),
}

/// A register declaration. `qreg q;` declares a register of size 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDecl {
    pub name: String,
    pub size: u32,
}

impl RegisterDecl {
    /// Names of the register's elements, e.g. `q[0]`, `q[1]`.
    pub fn elements(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.size).map(|i| format!("{}[{i}]", self.name))
    }
}

/// A gate application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCall {
    /// Gate name as written.
    pub name: String,
    /// Parameter list as raw source text, without the parentheses.
    pub params: Option<String>,
    /// Operands in order.
    pub operands: Vec<Operand>,
    /// Source line of the gate name.
    pub line: usize,
}

/// A reference to a register element (`q[3]`) or a whole register (`q`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operand {
    pub register: String,
    pub index: Option<u32>,
}

impl Operand {
    /// Reference to element `index` of `register`.
    pub fn indexed(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }

    /// Reference to a whole register.
    pub fn whole(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            index: None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{i}]", self.register),
            None => f.write_str(&self.register),
        }
    }
}
