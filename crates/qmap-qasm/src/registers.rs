//! Register table and operand expansion.

use rustc_hash::FxHashMap;

use crate::ast::{GateCall, Operand, Program, RegisterDecl};
use crate::error::{QasmError, QasmResult};

/// Declared quantum and classical registers.
#[derive(Debug, Clone, Default)]
pub struct Registers {
    qregs: Vec<RegisterDecl>,
    qreg_sizes: FxHashMap<String, u32>,
    cregs: Vec<RegisterDecl>,
    creg_sizes: FxHashMap<String, u32>,
}

impl Registers {
    /// Collect the register declarations of `program`.
    pub fn from_program(program: &Program) -> Self {
        let mut registers = Self::default();
        for decl in program.qregs() {
            registers.qreg_sizes.insert(decl.name.clone(), decl.size);
            registers.qregs.push(decl.clone());
        }
        for decl in program.cregs() {
            registers.creg_sizes.insert(decl.name.clone(), decl.size);
            registers.cregs.push(decl.clone());
        }
        registers
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[RegisterDecl] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[RegisterDecl] {
        &self.cregs
    }

    /// Names of every declared qubit, in declaration order.
    pub fn qubit_names(&self) -> impl Iterator<Item = String> + '_ {
        self.qregs.iter().flat_map(RegisterDecl::elements)
    }

    /// Names of every declared classical bit, in declaration order.
    pub fn bit_names(&self) -> impl Iterator<Item = String> + '_ {
        self.cregs.iter().flat_map(RegisterDecl::elements)
    }

    /// Qubit names an operand stands for.
    pub fn expand_qubits(&self, operand: &Operand) -> QasmResult<Vec<String>> {
        expand(&self.qreg_sizes, operand)
    }

    /// Classical bit names an operand stands for.
    pub fn expand_bits(&self, operand: &Operand) -> QasmResult<Vec<String>> {
        expand(&self.creg_sizes, operand)
    }

    /// Qubit tuples of each application of `gate` after register broadcast.
    pub fn gate_applications(&self, gate: &GateCall) -> QasmResult<Vec<Vec<String>>> {
        let lists = gate
            .operands
            .iter()
            .map(|op| Ok((op.to_string(), self.expand_qubits(op)?)))
            .collect::<QasmResult<Vec<_>>>()?;
        broadcast(&lists)
    }

    /// `(qubit, bit)` pairs of a measurement after register broadcast.
    pub fn measure_pairs(
        &self,
        qubit: &Operand,
        bit: &Operand,
    ) -> QasmResult<Vec<(String, String)>> {
        let lists = [
            (qubit.to_string(), self.expand_qubits(qubit)?),
            (bit.to_string(), self.expand_bits(bit)?),
        ];
        Ok(broadcast(&lists)?
            .into_iter()
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect())
    }
}

/// An element reference yields one name, a whole declared register all of
/// its elements. Undeclared names are taken literally.
fn expand(sizes: &FxHashMap<String, u32>, operand: &Operand) -> QasmResult<Vec<String>> {
    match (operand.index, sizes.get(&operand.register)) {
        (Some(index), Some(&size)) if index >= size => Err(QasmError::IndexOutOfBounds {
            register: operand.register.clone(),
            index,
            size,
        }),
        (None, Some(&size)) => Ok((0..size)
            .map(|i| format!("{}[{i}]", operand.register))
            .collect()),
        _ => Ok(vec![operand.to_string()]),
    }
}

/// Zip expanded operand lists into per-application tuples.
///
/// Single names repeat against longer lists; all longer lists must have the
/// same length.
pub fn broadcast(lists: &[(String, Vec<String>)]) -> QasmResult<Vec<Vec<String>>> {
    let mut width = 1;
    let mut widest: &str = "";
    for (label, names) in lists {
        if names.len() == 1 {
            continue;
        }
        if width == 1 {
            width = names.len();
            widest = label.as_str();
        } else if names.len() != width {
            return Err(QasmError::SizeMismatch {
                left: widest.to_string(),
                left_size: width,
                right: label.clone(),
                right_size: names.len(),
            });
        }
    }

    Ok((0..width)
        .map(|i| {
            lists
                .iter()
                .map(|(_, names)| {
                    if names.len() == 1 {
                        names[0].clone()
                    } else {
                        names[i].clone()
                    }
                })
                .collect()
        })
        .collect())
}
