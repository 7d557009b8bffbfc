//! First pass: feed declarations and interactions into the mapper.

use qmap_core::Mapper;
use tracing::{debug, info, instrument};

use crate::ast::{Program, Statement};
use crate::error::QasmResult;
use crate::registers::Registers;

/// Walk `program` once and record everything placement needs.
///
/// Every declared qubit and classical bit is declared on the mapper, and
/// every two-qubit gate application (including `swap`) is recorded as an
/// interaction. Qubits referenced without a declaration are added on first
/// use.
#[instrument(skip_all)]
pub fn collect(program: &Program, mapper: &mut Mapper<'_>) -> QasmResult<Registers> {
    let registers = Registers::from_program(program);
    let mut interactions = 0_usize;

    for statement in &program.statements {
        match statement {
            Statement::Include(_) => {}
            Statement::QReg(decl) => {
                for name in decl.elements() {
                    mapper.add_qubit(&name);
                }
            }
            Statement::CReg(decl) => {
                for name in decl.elements() {
                    mapper.add_classical_bit(&name);
                }
            }
            Statement::Gate(gate) => {
                for qubits in registers.gate_applications(gate)? {
                    match qubits.as_slice() {
                        [a, b] => {
                            mapper.record_interaction(a, b)?;
                            interactions += 1;
                        }
                        names => {
                            for name in names {
                                mapper.add_qubit(name);
                            }
                        }
                    }
                }
            }
            Statement::Measure { qubit, bit } => {
                for (q, c) in registers.measure_pairs(qubit, bit)? {
                    mapper.add_qubit(&q);
                    mapper.add_classical_bit(&c);
                }
            }
            Statement::Reset(operand) => {
                for name in registers.expand_qubits(operand)? {
                    mapper.add_qubit(&name);
                }
            }
            Statement::Barrier(operands) => {
                for operand in operands {
                    for name in registers.expand_qubits(operand)? {
                        mapper.add_qubit(&name);
                    }
                }
            }
        }
    }

    let graph = mapper.graph();
    debug!(
        "Interaction graph: {} edges, {} classical bits",
        graph.edge_count(),
        graph.classical_bit_count()
    );
    info!(
        "Collected {} qubits and {} two-qubit operations",
        graph.qubit_count(),
        interactions
    );
    Ok(registers)
}
