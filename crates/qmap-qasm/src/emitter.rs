//! Second pass: route and emit the circuit on physical qubits.

use qmap_core::{Mapper, PHYSICAL_REGISTER};
use tracing::{info, instrument};

use crate::ast::{GateCall, Operand, Program, Statement};
use crate::cost::{CostModel, RemapReport};
use crate::error::QasmResult;
use crate::registers::Registers;

/// Prefix of the header comment listing the initial layout.
pub const INITIAL_LAYOUT_MARKER: &str = "//i";

/// A remapped circuit and its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Remapped {
    /// `OpenQASM` 2 source over the physical register.
    pub qasm: String,
    /// Counters and cost.
    pub report: RemapReport,
}

/// Emit `program` over physical qubits, inserting SWAPs where needed.
///
/// `mapper` must already be placed. The output starts with a comment that
/// lists the initial physical qubit of every declared logical qubit in
/// declaration order, replaces all quantum registers by a single
/// `qreg Q[n];` and keeps classical registers as declared.
#[instrument(skip_all)]
pub fn emit(
    program: &Program,
    registers: &Registers,
    mapper: &mut Mapper<'_>,
    costs: &CostModel,
) -> QasmResult<Remapped> {
    let mut emitter = Emitter {
        mapper,
        registers,
        costs,
        output: String::new(),
        cost: 0,
    };
    emitter.emit_program(program)?;

    let report = RemapReport {
        metrics: emitter.mapper.metrics(),
        cost: emitter.cost,
    };
    info!(
        "Emitted circuit: {} two-qubit ops, {} swaps, cost {}",
        report.metrics.two_qubit_ops, report.metrics.swaps, report.cost
    );
    Ok(Remapped {
        qasm: emitter.output,
        report,
    })
}

struct Emitter<'e, 't> {
    mapper: &'e mut Mapper<'t>,
    registers: &'e Registers,
    costs: &'e CostModel,
    output: String,
    cost: u64,
}

impl Emitter<'_, '_> {
    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_program(&mut self, program: &Program) -> QasmResult<()> {
        self.emit_initial_layout()?;

        self.writeln(&format!("OPENQASM {};", program.version));
        for statement in &program.statements {
            if let Statement::Include(path) = statement {
                self.writeln(&format!("include \"{path}\";"));
            }
        }
        let size = self
            .mapper
            .topology()
            .qubits()
            .iter()
            .max()
            .map_or(0, |&max| max + 1);
        self.writeln(&format!("qreg {PHYSICAL_REGISTER}[{size}];"));

        for statement in &program.statements {
            self.emit_statement(statement)?;
        }
        Ok(())
    }

    fn emit_initial_layout(&mut self) -> QasmResult<()> {
        let mut line = INITIAL_LAYOUT_MARKER.to_string();
        for name in self.registers.qubit_names() {
            line.push(' ');
            line.push_str(&self.mapper.resolve_label(&name)?);
        }
        self.writeln(&line);
        self.writeln("");
        Ok(())
    }

    fn emit_statement(&mut self, statement: &Statement) -> QasmResult<()> {
        match statement {
            Statement::Include(_) | Statement::QReg(_) => {}
            Statement::CReg(decl) => {
                self.writeln(&format!("creg {}[{}];", decl.name, decl.size));
            }
            Statement::Gate(gate) => {
                for qubits in self.registers.gate_applications(gate)? {
                    self.emit_gate(gate, &qubits)?;
                }
            }
            Statement::Measure { qubit, bit } => {
                for (q, c) in self.registers.measure_pairs(qubit, bit)? {
                    let label = self.mapper.resolve_label(&q)?;
                    self.writeln(&format!("measure {label} -> {c};"));
                }
            }
            Statement::Reset(operand) => {
                for name in self.registers.expand_qubits(operand)? {
                    let label = self.mapper.resolve_label(&name)?;
                    self.writeln(&format!("reset {label};"));
                }
            }
            Statement::Barrier(operands) => {
                let labels = self.labels(operands)?;
                self.writeln(&format!("barrier {};", labels.join(",")));
            }
        }
        Ok(())
    }

    fn emit_gate(&mut self, gate: &GateCall, qubits: &[String]) -> QasmResult<()> {
        if let [a, b] = qubits {
            for swap in self.mapper.route_adjacent(a, b)? {
                self.writeln(&format!("swap {swap};"));
                self.cost += self.costs.swap;
            }
        }

        let labels = qubits
            .iter()
            .map(|name| self.mapper.resolve_label(name))
            .collect::<Result<Vec<_>, _>>()?;
        let line = match &gate.params {
            Some(params) => format!("{}({params}) {};", gate.name, labels.join(",")),
            None => format!("{} {};", gate.name, labels.join(",")),
        };
        self.writeln(&line);
        self.cost += self.costs.gate_cost(&gate.name, qubits.len());
        Ok(())
    }

    fn labels(&self, operands: &[Operand]) -> QasmResult<Vec<String>> {
        let mut labels = Vec::new();
        for operand in operands {
            for name in self.registers.expand_qubits(operand)? {
                labels.push(self.mapper.resolve_label(&name)?);
            }
        }
        Ok(labels)
    }
}
