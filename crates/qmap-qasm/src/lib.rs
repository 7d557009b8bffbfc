//! `OpenQASM` 2 Front-End and Remapping Back-End for qmap
//!
//! This crate reads an `OpenQASM` 2 circuit over logical registers, drives
//! the [`qmap_core::Mapper`] through both of its passes, and writes the
//! circuit back out on the device register `Q` with SWAPs inserted.
//!
//! # Supported Subset
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 2.0;` |
//! | Includes | ✅ (passed through) | `include "qelib1.inc";` |
//! | Register declarations | ✅ | `qreg q[5];`, `creg c[5];` |
//! | One- and two-qubit gates | ✅ | `h q[0];`, `cx q[0],q[1];` |
//! | Parameterized gates | ✅ (verbatim) | `rz(pi/4) q[0];` |
//! | Register broadcast | ✅ | `cx a,b;`, `measure q -> c;` |
//! | Measurements | ✅ | `measure q[0] -> c[0];` |
//! | Barrier and reset | ✅ | `barrier q;`, `reset q[1];` |
//! | Gates on three or more qubits | ❌ | `ccx a,b,c;` |
//! | `gate`, `opaque`, `if` | ❌ | |
//!
//! # Output Format
//!
//! ```text
//! //i Q[3] Q[2] Q[4]        initial physical qubit of q[0], q[1], q[2]
//!
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg Q[65];               one register covering the whole device
//! creg c[3];
//! swap Q[4],Q[5];           SWAPs precede the gate that needed them
//! cx Q[3],Q[4];
//! ```
//!
//! # Example
//!
//! ```rust
//! use qmap_core::{MapperConfig, Topology};
//! use qmap_qasm::{CostModel, remap};
//!
//! let source = r#"
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg q[3];
//! creg c[3];
//! h q[0];
//! cx q[0],q[1];
//! cx q[1],q[2];
//! cx q[0],q[2];
//! measure q -> c;
//! "#;
//!
//! let topology = Topology::linear(4);
//! let out = remap(source, &topology, &MapperConfig::default(), &CostModel::default()).unwrap();
//!
//! assert!(out.qasm.starts_with("//i "));
//! assert!(out.qasm.contains("qreg Q[4];"));
//! assert_eq!(out.report.metrics.two_qubit_ops, 3);
//!
//! // The output is itself valid input.
//! let reparsed = qmap_qasm::parse(&out.qasm).unwrap();
//! assert_eq!(reparsed.qregs().count(), 1);
//! ```

pub mod ast;
pub mod cost;
pub mod emitter;
pub mod error;
pub mod frontend;
pub mod lexer;
pub mod parser;
pub mod registers;

pub use ast::{GateCall, Operand, Program, RegisterDecl, Statement};
pub use cost::{CostModel, RemapReport};
pub use emitter::{INITIAL_LAYOUT_MARKER, Remapped, emit};
pub use error::{QasmError, QasmResult};
pub use frontend::collect;
pub use parser::{MAX_GATE_OPERANDS, parse};
pub use registers::Registers;

use qmap_core::{Mapper, MapperConfig, Topology};
use tracing::instrument;

/// Parse, place, route and emit `source` on `topology`.
///
/// Convenience wrapper over [`parse`], [`collect`], [`Mapper::place`] and
/// [`emit`]. The topology is only borrowed, so one instance can serve many
/// circuits.
#[instrument(skip_all)]
pub fn remap(
    source: &str,
    topology: &Topology,
    config: &MapperConfig,
    costs: &CostModel,
) -> QasmResult<Remapped> {
    let program = parse(source)?;
    let mut mapper = Mapper::with_config(topology, config);
    let registers = collect(&program, &mut mapper)?;
    mapper.place()?;
    emit(&program, &registers, &mut mapper, costs)
}
