//! End-to-end remapping of small hand-written circuits.

use qmap_core::{MapError, Mapper, MapperConfig, Topology, TopologySpec};
use qmap_qasm::{CostModel, QasmError, collect, emit, parse, remap};

const GHZ_5: &str = r#"
OPENQASM 2.0;
include "qelib1.inc";
qreg q[5];
creg c[5];
h q[0];
cx q[0],q[1];
cx q[1],q[2];
cx q[2],q[3];
cx q[3],q[4];
measure q -> c;
"#;

#[test]
fn test_ghz_on_heavy_hex() {
    let topology = Topology::heavy_hex_65();
    let out = remap(GHZ_5, &topology, &MapperConfig::default(), &CostModel::default()).unwrap();

    assert!(out.qasm.contains("qreg Q[65];"));
    assert!(out.qasm.contains("creg c[5];"));
    assert_eq!(out.qasm.matches("measure ").count(), 5);
    assert_eq!(out.report.metrics.logical_qubits, 5);
    assert_eq!(out.report.metrics.two_qubit_ops, 4);
    // h costs 1, each cx 10.
    assert_eq!(
        out.report.cost,
        1 + 40 + 30 * out.report.metrics.swaps as u64
    );
}

#[test]
fn test_adjacent_pair_needs_no_swaps() {
    let source = "OPENQASM 2.0;\nqreg q[2];\ncx q[0],q[1];\ncx q[1],q[0];\nswap q[0],q[1];";
    let topology = Topology::linear(5);
    let out = remap(source, &topology, &MapperConfig::default(), &CostModel::default()).unwrap();
    assert_eq!(out.report.metrics.swaps, 0);
    assert_eq!(out.report.metrics.two_qubit_ops, 3);
    // The source swap is kept and costed like an inserted one.
    assert_eq!(out.qasm.matches("swap ").count(), 1);
    assert_eq!(out.report.cost, 10 + 10 + 30);
}

#[test]
fn test_multiple_registers_and_initial_layout() {
    let source = "OPENQASM 2.0;\nqreg a[2];\nqreg b[1];\ncreg c[1];\ncx a[0],b[0];\nmeasure b[0] -> c[0];";
    let topology = Topology::linear(3);
    let out = remap(source, &topology, &MapperConfig::default(), &CostModel::default()).unwrap();

    let header = out.qasm.lines().next().unwrap();
    // One label per declared qubit: a[0], a[1], b[0].
    assert_eq!(header.matches("Q[").count(), 3);
    assert!(!out.qasm.contains("qreg a"));
    assert!(!out.qasm.contains("qreg b"));
    assert!(out.qasm.contains("qreg Q[3];"));
}

#[test]
fn test_custom_topology_from_yaml() {
    let yaml = "topology:\n  kind: custom\n  edges: [[10, 11], [11, 12]]\nmeeting: edge-score\n";
    let config: MapperConfig = serde_yaml_ng::from_str(yaml).unwrap();
    assert!(matches!(config.topology, TopologySpec::Custom { .. }));

    let topology = config.topology.build().unwrap();
    let source = "OPENQASM 2.0;\nqreg q[3];\ncx q[0],q[1];\ncx q[1],q[2];\ncx q[0],q[2];";
    let out = remap(source, &topology, &config, &CostModel::default()).unwrap();

    // The register spans the highest physical id.
    assert!(out.qasm.contains("qreg Q[13];"));
    assert!(out.report.metrics.swaps >= 1);
}

#[test]
fn test_topology_reused_across_circuits() {
    let topology = Topology::grid(3, 3);
    let config = MapperConfig::default();
    let costs = CostModel::default();

    let first = remap(GHZ_5, &topology, &config, &costs).unwrap();
    let second = remap(GHZ_5, &topology, &config, &costs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_three_qubit_gate_rejected() {
    let source = "OPENQASM 2.0;\nqreg q[3];\nccx q[0],q[1],q[2];";
    let err = remap(source, &Topology::linear(3), &MapperConfig::default(), &CostModel::default())
        .unwrap_err();
    assert!(matches!(err, QasmError::Unsupported { line: 3, .. }));
}

#[test]
fn test_too_many_qubits() {
    let source = "OPENQASM 2.0;\nqreg q[4];\nh q;";
    let err = remap(source, &Topology::linear(3), &MapperConfig::default(), &CostModel::default())
        .unwrap_err();
    assert!(matches!(
        err,
        QasmError::Map(MapError::TopologyExhausted { .. })
    ));
}

#[test]
fn test_index_out_of_bounds() {
    let source = "OPENQASM 2.0;\nqreg q[2];\ncx q[0],q[2];";
    let err = remap(source, &Topology::linear(3), &MapperConfig::default(), &CostModel::default())
        .unwrap_err();
    assert!(matches!(
        err,
        QasmError::IndexOutOfBounds { index: 2, size: 2, .. }
    ));
}

#[test]
fn test_passes_driven_separately() {
    let topology = Topology::ring(6);
    let program = parse(GHZ_5).unwrap();
    let mut mapper = Mapper::new(&topology);
    let registers = collect(&program, &mut mapper).unwrap();
    assert_eq!(mapper.graph().edge_count(), 4);

    mapper.place().unwrap();
    let out = emit(&program, &registers, &mut mapper, &CostModel::default()).unwrap();
    assert_eq!(out.report.metrics, mapper.metrics());
}
