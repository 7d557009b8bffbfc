//! Property-based tests for end-to-end remapping.
//!
//! Random CNOT circuits are remapped, the output is replayed from its
//! initial-layout comment through every emitted SWAP, and each emitted gate
//! must land on the logical pair the source asked for.

use proptest::prelude::*;
use qmap_core::{MapperConfig, MeetingStrategy, MoverStrategy, Topology, TopologySpec};
use qmap_qasm::{CostModel, INITIAL_LAYOUT_MARKER, parse, remap};
use rustc_hash::FxHashMap;

fn arb_circuit() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (2_u32..=8).prop_flat_map(|n| {
        let ops = prop::collection::vec(
            (0..n, 0..n).prop_filter("distinct operands", |(a, b)| a != b),
            0..=25,
        );
        (Just(n), ops)
    })
}

fn arb_config() -> impl Strategy<Value = MapperConfig> {
    let spec = prop_oneof![
        Just(TopologySpec::Linear { qubits: 8 }),
        Just(TopologySpec::Ring { qubits: 9 }),
        Just(TopologySpec::Grid { rows: 3, cols: 3 }),
        Just(TopologySpec::HeavyHex65),
    ];
    let mover = prop_oneof![
        Just(MoverStrategy::DistanceToCenter),
        Just(MoverStrategy::LessConnected)
    ];
    let meeting = prop_oneof![
        Just(MeetingStrategy::Truncate),
        Just(MeetingStrategy::EdgeScore)
    ];
    (spec, mover, meeting).prop_map(|(topology, mover, meeting)| MapperConfig {
        topology,
        mover,
        meeting,
        ..MapperConfig::default()
    })
}

fn source_of(n: u32, ops: &[(u32, u32)]) -> String {
    let mut source = format!("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[{n}];\ncreg c[{n}];\n");
    for &(a, b) in ops {
        source.push_str(&format!("cx q[{a}],q[{b}];\n"));
    }
    source.push_str("measure q -> c;\n");
    source
}

/// Physical ids in a line such as `cx Q[3],Q[4];`.
fn physical_ids(line: &str) -> Vec<u32> {
    line.split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().unwrap())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn emitted_gates_replay_source((n, ops) in arb_circuit(), config in arb_config()) {
        let topology = config.topology.build().unwrap();
        let source = source_of(n, &ops);
        let out = remap(&source, &topology, &config, &CostModel::default()).unwrap();

        let mut lines = out.qasm.lines();
        let header = lines.next().unwrap();
        prop_assert!(header.starts_with(INITIAL_LAYOUT_MARKER));

        // physical -> logical index
        let mut at: FxHashMap<u32, u32> = physical_ids(header)
            .into_iter()
            .enumerate()
            .map(|(logical, physical)| (physical, logical as u32))
            .collect();
        prop_assert_eq!(at.len(), n as usize);

        let mut expected = ops.iter();
        let mut swaps = 0;
        for line in lines {
            if line.starts_with("swap ") {
                let ids = physical_ids(line);
                prop_assert!(topology.is_adjacent(ids[0], ids[1]));
                let a = at.remove(&ids[0]);
                let b = at.remove(&ids[1]);
                if let Some(a) = a {
                    at.insert(ids[1], a);
                }
                if let Some(b) = b {
                    at.insert(ids[0], b);
                }
                swaps += 1;
            } else if line.starts_with("cx ") {
                let ids = physical_ids(line);
                prop_assert!(topology.is_adjacent(ids[0], ids[1]));
                let &(a, b) = expected.next().unwrap();
                prop_assert_eq!(at.get(&ids[0]).copied(), Some(a));
                prop_assert_eq!(at.get(&ids[1]).copied(), Some(b));
            }
        }
        prop_assert!(expected.next().is_none());
        prop_assert_eq!(swaps, out.report.metrics.swaps);
        prop_assert_eq!(out.report.metrics.two_qubit_ops, ops.len());
        prop_assert_eq!(
            out.report.cost,
            10 * ops.len() as u64 + 30 * swaps as u64
        );
    }

    #[test]
    fn output_parses_back((n, ops) in arb_circuit()) {
        let topology = Topology::linear(8);
        let out = remap(&source_of(n, &ops), &topology, &MapperConfig::default(), &CostModel::default()).unwrap();
        let program = parse(&out.qasm).unwrap();

        let qregs: Vec<_> = program.qregs().collect();
        prop_assert_eq!(qregs.len(), 1);
        prop_assert_eq!(qregs[0].name.as_str(), "Q");
        prop_assert_eq!(qregs[0].size, 8);
        prop_assert_eq!(program.cregs().count(), 1);
    }
}
