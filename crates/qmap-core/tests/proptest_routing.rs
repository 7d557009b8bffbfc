//! Property-based tests for pathfinding, placement and routing.
//!
//! Topologies are small random connected graphs (at most 10 qubits), so
//! shortest paths can be checked against petgraph's Dijkstra.

use petgraph::Graph;
use petgraph::Undirected;
use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;
use proptest::prelude::*;
use qmap_core::{
    INITIAL_EDGE_WEIGHT, InteractionGraph, Mapper, MapperConfig, MeetingStrategy, MoverStrategy,
    Topology,
};
use rustc_hash::FxHashSet;

/// Random connected graph: a random spanning tree plus a few extra edges.
fn arb_topology() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (2_u32..=10).prop_flat_map(|n| {
        let tree: Vec<_> = (1..n).map(|i| (0..i).prop_map(move |j| (j, i))).collect();
        let extra = prop::collection::vec((0..n, 0..n), 0..=8);
        (Just(n), tree, extra).prop_map(|(n, tree, extra)| {
            let mut edges = tree;
            edges.extend(extra.into_iter().filter(|(a, b)| a != b));
            (n, edges)
        })
    })
}

/// Random topology plus a random interaction sequence over at most `n`
/// logical qubits.
fn arb_circuit() -> impl Strategy<Value = (u32, Vec<(u32, u32)>, u32, Vec<(u32, u32)>)> {
    arb_topology().prop_flat_map(|(n, edges)| {
        (1..=n).prop_flat_map(move |k| {
            let ops = prop::collection::vec((0..k, 0..k), 0..=20);
            (Just(n), Just(edges.clone()), Just(k), ops)
        })
    })
}

fn oracle_distances(n: u32, edges: &[(u32, u32)], from: u32) -> Vec<Option<usize>> {
    let mut graph: Graph<u32, (), Undirected> = Graph::new_undirected();
    let nodes: Vec<NodeIndex> = (0..n).map(|q| graph.add_node(q)).collect();
    for &(a, b) in edges {
        graph.add_edge(nodes[a as usize], nodes[b as usize], ());
    }
    let costs = dijkstra(&graph, nodes[from as usize], None, |_| 1_usize);
    nodes.iter().map(|node| costs.get(node).copied()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn bfs_matches_dijkstra((n, edges) in arb_topology()) {
        let topology = Topology::from_edges(0..n, edges.iter().copied()).unwrap();

        for from in 0..n {
            let expected = oracle_distances(n, &edges, from);
            for to in 0..n {
                let path = topology.shortest_path(from, to).unwrap();
                prop_assert_eq!(Some(path.len() - 1), expected[to as usize]);
                prop_assert_eq!(path.first().copied(), Some(from));
                prop_assert_eq!(path.last().copied(), Some(to));
                for pair in path.windows(2) {
                    prop_assert!(topology.is_adjacent(pair[0], pair[1]));
                }
                prop_assert_eq!(topology.distance(from, to), expected[to as usize]);
            }
        }
    }

    #[test]
    fn routing_makes_operands_adjacent(
        (n, edges, k, ops) in arb_circuit(),
        edge_score in any::<bool>(),
        less_connected in any::<bool>(),
    ) {
        let topology = Topology::from_edges(0..n, edges.iter().copied()).unwrap();
        let config = MapperConfig {
            mover: if less_connected { MoverStrategy::LessConnected } else { MoverStrategy::DistanceToCenter },
            meeting: if edge_score { MeetingStrategy::EdgeScore } else { MeetingStrategy::Truncate },
            ..MapperConfig::default()
        };
        let mut mapper = Mapper::with_config(&topology, &config);

        let names: Vec<String> = (0..k).map(|i| format!("q[{i}]")).collect();
        for name in &names {
            mapper.add_qubit(name);
        }
        let ops: Vec<(u32, u32)> = ops.into_iter().filter(|(a, b)| a != b).collect();
        for &(a, b) in &ops {
            mapper.record_interaction(&names[a as usize], &names[b as usize]).unwrap();
        }

        let layout = mapper.place().unwrap();
        prop_assert_eq!(layout.len(), k as usize);
        let used: FxHashSet<u32> = layout.iter().map(|(_, p)| p).collect();
        prop_assert_eq!(used.len(), k as usize);

        let mut expected_swaps = 0;
        for &(a, b) in &ops {
            let (a, b) = (&names[a as usize], &names[b as usize]);
            let before = topology
                .distance(mapper.resolve_physical(a).unwrap(), mapper.resolve_physical(b).unwrap())
                .unwrap();
            let swaps = mapper.route_adjacent(a, b).unwrap();

            // One shortest path, whichever meeting point.
            prop_assert_eq!(swaps.len(), before - 1);
            expected_swaps += swaps.len();
            for swap in &swaps {
                prop_assert!(topology.is_adjacent(swap.0, swap.1));
            }

            let pa = mapper.resolve_physical(a).unwrap();
            let pb = mapper.resolve_physical(b).unwrap();
            prop_assert!(topology.is_adjacent(pa, pb));
        }

        let layout = mapper.layout().unwrap();
        let used: FxHashSet<u32> = layout.iter().map(|(_, p)| p).collect();
        prop_assert_eq!(used.len(), k as usize);
        for (logical, physical) in layout.iter() {
            prop_assert_eq!(layout.logical(physical), Some(logical));
        }

        let metrics = mapper.metrics();
        prop_assert_eq!(metrics.two_qubit_ops, ops.len());
        prop_assert_eq!(metrics.swaps, expected_swaps);
    }

    #[test]
    fn edge_weights_never_decrease(ops in prop::collection::vec((0_u32..6, 0_u32..6), 1..40)) {
        let mut graph = InteractionGraph::new();
        let mut seen: Vec<f64> = Vec::new();
        for (a, b) in ops.into_iter().filter(|(a, b)| a != b) {
            let id = graph.record_interaction(&format!("q{a}"), &format!("q{b}")).unwrap();
            let weight = graph.edge(id).unwrap().weight();
            let index = id.0 as usize;
            if index == seen.len() {
                prop_assert!((weight - INITIAL_EDGE_WEIGHT).abs() < f64::EPSILON);
                seen.push(weight);
            } else {
                prop_assert!(weight > seen[index]);
                seen[index] = weight;
            }
        }
    }
}
