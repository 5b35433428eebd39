//! Sub-networks and their cycle bases.
//!
//! A sub-network is a connected set of buses sharing one carrier, joined by
//! lines. Its cycle matrix `C` has one row per line and one column per
//! independent cycle; entry `±1` says the line lies on the cycle, traversed
//! from `bus0` to `bus1` (`+1`) or against it (`-1`). Kirchhoff's voltage law
//! then reads `Σ_l C[l, c] · x_l · p0_l(t) = 0` for every cycle `c`.
//!
//! Sub-networks normally arrive ready-made from the model builder.
//! [`determine_sub_networks`] derives them from the line table for callers
//! that only have the static topology, using a breadth-first spanning tree
//! per island and one fundamental cycle per chord.

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::error::{LopfError, LopfResult};
use crate::network::Network;

#[derive(Debug, Clone)]
pub struct SubNetwork {
    pub name: String,
    pub carrier: String,
    pub buses: Vec<String>,
    lines: Vec<String>,
    cycles: CsMat<f64>,
}

impl SubNetwork {
    /// Wrap an externally computed cycle matrix (rows = `lines`).
    pub fn new(
        name: impl Into<String>,
        carrier: impl Into<String>,
        buses: Vec<String>,
        lines: Vec<String>,
        cycles: CsMat<f64>,
    ) -> LopfResult<Self> {
        let name = name.into();
        if cycles.rows() != lines.len() {
            return Err(LopfError::Network(format!(
                "cycle matrix of sub-network {name} has {} rows for {} lines",
                cycles.rows(),
                lines.len()
            )));
        }
        let cycles = if cycles.is_csc() {
            cycles
        } else {
            cycles.to_csc()
        };
        Ok(Self {
            name,
            carrier: carrier.into(),
            buses,
            lines,
            cycles,
        })
    }

    /// Build from sparse cycle columns of `(line row, coefficient)` pairs.
    pub fn from_cycle_columns(
        name: impl Into<String>,
        carrier: impl Into<String>,
        buses: Vec<String>,
        lines: Vec<String>,
        columns: &[Vec<(usize, f64)>],
    ) -> LopfResult<Self> {
        let mut triplets = TriMat::new((lines.len(), columns.len()));
        for (col, entries) in columns.iter().enumerate() {
            for &(row, coefficient) in entries {
                if row >= lines.len() {
                    return Err(LopfError::Network(format!(
                        "cycle {col} references line row {row} of {}",
                        lines.len()
                    )));
                }
                triplets.add_triplet(row, col, coefficient);
            }
        }
        Self::new(name, carrier, buses, lines, triplets.to_csc())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines × cycles matrix in compressed-column form.
    pub fn cycles(&self) -> &CsMat<f64> {
        &self.cycles
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.cols()
    }

    /// Lines and orientation coefficients of each cycle.
    pub fn cycle_members(&self) -> Vec<Vec<(&str, f64)>> {
        self.cycles
            .outer_iterator()
            .map(|column| {
                column
                    .iter()
                    .map(|(row, coefficient)| (self.lines[row].as_str(), *coefficient))
                    .collect()
            })
            .collect()
    }
}

/// Derive sub-networks and their fundamental cycles from the line table.
///
/// Buses without lines become single-bus sub-networks. A line joining
/// buses of different carriers is rejected.
pub fn determine_sub_networks(network: &Network) -> LopfResult<Vec<SubNetwork>> {
    let mut graph: UnGraph<usize, usize> = UnGraph::new_undirected();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    for (i, bus) in network.buses.iter().enumerate() {
        index.insert(bus.name.as_str(), graph.add_node(i));
    }

    for (i, line) in network.lines.iter().enumerate() {
        let lookup = |bus: &str| {
            index
                .get(bus)
                .copied()
                .ok_or_else(|| LopfError::missing_entity("Bus", bus))
        };
        let (a, b) = (lookup(&line.bus0)?, lookup(&line.bus1)?);
        let (carrier_a, carrier_b) = (
            &network.buses[graph[a]].carrier,
            &network.buses[graph[b]].carrier,
        );
        if carrier_a != carrier_b {
            return Err(LopfError::Network(format!(
                "line {} joins carriers {carrier_a} and {carrier_b}",
                line.name
            )));
        }
        graph.add_edge(a, b, i);
    }

    let mut visited: BTreeSet<NodeIndex> = BTreeSet::new();
    let mut sub_networks = Vec::new();

    for root in graph.node_indices() {
        if visited.contains(&root) {
            continue;
        }
        let tree = SpanningTree::grow(&graph, root);
        visited.extend(tree.order.iter().copied());

        let mut members: Vec<NodeIndex> = tree.order.clone();
        members.sort();
        let buses: Vec<String> = members
            .iter()
            .map(|n| network.buses[graph[*n]].name.clone())
            .collect();

        let mut edges: Vec<EdgeIndex> = graph
            .edge_references()
            .filter(|e| tree.depth.contains_key(&e.source()))
            .map(|e| e.id())
            .collect();
        edges.sort_by_key(|e| graph[*e]);
        let row_of: HashMap<EdgeIndex, usize> =
            edges.iter().enumerate().map(|(row, e)| (*e, row)).collect();
        let lines: Vec<String> = edges
            .iter()
            .map(|e| network.lines[graph[*e]].name.clone())
            .collect();

        let columns: Vec<Vec<(usize, f64)>> = edges
            .iter()
            .filter(|e| !tree.tree_edges.contains(e))
            .map(|chord| {
                tree.fundamental_cycle(&graph, *chord)
                    .into_iter()
                    .map(|(edge, coefficient)| (row_of[&edge], coefficient))
                    .collect()
            })
            .collect();

        let carrier = network.buses[graph[root]].carrier.clone();
        debug!(
            sub_network = sub_networks.len(),
            carrier = %carrier,
            buses = buses.len(),
            cycles = columns.len(),
            "sub-network determined"
        );
        sub_networks.push(SubNetwork::from_cycle_columns(
            sub_networks.len().to_string(),
            carrier,
            buses,
            lines,
            &columns,
        )?);
    }

    Ok(sub_networks)
}

/// Breadth-first spanning tree of one island.
struct SpanningTree {
    order: Vec<NodeIndex>,
    depth: HashMap<NodeIndex, usize>,
    parent: HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
    tree_edges: BTreeSet<EdgeIndex>,
}

impl SpanningTree {
    fn grow(graph: &UnGraph<usize, usize>, root: NodeIndex) -> Self {
        let mut tree = SpanningTree {
            order: Vec::new(),
            depth: HashMap::from([(root, 0)]),
            parent: HashMap::new(),
            tree_edges: BTreeSet::new(),
        };
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            tree.order.push(node);
            let mut incident: Vec<_> = graph.edges(node).collect();
            incident.sort_by_key(|e| *e.weight());
            for edge in incident {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                if tree.depth.contains_key(&other) {
                    continue;
                }
                tree.depth.insert(other, tree.depth[&node] + 1);
                tree.parent.insert(other, (node, edge.id()));
                tree.tree_edges.insert(edge.id());
                queue.push_back(other);
            }
        }
        tree
    }

    /// Loop closed by `chord`: the chord from bus0 to bus1, then the tree
    /// path from bus1 back to bus0.
    fn fundamental_cycle(
        &self,
        graph: &UnGraph<usize, usize>,
        chord: EdgeIndex,
    ) -> Vec<(EdgeIndex, f64)> {
        // Edge endpoints are stored in insertion order (bus0, bus1).
        let Some((origin, destination)) = graph.edge_endpoints(chord) else {
            return Vec::new();
        };
        let orientation = |edge: EdgeIndex, from: NodeIndex| match graph.edge_endpoints(edge) {
            Some((bus0, _)) if bus0 == from => 1.0,
            _ => -1.0,
        };

        let mut cycle = vec![(chord, 1.0)];
        let mut up = destination;
        let mut down = origin;
        let mut descent = Vec::new();
        while up != down {
            if self.depth[&up] >= self.depth[&down] {
                let (parent, edge) = self.parent[&up];
                cycle.push((edge, orientation(edge, up)));
                up = parent;
            } else {
                let (parent, edge) = self.parent[&down];
                descent.push((edge, orientation(edge, parent)));
                down = parent;
            }
        }
        cycle.extend(descent.into_iter().rev());
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Bus, Line};
    use crate::snapshots::Snapshots;

    fn network(buses: &[(&str, &str)], lines: &[(&str, &str, &str)]) -> Network {
        let mut network = Network::new(Snapshots::hourly(1));
        network.buses = buses
            .iter()
            .map(|(name, carrier)| Bus::new(*name).with_carrier(*carrier))
            .collect();
        network.lines = lines
            .iter()
            .map(|(name, a, b)| Line::new(*name, *a, *b))
            .collect();
        network
    }

    #[test]
    fn test_tree_has_no_cycles() {
        let n = network(
            &[("a", "AC"), ("b", "AC"), ("c", "AC")],
            &[("ab", "a", "b"), ("bc", "b", "c")],
        );
        let subs = determine_sub_networks(&n).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].lines(), ["ab", "bc"]);
        assert_eq!(subs[0].cycle_count(), 0);
    }

    #[test]
    fn test_triangle_has_one_oriented_cycle() {
        let n = network(
            &[("a", "AC"), ("b", "AC"), ("c", "AC")],
            &[("ab", "a", "b"), ("bc", "b", "c"), ("ac", "a", "c")],
        );
        let subs = determine_sub_networks(&n).unwrap();
        assert_eq!(subs[0].cycle_count(), 1);

        let mut members = subs[0].cycle_members().remove(0);
        members.sort_by(|a, b| a.0.cmp(b.0));
        // a→b→c→a: ab and bc along their direction, ac against it
        let signs: Vec<f64> = members.iter().map(|(_, c)| *c).collect();
        let names: Vec<&str> = members.iter().map(|(l, _)| *l).collect();
        assert_eq!(names, ["ab", "ac", "bc"]);
        assert_eq!(signs[0], signs[2]);
        assert_eq!(signs[1], -signs[0]);
    }

    #[test]
    fn test_islands_split_by_carrier() {
        let n = network(
            &[("a", "AC"), ("b", "AC"), ("x", "DC"), ("y", "DC"), ("lonely", "AC")],
            &[("ab", "a", "b"), ("xy", "x", "y"), ("yx", "y", "x")],
        );
        let subs = determine_sub_networks(&n).unwrap();
        assert_eq!(subs.len(), 3);
        let dc = subs.iter().find(|s| s.carrier == "DC").unwrap();
        assert_eq!(dc.cycle_count(), 1);
        let lonely = subs.iter().find(|s| s.buses == ["lonely"]).unwrap();
        assert!(lonely.lines().is_empty());
    }

    #[test]
    fn test_mixed_carrier_line_is_rejected() {
        let n = network(&[("a", "AC"), ("x", "DC")], &[("ax", "a", "x")]);
        assert!(matches!(
            determine_sub_networks(&n),
            Err(LopfError::Network(_))
        ));
    }

    #[test]
    fn test_external_matrix_row_count_is_validated() {
        let matrix: CsMat<f64> = TriMat::new((3, 1)).to_csc();
        let result = SubNetwork::new("0", "AC", vec![], vec!["l1".into()], matrix);
        assert!(result.is_err());
    }
}
