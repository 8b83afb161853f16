//! Savings graph: nodes, directed edges, and construction helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A customer node in the savings graph.
///
/// Nodes carry an externally supplied `id` (uniqueness is the caller's
/// responsibility, not enforced here) and the indices of their two
/// depot-facing edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    dn_edge: usize,
    nd_edge: usize,
}

impl Node {
    /// External identifier of this node.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Index of the depot→node edge.
    pub fn dn_edge(&self) -> usize {
        self.dn_edge
    }

    /// Index of the node→depot edge.
    pub fn nd_edge(&self) -> usize {
        self.nd_edge
    }
}

/// A directed travel edge between two endpoints.
///
/// An endpoint is either a customer (`Some(node_index)`) or the depot
/// (`None`). Edges are immutable after graph construction; the solver only
/// reorders and references them by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    origin: Option<usize>,
    dest: Option<usize>,
    saving: f64,
    cost: f64,
    inverse: usize,
}

impl Edge {
    /// Origin endpoint (`None` = depot).
    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    /// Destination endpoint (`None` = depot).
    pub fn dest(&self) -> Option<usize> {
        self.dest
    }

    /// Saving obtained by routing this edge directly instead of through
    /// the depot.
    pub fn saving(&self) -> f64 {
        self.saving
    }

    /// Travel cost of this edge.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Index of the edge travelling the opposite direction.
    pub fn inverse(&self) -> usize {
        self.inverse
    }

    /// Returns `true` if either endpoint is the depot.
    pub fn touches_depot(&self) -> bool {
        self.origin.is_none() || self.dest.is_none()
    }
}

/// A structural defect detected while validating a savings graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node's depot edge index is out of bounds.
    EdgeOutOfBounds {
        /// Node index with the dangling reference.
        node: usize,
    },
    /// A node's `dn_edge`/`nd_edge` does not actually link it to the depot.
    BadDepotEdge {
        /// Offending node index.
        node: usize,
    },
    /// An edge endpoint references a node index that does not exist.
    NodeOutOfBounds {
        /// Offending edge index.
        edge: usize,
    },
    /// An edge's inverse is missing, out of bounds, or not a closed pair.
    BadInverse {
        /// Offending edge index.
        edge: usize,
    },
    /// An edge carries a negative or non-finite cost, or a non-finite saving.
    BadWeight {
        /// Offending edge index.
        edge: usize,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::EdgeOutOfBounds { node } => {
                write!(f, "node {node} references an edge out of bounds")
            }
            GraphError::BadDepotEdge { node } => {
                write!(f, "node {node} has a malformed depot edge")
            }
            GraphError::NodeOutOfBounds { edge } => {
                write!(f, "edge {edge} references a node out of bounds")
            }
            GraphError::BadInverse { edge } => {
                write!(f, "edge {edge} has no well-formed inverse")
            }
            GraphError::BadWeight { edge } => {
                write!(f, "edge {edge} has a non-finite or negative weight")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// The fixed node/edge graph a solver run is bound to.
///
/// Owns all nodes and edges; everything else refers to them by index.
/// The savings list holds one direction per customer pair.
///
/// # Examples
///
/// ```
/// use cws_routing::models::SavingsGraph;
///
/// let graph = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0), (6.0, 8.0)]);
/// assert_eq!(graph.num_nodes(), 2);
/// assert!(graph.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    savings: Vec<usize>,
}

impl SavingsGraph {
    /// Starts an incremental graph builder.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Builds a complete Euclidean instance from a depot location and
    /// customer coordinates.
    ///
    /// Node ids are assigned from position. Every customer pair is
    /// connected; all costs are symmetric straight-line distances.
    pub fn from_coordinates(depot: (f64, f64), points: &[(f64, f64)]) -> Self {
        let mut builder = GraphBuilder::new();
        let indices: Vec<usize> = points
            .iter()
            .enumerate()
            .map(|(id, &p)| builder.add_node(id, euclidean(depot, p)))
            .collect();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                builder.connect(indices[i], indices[j], euclidean(points[i], points[j]));
            }
        }
        builder.build()
    }

    /// Assembles a graph from caller-provided nodes and edges.
    ///
    /// The savings list is derived as the customer-to-customer edges,
    /// keeping the lower-indexed direction of each inverse pair. Fails
    /// fast on any structural defect.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let savings = edges
            .iter()
            .enumerate()
            .filter(|(idx, e)| !e.touches_depot() && *idx < e.inverse)
            .map(|(idx, _)| idx)
            .collect();
        let graph = Self {
            nodes,
            edges,
            savings,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Number of customer nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// All customer nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node at the given index.
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// All edges, depot-facing ones included.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge at the given index.
    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    /// Indices of the customer-to-customer savings edges, one direction
    /// per pair, in construction order.
    pub fn savings_edges(&self) -> &[usize] {
        &self.savings
    }

    /// Checks the structural invariants the solver relies on.
    ///
    /// Every node must own a well-formed depot round trip and every edge a
    /// closed inverse pair with finite, non-negative weights.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.dn_edge >= self.edges.len() || node.nd_edge >= self.edges.len() {
                return Err(GraphError::EdgeOutOfBounds { node: idx });
            }
            let dn = &self.edges[node.dn_edge];
            let nd = &self.edges[node.nd_edge];
            if dn.origin.is_some() || dn.dest != Some(idx) {
                return Err(GraphError::BadDepotEdge { node: idx });
            }
            if nd.origin != Some(idx) || nd.dest.is_some() {
                return Err(GraphError::BadDepotEdge { node: idx });
            }
        }
        for (idx, edge) in self.edges.iter().enumerate() {
            for endpoint in [edge.origin, edge.dest] {
                if let Some(n) = endpoint {
                    if n >= self.nodes.len() {
                        return Err(GraphError::NodeOutOfBounds { edge: idx });
                    }
                }
            }
            if edge.inverse >= self.edges.len() {
                return Err(GraphError::BadInverse { edge: idx });
            }
            let inv = &self.edges[edge.inverse];
            if inv.inverse != idx || inv.origin != edge.dest || inv.dest != edge.origin {
                return Err(GraphError::BadInverse { edge: idx });
            }
            if !edge.cost.is_finite() || edge.cost < 0.0 || !edge.saving.is_finite() {
                return Err(GraphError::BadWeight { edge: idx });
            }
        }
        Ok(())
    }
}

/// Incremental construction of a [`SavingsGraph`].
///
/// # Examples
///
/// ```
/// use cws_routing::models::SavingsGraph;
///
/// let mut builder = SavingsGraph::builder();
/// let a = builder.add_node(10, 5.0);
/// let b = builder.add_node(11, 4.0);
/// builder.connect(a, b, 2.0);
/// let graph = builder.build();
///
/// // saving = cost(a, depot) + cost(depot, b) - cost(a, b)
/// let eid = graph.savings_edges()[0];
/// assert!((graph.edge(eid).saving() - 7.0).abs() < 1e-10);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    savings: Vec<usize>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a customer with the given external id and symmetric
    /// depot travel cost. Returns the node's graph index.
    pub fn add_node(&mut self, id: usize, depot_cost: f64) -> usize {
        let index = self.nodes.len();
        let dn = self.edges.len();
        let nd = dn + 1;
        self.edges.push(Edge {
            origin: None,
            dest: Some(index),
            saving: 0.0,
            cost: depot_cost,
            inverse: nd,
        });
        self.edges.push(Edge {
            origin: Some(index),
            dest: None,
            saving: 0.0,
            cost: depot_cost,
            inverse: dn,
        });
        self.nodes.push(Node {
            id,
            dn_edge: dn,
            nd_edge: nd,
        });
        index
    }

    /// Connects two customers with a symmetric travel cost, creating the
    /// edge and its inverse as a closed pair.
    ///
    /// The saving of each direction is
    /// `cost(origin, depot) + cost(depot, dest) - cost`.
    pub fn connect(&mut self, a: usize, b: usize, cost: f64) {
        let ab = self.edges.len();
        let ba = ab + 1;
        let saving_ab =
            self.edges[self.nodes[a].nd_edge].cost + self.edges[self.nodes[b].dn_edge].cost - cost;
        let saving_ba =
            self.edges[self.nodes[b].nd_edge].cost + self.edges[self.nodes[a].dn_edge].cost - cost;
        self.edges.push(Edge {
            origin: Some(a),
            dest: Some(b),
            saving: saving_ab,
            cost,
            inverse: ba,
        });
        self.edges.push(Edge {
            origin: Some(b),
            dest: Some(a),
            saving: saving_ba,
            cost,
            inverse: ab,
        });
        self.savings.push(ab);
    }

    /// Finishes construction.
    pub fn build(self) -> SavingsGraph {
        SavingsGraph {
            nodes: self.nodes,
            edges: self.edges,
            savings: self.savings,
        }
    }
}

fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_depot_edges() {
        let mut builder = SavingsGraph::builder();
        let a = builder.add_node(7, 5.0);
        let graph = builder.build();

        let node = graph.node(a);
        assert_eq!(node.id(), 7);
        let dn = graph.edge(node.dn_edge());
        let nd = graph.edge(node.nd_edge());
        assert_eq!(dn.origin(), None);
        assert_eq!(dn.dest(), Some(a));
        assert_eq!(nd.origin(), Some(a));
        assert_eq!(nd.dest(), None);
        assert_eq!(dn.inverse(), node.nd_edge());
        assert_eq!(nd.inverse(), node.dn_edge());
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_connect_saving_formula() {
        let mut builder = SavingsGraph::builder();
        let a = builder.add_node(0, 3.0);
        let b = builder.add_node(1, 4.0);
        builder.connect(a, b, 1.0);
        let graph = builder.build();

        assert_eq!(graph.savings_edges().len(), 1);
        let e = graph.edge(graph.savings_edges()[0]);
        // 3 + 4 - 1
        assert!((e.saving() - 6.0).abs() < 1e-10);
        let inv = graph.edge(e.inverse());
        assert!((inv.saving() - 6.0).abs() < 1e-10);
        assert_eq!(inv.origin(), Some(b));
        assert_eq!(inv.dest(), Some(a));
    }

    #[test]
    fn test_inverse_closed_pair() {
        let graph = SavingsGraph::from_coordinates((0.0, 0.0), &[(1.0, 0.0), (0.0, 1.0)]);
        for (idx, edge) in graph.edges().iter().enumerate() {
            let inv = graph.edge(edge.inverse());
            assert_eq!(inv.inverse(), idx);
            assert_eq!(inv.origin(), edge.dest());
            assert_eq!(inv.dest(), edge.origin());
        }
    }

    #[test]
    fn test_from_coordinates_complete() {
        let graph = SavingsGraph::from_coordinates(
            (0.0, 0.0),
            &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)],
        );
        assert_eq!(graph.num_nodes(), 4);
        // one savings edge per unordered pair
        assert_eq!(graph.savings_edges().len(), 6);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let built = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0), (6.0, 0.0)]);
        let rebuilt = SavingsGraph::from_parts(built.nodes().to_vec(), built.edges().to_vec())
            .expect("well-formed parts");
        assert_eq!(rebuilt.savings_edges(), built.savings_edges());
    }

    #[test]
    fn test_validate_bad_inverse() {
        let built = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0), (6.0, 0.0)]);
        let mut edges = built.edges().to_vec();
        let last = edges.len() - 1;
        edges[last].inverse = last; // self-inverse breaks the pair
        let err = SavingsGraph::from_parts(built.nodes().to_vec(), edges).unwrap_err();
        assert!(matches!(err, GraphError::BadInverse { .. }));
    }

    #[test]
    fn test_validate_bad_weight() {
        let built = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0), (6.0, 0.0)]);
        let mut edges = built.edges().to_vec();
        edges[0].cost = f64::NAN;
        let err = SavingsGraph::from_parts(built.nodes().to_vec(), edges).unwrap_err();
        assert!(matches!(err, GraphError::BadWeight { .. }));
    }

    #[test]
    fn test_validate_bad_depot_edge() {
        let built = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0), (6.0, 0.0)]);
        let mut nodes = built.nodes().to_vec();
        // point the first node's outbound depot edge at the second node's
        nodes[0].dn_edge = nodes[1].dn_edge;
        let err = SavingsGraph::from_parts(nodes, built.edges().to_vec()).unwrap_err();
        assert!(matches!(err, GraphError::BadDepotEdge { node: 0 }));
    }

    #[test]
    fn test_error_display() {
        let err = GraphError::BadInverse { edge: 3 };
        assert_eq!(err.to_string(), "edge 3 has no well-formed inverse");
    }
}
