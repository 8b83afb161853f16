//! Route type: one vehicle's closed path through the graph.

use serde::{Deserialize, Serialize};

use super::SavingsGraph;

/// An ordered sequence of edge indices forming a path depot→…→depot.
///
/// The total cost is maintained incrementally: every mutation applies
/// exactly the delta it introduces, so `cost()` always equals the sum of
/// the member edges' costs without ever being recomputed from scratch.
///
/// # Examples
///
/// ```
/// use cws_routing::models::{Route, SavingsGraph};
///
/// let graph = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0)]);
/// let route = Route::singleton(0, &graph);
/// assert_eq!(route.len(), 2);
/// assert!((route.cost() - 10.0).abs() < 1e-10);
/// assert_eq!(route.first_node(&graph), Some(0));
/// assert_eq!(route.last_node(&graph), Some(0));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    edges: Vec<usize>,
    cost: f64,
}

impl Route {
    /// Creates the trivial round trip depot→node→depot.
    pub fn singleton(node: usize, graph: &SavingsGraph) -> Self {
        let n = graph.node(node);
        let cost = graph.edge(n.dn_edge()).cost() + graph.edge(n.nd_edge()).cost();
        Self {
            edges: vec![n.dn_edge(), n.nd_edge()],
            cost,
        }
    }

    /// The member edge indices in travel order.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Number of edges in this route.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if this route holds no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Cached total travel cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The first customer visited after leaving the depot.
    pub fn first_node(&self, graph: &SavingsGraph) -> Option<usize> {
        self.edges.first().and_then(|&e| graph.edge(e).dest())
    }

    /// The last customer visited before returning to the depot.
    pub fn last_node(&self, graph: &SavingsGraph) -> Option<usize> {
        self.edges.last().and_then(|&e| graph.edge(e).origin())
    }

    /// Appends one edge to the tail.
    pub fn push_edge(&mut self, edge: usize, graph: &SavingsGraph) {
        self.cost += graph.edge(edge).cost();
        self.edges.push(edge);
    }

    /// Removes and returns the trailing edge.
    pub fn pop_last_edge(&mut self, graph: &SavingsGraph) -> Option<usize> {
        let edge = self.edges.pop()?;
        self.cost -= graph.edge(edge).cost();
        Some(edge)
    }

    /// Appends all of `other`'s edges except its leading depot edge.
    ///
    /// This is the splice half of a merge: the caller has already dropped
    /// this route's trailing depot edge and pushed the connecting edge.
    pub fn append_tail(&mut self, other: &Route, graph: &SavingsGraph) {
        for &edge in other.edges.iter().skip(1) {
            self.push_edge(edge, graph);
        }
    }

    /// Returns this route travelled in the opposite direction.
    ///
    /// The edge sequence is reversed positionally and every edge replaced
    /// by its inverse, so the travel direction flips as well. The input is
    /// left untouched.
    pub fn reversed(&self, graph: &SavingsGraph) -> Route {
        let mut route = Route::default();
        for &edge in self.edges.iter().rev() {
            route.push_edge(graph.edge(edge).inverse(), graph);
        }
        route
    }

    /// The customer indices visited by this route, in travel order.
    pub fn customers(&self, graph: &SavingsGraph) -> Vec<usize> {
        self.edges
            .iter()
            .filter_map(|&e| graph.edge(e).origin())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph() -> SavingsGraph {
        // depot at the origin, three customers east of it
        SavingsGraph::from_coordinates((0.0, 0.0), &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)])
    }

    fn savings_edge(graph: &SavingsGraph, a: usize, b: usize) -> usize {
        for &eid in graph.savings_edges() {
            let e = graph.edge(eid);
            if e.origin() == Some(a) && e.dest() == Some(b) {
                return eid;
            }
            if e.origin() == Some(b) && e.dest() == Some(a) {
                return e.inverse();
            }
        }
        panic!("no edge between {a} and {b}");
    }

    fn assert_cost_consistent(route: &Route, graph: &SavingsGraph) {
        let sum: f64 = route.edges().iter().map(|&e| graph.edge(e).cost()).sum();
        assert!(
            (route.cost() - sum).abs() < 1e-10,
            "cached cost {} != edge sum {}",
            route.cost(),
            sum
        );
    }

    #[test]
    fn test_singleton() {
        let graph = line_graph();
        let route = Route::singleton(2, &graph);
        assert_eq!(route.len(), 2);
        assert!((route.cost() - 6.0).abs() < 1e-10);
        assert_eq!(route.first_node(&graph), Some(2));
        assert_eq!(route.last_node(&graph), Some(2));
        assert_cost_consistent(&route, &graph);
    }

    #[test]
    fn test_splice_two_singletons() {
        let graph = line_graph();
        let mut left = Route::singleton(0, &graph);
        let right = Route::singleton(1, &graph);

        left.pop_last_edge(&graph);
        left.push_edge(savings_edge(&graph, 0, 1), &graph);
        left.append_tail(&right, &graph);

        // depot→0→1→depot = 1 + 1 + 2
        assert_eq!(left.len(), 3);
        assert!((left.cost() - 4.0).abs() < 1e-10);
        assert_eq!(left.first_node(&graph), Some(0));
        assert_eq!(left.last_node(&graph), Some(1));
        assert_eq!(left.customers(&graph), vec![0, 1]);
        assert_cost_consistent(&left, &graph);
    }

    #[test]
    fn test_pop_last_edge_updates_cost() {
        let graph = line_graph();
        let mut route = Route::singleton(1, &graph);
        let popped = route.pop_last_edge(&graph).expect("non-empty");
        assert_eq!(popped, graph.node(1).nd_edge());
        assert!((route.cost() - 2.0).abs() < 1e-10);
        assert_cost_consistent(&route, &graph);
    }

    #[test]
    fn test_pop_on_empty() {
        let graph = line_graph();
        let mut route = Route::default();
        assert!(route.pop_last_edge(&graph).is_none());
        assert_eq!(route.first_node(&graph), None);
        assert_eq!(route.last_node(&graph), None);
    }

    #[test]
    fn test_reversed_preserves_cost() {
        let graph = line_graph();
        let mut route = Route::singleton(0, &graph);
        route.pop_last_edge(&graph);
        route.push_edge(savings_edge(&graph, 0, 1), &graph);
        let right = Route::singleton(1, &graph);
        route.append_tail(&right, &graph);

        let reversed = route.reversed(&graph);
        assert!((reversed.cost() - route.cost()).abs() < 1e-10);
        assert_eq!(reversed.len(), route.len());
        assert_eq!(reversed.first_node(&graph), Some(1));
        assert_eq!(reversed.last_node(&graph), Some(0));
        assert_cost_consistent(&reversed, &graph);

        // positionally reversed with inverse substituted
        for (pos, &edge) in reversed.edges().iter().enumerate() {
            let original = route.edges()[route.len() - 1 - pos];
            assert_eq!(edge, graph.edge(original).inverse());
        }
        // the original is untouched
        assert_eq!(route.customers(&graph), vec![0, 1]);
    }
}
