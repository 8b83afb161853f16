//! Domain model types for the savings solver.
//!
//! Provides the graph the heuristic runs on (customers, directed edges with
//! precomputed savings, and their inverse links), mutable routes with
//! incrementally maintained costs, and the solution container.

mod graph;
mod route;
mod solution;

pub use graph::{Edge, GraphBuilder, GraphError, Node, SavingsGraph};
pub use route::Route;
pub use solution::Solution;
