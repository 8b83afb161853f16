//! # cws-routing
//!
//! Vehicle routing through the Clarke-Wright savings heuristic, optionally
//! wrapped in an iterated local search with biased-randomised
//! diversification.
//!
//! ## Modules
//!
//! - [`models`] — Graph primitives (Node, Edge, SavingsGraph), Route, Solution
//! - [`solver`] — Configuration, biased selector, and the savings solver
//!
//! ## Example
//!
//! ```
//! use cws_routing::models::SavingsGraph;
//! use cws_routing::solver::{CwsConfig, SavingsSolver};
//!
//! let graph = SavingsGraph::from_coordinates(
//!     (0.0, 0.0),
//!     &[(10.0, 5.0), (12.0, 8.0), (3.0, 14.0), (7.0, 2.0)],
//! );
//! let config = CwsConfig::default()
//!     .with_biased(true)
//!     .with_metaheuristic(true)
//!     .with_max_iter(100)
//!     .with_max_no_improve(50)
//!     .with_seed(42);
//!
//! let solution = SavingsSolver::new(&graph).solve(&config).unwrap();
//! assert!(solution.num_routes() >= 1);
//! ```

pub mod models;
pub mod solver;
