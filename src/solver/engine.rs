//! Clarke-Wright savings solver.
//!
//! # Algorithm
//!
//! The savings heuristic (Clarke & Wright, 1964) starts with each customer
//! on its own round trip (depot → customer → depot). It then walks the edges
//! in decreasing order of saving:
//!
//! ```text
//! s(i, j) = c(i, depot) + c(depot, j) - c(i, j)
//! ```
//!
//! and merges the two routes an edge connects whenever its endpoints sit at
//! compatible route ends, optionally reversing one route (or substituting
//! the inverse edge) to make the ends compatible. A single pass is greedy
//! with no backtracking; the biased-randomised variant feeds the same pass a
//! perturbed consumption order, which the iterated local search exploits by
//! restarting construction and keeping the best solution found.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::biased::BiasedSelector;
use super::config::CwsConfig;
use crate::models::{GraphError, Route, SavingsGraph, Solution};

/// An error raised before solving begins.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The configuration failed validation.
    InvalidConfig(String),
    /// The graph failed structural validation.
    Graph(GraphError),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            SolverError::Graph(err) => write!(f, "malformed graph: {err}"),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Graph(err) => Some(err),
            SolverError::InvalidConfig(_) => None,
        }
    }
}

impl From<GraphError> for SolverError {
    fn from(err: GraphError) -> Self {
        SolverError::Graph(err)
    }
}

/// The Clarke-Wright savings solver, bound to a fixed graph.
///
/// # Examples
///
/// ```
/// use cws_routing::models::SavingsGraph;
/// use cws_routing::solver::{CwsConfig, SavingsSolver};
///
/// let graph = SavingsGraph::from_coordinates(
///     (0.0, 0.0),
///     &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)],
/// );
/// let solver = SavingsSolver::new(&graph);
/// let solution = solver.solve(&CwsConfig::default()).unwrap();
/// assert_eq!(solution.num_routes(), 1);
/// assert!((solution.total_cost() - 8.0).abs() < 1e-10);
/// ```
#[derive(Debug)]
pub struct SavingsSolver<'a> {
    graph: &'a SavingsGraph,
}

impl<'a> SavingsSolver<'a> {
    /// Binds a solver to the given graph.
    pub fn new(graph: &'a SavingsGraph) -> Self {
        Self { graph }
    }

    /// Runs the solver with an RNG derived from `config.seed`.
    ///
    /// Validates the configuration and the graph, runs one heuristic pass,
    /// and when `config.metaheuristic` is set hands the result (or
    /// `config.start`, if supplied) to the iterated local search.
    pub fn solve(&self, config: &CwsConfig) -> Result<Solution, SolverError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.solve_with_rng(config, &mut rng)
    }

    /// Runs the solver with a caller-supplied random source.
    ///
    /// The biased draws are the only nondeterminism in a run, so injecting
    /// a fixed RNG makes the whole solve reproducible.
    pub fn solve_with_rng<R: Rng>(
        &self,
        config: &CwsConfig,
        rng: &mut R,
    ) -> Result<Solution, SolverError> {
        config.validate().map_err(SolverError::InvalidConfig)?;
        self.graph.validate()?;

        let baseline = self.heuristic(config, rng);
        if config.metaheuristic {
            let start = config.start.clone().unwrap_or(baseline);
            Ok(self.iterated_search(start, config, rng))
        } else {
            Ok(baseline)
        }
    }

    /// The savings-edge indices in consumption order: descending saving,
    /// ties broken by ascending edge index so runs are reproducible.
    pub fn savings_order(&self) -> Vec<usize> {
        let mut order = self.graph.savings_edges().to_vec();
        order.sort_by(|&a, &b| {
            self.graph
                .edge(b)
                .saving()
                .partial_cmp(&self.graph.edge(a).saving())
                .expect("saving should not be NaN")
                .then_with(|| a.cmp(&b))
        });
        order
    }

    /// One greedy construction pass.
    ///
    /// Starts from the dummy solution (one singleton route per node) and
    /// merges along the savings order until it is exhausted or only
    /// `config.min_routes` routes remain.
    ///
    /// # Panics
    ///
    /// Panics if `config` has not passed [`CwsConfig::validate`]; use
    /// [`SavingsSolver::solve`] for checked entry.
    pub fn heuristic<R: Rng>(&self, config: &CwsConfig, rng: &mut R) -> Solution {
        let graph = self.graph;
        let n = graph.num_nodes();

        // dummy solution: every node in its own trivial round trip
        let mut routes: Vec<Route> = (0..n).map(|i| Route::singleton(i, graph)).collect();
        let mut route_of: Vec<usize> = (0..n).collect();
        let mut active = n;

        let order = self.savings_order();
        let sequence: Box<dyn Iterator<Item = usize> + '_> = if config.biased {
            let selector = BiasedSelector::new(order, config.bias, rng)
                .expect("bias validated before solving");
            Box::new(selector)
        } else {
            Box::new(order.into_iter())
        };

        for eid in sequence {
            // route floor reached: normal termination, not a failure
            if active <= config.min_routes {
                break;
            }
            let edge = graph.edge(eid);
            let (Some(i), Some(j)) = (edge.origin(), edge.dest()) else {
                continue;
            };
            let (ri, rj) = (route_of[i], route_of[j]);
            if ri == rj {
                continue;
            }

            // merging through an interior node would break contiguity
            let i_first = routes[ri].first_node(graph) == Some(i);
            let i_last = routes[ri].last_node(graph) == Some(i);
            let j_first = routes[rj].first_node(graph) == Some(j);
            let j_last = routes[rj].last_node(graph) == Some(j);
            if !(i_first || i_last) || !(j_first || j_last) {
                continue;
            }

            // (surviving slot, absorbed slot, connecting edge, slot to reverse)
            let plan = if i_last && j_first {
                Some((ri, rj, eid, None))
            } else if !config.reverse {
                None
            } else if i_first && j_last {
                // reversing both routes is equivalent to travelling the
                // connecting edge backwards
                Some((rj, ri, edge.inverse(), None))
            } else if i_first {
                Some((ri, rj, eid, Some(ri)))
            } else {
                Some((ri, rj, eid, Some(rj)))
            };
            let Some((left, right, connect, reverse_slot)) = plan else {
                continue;
            };

            // checked before any mutation, so an infeasible candidate
            // leaves both routes untouched
            let new_cost =
                routes[left].cost() + routes[right].cost() - graph.edge(connect).saving();
            if new_cost > config.max_cost {
                continue;
            }

            if let Some(slot) = reverse_slot {
                let flipped = routes[slot].reversed(graph);
                routes[slot] = flipped;
            }
            merge_into(graph, &mut routes, &mut route_of, left, right, connect);
            active -= 1;
        }

        let mut solution = Solution::new();
        for route in routes.into_iter().filter(|r| !r.is_empty()) {
            solution.add_route(route);
        }
        solution
    }

    /// Iterated local search: restart construction up to `max_iter` times
    /// with a fresh biased draw, keep the strictly best solution, stop
    /// early once `max_no_improve` iterations pass without improvement.
    ///
    /// Never returns a solution worse than `start`.
    fn iterated_search<R: Rng>(
        &self,
        start: Solution,
        config: &CwsConfig,
        rng: &mut R,
    ) -> Solution {
        let mut best = start;
        let mut no_improve = 0usize;
        for _ in 0..config.max_iter {
            if no_improve > config.max_no_improve {
                break;
            }
            let candidate = self.heuristic(config, rng);
            if candidate.total_cost() < best.total_cost() {
                best = candidate;
                no_improve = 0;
            } else {
                no_improve += 1;
            }
        }
        best
    }
}

/// Splices the `right` route into `left` through `connect` and repoints
/// membership for every absorbed customer. The emptied `right` slot never
/// passes an endpoint check again.
fn merge_into(
    graph: &SavingsGraph,
    routes: &mut [Route],
    route_of: &mut [usize],
    left: usize,
    right: usize,
    connect: usize,
) {
    let absorbed = std::mem::take(&mut routes[right]);
    let target = &mut routes[left];
    target.pop_last_edge(graph);
    target.push_edge(connect, graph);
    target.append_tail(&absorbed, graph);

    for &eid in absorbed.edges() {
        let edge = graph.edge(eid);
        for endpoint in [edge.origin(), edge.dest()] {
            if let Some(node) = endpoint {
                route_of[node] = left;
            }
        }
    }
}
