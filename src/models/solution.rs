//! Solution type.

use serde::{Deserialize, Serialize};

use super::Route;

/// A complete solution: a set of routes and their summed cost.
///
/// # Examples
///
/// ```
/// use cws_routing::models::{Route, SavingsGraph, Solution};
///
/// let graph = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0)]);
/// let mut sol = Solution::new();
/// sol.add_route(Route::singleton(0, &graph));
/// assert_eq!(sol.num_routes(), 1);
/// assert!((sol.total_cost() - 10.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    total_cost: f64,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route, accumulating its cost into the total.
    pub fn add_route(&mut self, route: Route) {
        self.total_cost += route.cost();
        self.routes.push(route);
    }

    /// The routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Summed cost of all routes.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Total number of edges across all routes.
    pub fn num_edges(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SavingsGraph;

    #[test]
    fn test_empty() {
        let sol = Solution::new();
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.total_cost(), 0.0);
        assert_eq!(sol.num_edges(), 0);
    }

    #[test]
    fn test_total_cost_accumulates() {
        let graph = SavingsGraph::from_coordinates((0.0, 0.0), &[(3.0, 4.0), (0.0, 2.0)]);
        let mut sol = Solution::new();
        sol.add_route(Route::singleton(0, &graph));
        sol.add_route(Route::singleton(1, &graph));
        assert_eq!(sol.num_routes(), 2);
        // 2*5 + 2*2
        assert!((sol.total_cost() - 14.0).abs() < 1e-10);
        assert_eq!(sol.num_edges(), 4);
    }
}
