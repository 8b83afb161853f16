//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::models::Solution;

/// Selection policy for biased-randomised consumption of the savings list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum BiasFunction {
    /// Quasi-geometric selection: `P(idx) ∝ (1 - beta)^idx`.
    ///
    /// Strongly favours the front of the list. Typical `beta`: 0.1–0.5.
    QuasiGeometric {
        /// Distribution parameter, strictly inside (0, 1).
        beta: f64,
    },

    /// Uniform selection over the remaining pool.
    ///
    /// Ignores the list order entirely. Mostly useful as a comparison
    /// baseline against the quasi-geometric policy.
    Uniform,
}

impl Default for BiasFunction {
    fn default() -> Self {
        BiasFunction::QuasiGeometric { beta: 0.3 }
    }
}

/// Configuration for a savings solver run.
///
/// All fields have defaults; callers override only what they need.
///
/// # Examples
///
/// ```
/// use cws_routing::solver::CwsConfig;
///
/// let config = CwsConfig::default()
///     .with_biased(true)
///     .with_metaheuristic(true)
///     .with_max_iter(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CwsConfig {
    /// Consume the savings list through a biased-randomised selector
    /// instead of in strict descending order.
    pub biased: bool,

    /// Selection policy used when `biased` is set.
    pub bias: BiasFunction,

    /// Allow route reversal when evaluating a merge.
    pub reverse: bool,

    /// Wrap the heuristic in the iterated local search loop.
    pub metaheuristic: bool,

    /// Starting solution for the metaheuristic. When absent, the baseline
    /// heuristic run seeds the search.
    pub start: Option<Solution>,

    /// Iteration budget for the metaheuristic.
    pub max_iter: usize,

    /// Iterations without improvement before the metaheuristic stops early.
    pub max_no_improve: usize,

    /// Per-route cost ceiling. Merges that would exceed it are skipped.
    pub max_cost: f64,

    /// Stop merging once this many routes remain.
    pub min_routes: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl CwsConfig {
    /// Creates the default configuration: a single deterministic pass with
    /// reversal enabled and no cost ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_biased(mut self, biased: bool) -> Self {
        self.biased = biased;
        self
    }

    pub fn with_bias(mut self, bias: BiasFunction) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_metaheuristic(mut self, metaheuristic: bool) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    pub fn with_start(mut self, start: Solution) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = max_cost;
        self
    }

    pub fn with_min_routes(mut self, n: usize) -> Self {
        self.min_routes = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let BiasFunction::QuasiGeometric { beta } = self.bias {
            // beta = 0 would put log(1 - beta) = 0 in a denominator
            if !(beta > 0.0 && beta < 1.0) {
                return Err(format!(
                    "quasi-geometric beta must be in (0, 1), got {beta}"
                ));
            }
        }
        if self.max_cost.is_nan() || self.max_cost <= 0.0 {
            return Err(format!("max_cost must be positive, got {}", self.max_cost));
        }
        if self.min_routes == 0 {
            return Err("min_routes must be at least 1".into());
        }
        Ok(())
    }
}

impl Default for CwsConfig {
    /// A plain single-pass run on an unconstrained instance, reversal
    /// enabled, with the usual metaheuristic budgets.
    fn default() -> Self {
        Self {
            biased: false,
            bias: BiasFunction::default(),
            reverse: true,
            metaheuristic: false,
            start: None,
            max_iter: 1000,
            max_no_improve: 500,
            max_cost: f64::INFINITY,
            min_routes: 1,
            seed: None,
        }
    }
}
