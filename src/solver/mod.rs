//! The Clarke-Wright savings solver and its supporting pieces.
//!
//! - [`CwsConfig`] — run configuration with builder-style overrides
//! - [`BiasedSelector`] — quasi-geometric biased permutation generator
//! - [`SavingsSolver`] — the merge heuristic and the iterated local search

mod biased;
mod config;
mod engine;

pub use biased::BiasedSelector;
pub use config::{BiasFunction, CwsConfig};
pub use engine::{SavingsSolver, SolverError};
