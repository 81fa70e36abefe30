//! Team evolution operators.
//!
//! Every probabilistic decision draws from the caller's `Rng`, so a seeded
//! generator reproduces a run exactly. Operators validate their inputs before
//! touching the graph.

pub mod operators;
pub mod rampant;

pub use operators::{mutation_add, mutation_delete, mutation_mutate};
pub use rampant::{mutate, mutate_detailed, rampant_rounds, MutationReport};
