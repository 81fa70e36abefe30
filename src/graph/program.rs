use crate::config::MutateParams;
use crate::types::EvalContext;
use rand::Rng;
use std::fmt::Debug;

/// Bidding capability owned by a learner.
///
/// Programs are immutable: `mutate` returns a fresh program and leaves
/// `self` untouched. Equality must be structural, so two programs with the
/// same content compare equal regardless of any identity they carry.
pub trait Program: Clone + PartialEq + Debug {
    /// Bid for control of the decision given the current state
    fn bid(&self, state: &[f64], ctx: &EvalContext) -> f64;

    /// Produce a mutated copy of this program
    fn mutate<R: Rng + ?Sized>(&self, params: &MutateParams, rng: &mut R) -> Self;
}
