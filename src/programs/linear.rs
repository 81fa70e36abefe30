use crate::config::MutateParams;
use crate::graph::Program;
use crate::types::EvalContext;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(0);

/// Bids `bias + Σ weights[i] * state[i]`.
///
/// A minimal stand-in for a real instruction set: enough to drive demos and
/// tests. Extra state entries (or extra weights) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearProgram {
    id: u64,
    weights: Vec<f64>,
    bias: f64,
}

impl LinearProgram {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            id: NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed),
            weights,
            bias,
        }
    }

    /// A program that ignores the state and always bids `bias`
    pub fn constant(bias: f64) -> Self {
        Self::new(Vec::new(), bias)
    }

    pub fn random<R: Rng + ?Sized>(num_inputs: usize, rng: &mut R) -> Self {
        let weights = (0..num_inputs).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Self::new(weights, rng.gen_range(-1.0..1.0))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

// Identity is not part of equality: two programs with the same content are
// the same program.
impl PartialEq for LinearProgram {
    fn eq(&self, other: &Self) -> bool {
        self.bias == other.bias && self.weights == other.weights
    }
}

impl Program for LinearProgram {
    fn bid(&self, state: &[f64], _ctx: &EvalContext) -> f64 {
        self.weights
            .iter()
            .zip(state)
            .fold(self.bias, |acc, (w, s)| acc + w * s)
    }

    /// Nudge one coefficient (a weight or the bias) by up to `program_step`
    fn mutate<R: Rng + ?Sized>(&self, params: &MutateParams, rng: &mut R) -> Self {
        let mut weights = self.weights.clone();
        let mut bias = self.bias;
        let step = if params.program_step > 0.0 {
            params.program_step
        } else {
            f64::EPSILON
        };

        let delta = loop {
            let d = rng.gen_range(-step..=step);
            if d != 0.0 {
                break d;
            }
        };

        let slot = rng.gen_range(0..=weights.len());
        match weights.get_mut(slot) {
            Some(w) => *w += delta,
            None => bias += delta,
        }
        Self::new(weights, bias)
    }
}
