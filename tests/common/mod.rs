#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use tpgraph::programs::LinearProgram;
use tpgraph::{ActionObject, Graph, LearnerId, TeamId};

static NEXT_WEIGHT: AtomicU64 = AtomicU64::new(1);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Program no other dummy program is equal to
pub fn create_dummy_program() -> LinearProgram {
    let weight = NEXT_WEIGHT.fetch_add(1, Ordering::Relaxed) as f64;
    LinearProgram::new(vec![weight], 0.0)
}

pub fn create_dummy_learner(graph: &mut Graph<LinearProgram>, action: ActionObject) -> LearnerId {
    graph
        .create_learner(create_dummy_program(), action)
        .expect("dummy learner should insert")
}

/// Learner that always bids `bid`, whatever the state. Its all-zero weight
/// vector has a unique length, so equal bids never mean equal programs.
pub fn create_bidding_learner(
    graph: &mut Graph<LinearProgram>,
    bid: f64,
    action: ActionObject,
) -> LearnerId {
    let len = NEXT_WEIGHT.fetch_add(1, Ordering::Relaxed) as usize;
    graph
        .create_learner(LinearProgram::new(vec![0.0; len], bid), action)
        .expect("bidding learner should insert")
}

/// Team of `num_learners` atomic learners with distinct programs
pub fn create_dummy_team(
    graph: &mut Graph<LinearProgram>,
    num_learners: usize,
) -> (TeamId, Vec<LearnerId>) {
    let team = graph.create_team(0);
    let learners: Vec<LearnerId> = (0..num_learners)
        .map(|i| {
            let learner = create_dummy_learner(graph, ActionObject::Atomic((i % 4) as i64));
            graph.add_learner(team, learner).expect("distinct programs");
            learner
        })
        .collect();
    (team, learners)
}
