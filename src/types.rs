use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Concrete, final action emitted by a learner
pub type Action = i64;

/// Team identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u64);

/// Learner identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LearnerId(pub u64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Entry of the visited set shared across one action resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Team(TeamId),
    Learner(LearnerId),
}

/// Auxiliary per-call data handed to every bid evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalContext {
    pub frame_num: f64,
    pub vars: HashMap<String, f64>,
}

/// One delegation hop recorded during a traced resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub team_id: TeamId,
    pub learner_id: LearnerId,
    pub bid: f64,
}

/// Observational report of a traced resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathTrace {
    pub execution_time_secs: f64,
    pub root_team_id: TeamId,
    pub final_action: Action,
    pub path: Vec<TraceStep>,
    pub depth: usize,
    pub recorded_at: String,
}
