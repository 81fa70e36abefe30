use crate::types::{LearnerId, TeamId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TpgError {
    #[error("Invalid probability for {name}: {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Attempted to add learner {learner} whose program already exists in team {team}")]
    DuplicateProgram { team: TeamId, learner: LearnerId },

    #[error("Less than one atomic action in team {0}")]
    NoAtomicAction(TeamId),

    #[error("No valid learner left to bid in team {0}")]
    NoValidLearner(TeamId),

    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("Unknown learner: {0}")]
    UnknownLearner(LearnerId),

    #[error("Team {0} is already in the graph")]
    DuplicateTeamId(TeamId),

    #[error("Learner {0} is already in the graph")]
    DuplicateLearnerId(LearnerId),

    #[error("Learner {learner} is still referenced by {teams} team(s)")]
    LearnerInUse { learner: LearnerId, teams: usize },

    #[error("Team {team} is still pointed to by {learners} learner(s)")]
    TeamInUse { team: TeamId, learners: usize },

    #[error("Inconsistent graph: {0}")]
    Inconsistent(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TpgError>;
