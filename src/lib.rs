//! tpgraph - Tangled Program Graph core
//!
//! Policies are graphs of teams. Each team is a committee of learners that
//! bid on the current state; the winner either emits an atomic action or
//! delegates to another team.
//!
//! # Architecture
//!
//! ```text
//! graph     arena of teams and learners, back-reference bookkeeping
//! engines   traversal (state -> action) and mutation (team evolution)
//! config    mutation parameters, TOML / environment loading
//! agent     root-team facade: act, reward, task_done
//! programs  reference program implementations
//! ```
//!
//! Population management, selection and persistence live outside this crate.

pub mod agent;
pub mod config;
pub mod engines;
pub mod error;
pub mod graph;
pub mod programs;
pub mod types;

pub use agent::Agent;
pub use config::{AppConfig, ConfigManager, MutateParams};
pub use error::{Result, TpgError};
pub use graph::{ActionObject, Graph, Learner, Program, Team};
pub use types::{Action, EvalContext, LearnerId, NodeId, PathTrace, TeamId, TraceStep};
