//! Team/learner data model.
//!
//! All entities live in a [`Graph`] arena and refer to each other by id.
//! Every operation that changes membership or a learner's action is a method
//! on the arena, which updates both sides of the affected back-reference
//! (`Learner::in_teams`, `Team::in_learners`) in the same call.

pub mod action;
pub mod arena;
pub mod learner;
pub mod program;
pub mod team;

pub use action::ActionObject;
pub use arena::Graph;
pub use learner::Learner;
pub use program::Program;
pub use team::Team;
