use super::action::ActionObject;
use super::arena::Graph;
use super::program::Program;
use crate::error::{Result, TpgError};
use crate::types::{LearnerId, TeamId};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LEARNER_ID: AtomicU64 = AtomicU64::new(0);

/// A program paired with the action it takes when it wins.
///
/// `in_teams` is owned by the arena: it always equals the set of teams whose
/// member list contains this learner.
#[derive(Debug, Clone)]
pub struct Learner<P> {
    id: LearnerId,
    program: P,
    action: ActionObject,
    pub(crate) in_teams: BTreeSet<TeamId>,
}

impl<P: Program> Learner<P> {
    pub fn new(program: P, action: ActionObject) -> Self {
        Self {
            id: LearnerId(NEXT_LEARNER_ID.fetch_add(1, Ordering::Relaxed)),
            program,
            action,
            in_teams: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> LearnerId {
        self.id
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    pub fn action(&self) -> ActionObject {
        self.action
    }

    pub fn is_action_atomic(&self) -> bool {
        self.action.is_atomic()
    }

    pub fn in_teams(&self) -> &BTreeSet<TeamId> {
        &self.in_teams
    }

    pub fn num_teams_referencing(&self) -> usize {
        self.in_teams.len()
    }

    pub(crate) fn replace_action(&mut self, action: ActionObject) -> ActionObject {
        std::mem::replace(&mut self.action, action)
    }
}

impl<P: Program> Graph<P> {
    /// Point a learner at a new action, keeping `in_learners` of the old and
    /// new target teams exact. Returns the previous action.
    pub fn set_action(&mut self, learner: LearnerId, action: ActionObject) -> Result<ActionObject> {
        if let ActionObject::TeamPointer(target) = action {
            if !self.teams.contains_key(&target) {
                return Err(TpgError::UnknownTeam(target));
            }
        }

        let previous = self
            .learners
            .get_mut(&learner)
            .ok_or(TpgError::UnknownLearner(learner))?
            .replace_action(action);

        if let ActionObject::TeamPointer(old_target) = previous {
            if let Some(team) = self.teams.get_mut(&old_target) {
                team.in_learners.remove(&learner);
            }
        }
        if let ActionObject::TeamPointer(new_target) = action {
            if let Some(team) = self.teams.get_mut(&new_target) {
                team.in_learners.insert(learner);
            }
        }

        Ok(previous)
    }
}
