use super::arena::Graph;
use super::learner::Learner;
use super::program::Program;
use crate::error::{Result, TpgError};
use crate::types::{LearnerId, TeamId};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TEAM_ID: AtomicU64 = AtomicU64::new(0);

/// A committee of learners bidding for control of one decision.
///
/// Member order is insertion order and doubles as the tie-break order during
/// action resolution.
#[derive(Debug, Clone)]
pub struct Team {
    id: TeamId,
    gen_create: usize,
    pub(crate) learners: Vec<LearnerId>,
    pub(crate) in_learners: BTreeSet<LearnerId>,
    outcomes: HashMap<String, f64>,
    fitness: Option<f64>,
}

impl Team {
    pub fn new(generation: usize) -> Self {
        Self {
            id: TeamId(NEXT_TEAM_ID.fetch_add(1, Ordering::Relaxed)),
            gen_create: generation,
            learners: Vec::new(),
            in_learners: BTreeSet::new(),
            outcomes: HashMap::new(),
            fitness: None,
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn gen_create(&self) -> usize {
        self.gen_create
    }

    pub fn learners(&self) -> &[LearnerId] {
        &self.learners
    }

    pub fn len(&self) -> usize {
        self.learners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.learners.is_empty()
    }

    pub fn contains(&self, learner: LearnerId) -> bool {
        self.learners.contains(&learner)
    }

    pub fn in_learners(&self) -> &BTreeSet<LearnerId> {
        &self.in_learners
    }

    pub fn num_learners_referencing(&self) -> usize {
        self.in_learners.len()
    }

    /// Fitness memo keyed by task name
    pub fn outcomes(&self) -> &HashMap<String, f64> {
        &self.outcomes
    }

    pub fn outcome(&self, task: &str) -> Option<f64> {
        self.outcomes.get(task).copied()
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }
}

impl<P: Program> Graph<P> {
    /// Append `learner` to `team`, rejecting structural program duplicates.
    pub fn add_learner(&mut self, team: TeamId, learner: LearnerId) -> Result<()> {
        let candidate = self.learner(learner)?;
        let members = &self.team(team)?.learners;

        if members.contains(&learner) || self.program_in_use(members, candidate.program(), None) {
            return Err(TpgError::DuplicateProgram { team, learner });
        }

        self.teams
            .get_mut(&team)
            .ok_or(TpgError::UnknownTeam(team))?
            .learners
            .push(learner);
        self.learners
            .get_mut(&learner)
            .ok_or(TpgError::UnknownLearner(learner))?
            .in_teams
            .insert(team);
        Ok(())
    }

    /// Remove `learner` from `team`. Returns `false` when it was not a member.
    pub fn remove_learner(&mut self, team: TeamId, learner: LearnerId) -> Result<bool> {
        let members = &mut self
            .teams
            .get_mut(&team)
            .ok_or(TpgError::UnknownTeam(team))?
            .learners;

        let Some(position) = members.iter().position(|&id| id == learner) else {
            return Ok(false);
        };
        members.remove(position);

        if let Some(former) = self.learners.get_mut(&learner) {
            former.in_teams.remove(&team);
        }
        Ok(true)
    }

    /// Drain every member of `team`. The learners themselves stay in the arena.
    pub fn remove_learners(&mut self, team: TeamId) -> Result<Vec<LearnerId>> {
        let drained = std::mem::take(
            &mut self
                .teams
                .get_mut(&team)
                .ok_or(TpgError::UnknownTeam(team))?
                .learners,
        );

        for id in &drained {
            if let Some(former) = self.learners.get_mut(id) {
                former.in_teams.remove(&team);
            }
        }
        Ok(drained)
    }

    /// Number of members whose action is atomic
    pub fn num_atomic_actions(&self, team: TeamId) -> Result<usize> {
        let team = self.team(team)?;
        Ok(team
            .learners
            .iter()
            .filter_map(|id| self.learners.get(id))
            .filter(|learner| learner.is_action_atomic())
            .count())
    }

    /// Swap `old` for a brand new learner at the same position in `team`.
    ///
    /// The replacement is checked against every member except `old` before
    /// anything changes; on success it is inserted into the arena.
    pub fn substitute_learner(
        &mut self,
        team: TeamId,
        old: LearnerId,
        replacement: Learner<P>,
    ) -> Result<LearnerId> {
        let new_id = replacement.id();
        let members = &self.team(team)?.learners;
        let position = members
            .iter()
            .position(|&id| id == old)
            .ok_or(TpgError::UnknownLearner(old))?;

        if self.program_in_use(members, replacement.program(), Some(old)) {
            return Err(TpgError::DuplicateProgram { team, learner: new_id });
        }

        self.insert_learner(replacement)?;

        if let Some(entry) = self.teams.get_mut(&team) {
            entry.learners[position] = new_id;
        }
        if let Some(former) = self.learners.get_mut(&old) {
            former.in_teams.remove(&team);
        }
        if let Some(fresh) = self.learners.get_mut(&new_id) {
            fresh.in_teams.insert(team);
        }
        Ok(new_id)
    }

    /// Store a score for `task` in the team's fitness memo
    pub fn record_outcome(&mut self, team: TeamId, task: &str, score: f64) -> Result<()> {
        self.team_mut(team)?.outcomes.insert(task.to_string(), score);
        Ok(())
    }

    pub fn set_fitness(&mut self, team: TeamId, fitness: Option<f64>) -> Result<()> {
        self.team_mut(team)?.fitness = fitness;
        Ok(())
    }

    /// True when a member other than `skip` owns a program equal to `program`
    pub(crate) fn program_in_use(
        &self,
        members: &[LearnerId],
        program: &P,
        skip: Option<LearnerId>,
    ) -> bool {
        members
            .iter()
            .filter(|&&id| Some(id) != skip)
            .filter_map(|id| self.learners.get(id))
            .any(|member| member.program() == program)
    }
}
