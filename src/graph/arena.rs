use super::action::ActionObject;
use super::learner::Learner;
use super::program::Program;
use super::team::Team;
use crate::error::{Result, TpgError};
use crate::types::{LearnerId, TeamId};
use std::collections::{BTreeMap, BTreeSet};

/// Owns every team and learner of a population, addressed by id.
///
/// Team pointers are plain ids resolved through the arena, so cycles between
/// teams are representable without shared ownership. The arena never drops
/// an entry on its own: `discard_learner` / `discard_team` are the population
/// manager's tools and refuse while back-references remain.
#[derive(Debug, Clone)]
pub struct Graph<P> {
    pub(crate) teams: BTreeMap<TeamId, Team>,
    pub(crate) learners: BTreeMap<LearnerId, Learner<P>>,
}

impl<P: Program> Default for Graph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Program> Graph<P> {
    pub fn new() -> Self {
        Self {
            teams: BTreeMap::new(),
            learners: BTreeMap::new(),
        }
    }

    /// Move a team with no members and no incoming pointers into the arena.
    pub fn insert_team(&mut self, team: Team) -> Result<TeamId> {
        let id = team.id();
        if self.teams.contains_key(&id) {
            return Err(TpgError::DuplicateTeamId(id));
        }
        if !team.learners.is_empty() || !team.in_learners.is_empty() {
            return Err(TpgError::Inconsistent(format!(
                "{} arrives with {} member(s) and {} incoming pointer(s)",
                id,
                team.learners.len(),
                team.in_learners.len()
            )));
        }
        self.teams.insert(id, team);
        Ok(id)
    }

    /// Create an empty team stamped with `generation`
    pub fn create_team(&mut self, generation: usize) -> TeamId {
        let team = Team::new(generation);
        let id = team.id();
        self.teams.insert(id, team);
        id
    }

    /// Move a learner into the arena, registering its team pointer (if any)
    /// with the target team's `in_learners`. The learner must be new to the
    /// arena and belong to no team yet.
    pub fn insert_learner(&mut self, learner: Learner<P>) -> Result<LearnerId> {
        let id = learner.id();
        if self.learners.contains_key(&id) {
            return Err(TpgError::DuplicateLearnerId(id));
        }
        if !learner.in_teams.is_empty() {
            return Err(TpgError::Inconsistent(format!(
                "{} arrives already listed in {} team(s)",
                id,
                learner.in_teams.len()
            )));
        }
        if let ActionObject::TeamPointer(target) = learner.action() {
            self.teams
                .get_mut(&target)
                .ok_or(TpgError::UnknownTeam(target))?
                .in_learners
                .insert(id);
        }
        self.learners.insert(id, learner);
        Ok(id)
    }

    /// Build and insert a learner in one step
    pub fn create_learner(&mut self, program: P, action: ActionObject) -> Result<LearnerId> {
        self.insert_learner(Learner::new(program, action))
    }

    pub fn team(&self, id: TeamId) -> Result<&Team> {
        self.teams.get(&id).ok_or(TpgError::UnknownTeam(id))
    }

    pub(crate) fn team_mut(&mut self, id: TeamId) -> Result<&mut Team> {
        self.teams.get_mut(&id).ok_or(TpgError::UnknownTeam(id))
    }

    pub fn learner(&self, id: LearnerId) -> Result<&Learner<P>> {
        self.learners.get(&id).ok_or(TpgError::UnknownLearner(id))
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn learners(&self) -> impl Iterator<Item = &Learner<P>> {
        self.learners.values()
    }

    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.keys().copied().collect()
    }

    pub fn learner_ids(&self) -> Vec<LearnerId> {
        self.learners.keys().copied().collect()
    }

    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn num_learners(&self) -> usize {
        self.learners.len()
    }

    /// Drop a learner that no team references any more
    pub fn discard_learner(&mut self, id: LearnerId) -> Result<Learner<P>> {
        let learner = self.learner(id)?;
        if !learner.in_teams.is_empty() {
            return Err(TpgError::LearnerInUse {
                learner: id,
                teams: learner.in_teams.len(),
            });
        }

        let learner = self.learners.remove(&id).ok_or(TpgError::UnknownLearner(id))?;
        if let ActionObject::TeamPointer(target) = learner.action() {
            if let Some(team) = self.teams.get_mut(&target) {
                team.in_learners.remove(&id);
            }
        }
        Ok(learner)
    }

    /// Drop a team no learner points to. Its members are released first so
    /// their `in_teams` stay exact.
    pub fn discard_team(&mut self, id: TeamId) -> Result<Team> {
        let team = self.team(id)?;
        if !team.in_learners.is_empty() {
            return Err(TpgError::TeamInUse {
                team: id,
                learners: team.in_learners.len(),
            });
        }

        self.remove_learners(id)?;
        self.teams.remove(&id).ok_or(TpgError::UnknownTeam(id))
    }

    /// Verify every back-reference and structural invariant in the arena.
    pub fn check_consistency(&self) -> Result<()> {
        for (team_id, team) in &self.teams {
            let mut seen = BTreeSet::new();
            for learner_id in &team.learners {
                let learner = self.learner(*learner_id)?;
                if !learner.in_teams.contains(team_id) {
                    return Err(TpgError::Inconsistent(format!(
                        "{} is a member of {} but does not list it in in_teams",
                        learner_id, team_id
                    )));
                }
                if !seen.insert(*learner_id) {
                    return Err(TpgError::Inconsistent(format!(
                        "{} appears twice in {}",
                        learner_id, team_id
                    )));
                }
            }

            for (i, a) in team.learners.iter().enumerate() {
                for b in &team.learners[i + 1..] {
                    if self.learner(*a)?.program() == self.learner(*b)?.program() {
                        return Err(TpgError::Inconsistent(format!(
                            "{} and {} share a program in {}",
                            a, b, team_id
                        )));
                    }
                }
            }

            for learner_id in &team.in_learners {
                let points_here = self
                    .learners
                    .get(learner_id)
                    .map(|l| l.action() == ActionObject::TeamPointer(*team_id))
                    .unwrap_or(false);
                if !points_here {
                    return Err(TpgError::Inconsistent(format!(
                        "{} lists {} in in_learners but it does not point there",
                        team_id, learner_id
                    )));
                }
            }
        }

        for (learner_id, learner) in &self.learners {
            for team_id in &learner.in_teams {
                let member = self
                    .teams
                    .get(team_id)
                    .map(|t| t.learners.contains(learner_id))
                    .unwrap_or(false);
                if !member {
                    return Err(TpgError::Inconsistent(format!(
                        "{} lists {} in in_teams but is not a member",
                        learner_id, team_id
                    )));
                }
            }

            if let ActionObject::TeamPointer(target) = learner.action() {
                let registered = self
                    .teams
                    .get(&target)
                    .map(|t| t.in_learners.contains(learner_id))
                    .unwrap_or(false);
                if !registered {
                    return Err(TpgError::Inconsistent(format!(
                        "{} points to {} but is missing from its in_learners",
                        learner_id, target
                    )));
                }
            }
        }

        Ok(())
    }
}
