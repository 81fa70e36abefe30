use super::operators::{mutation_add, mutation_delete, mutation_mutate};
use crate::config::{ConfigSection, MutateParams};
use crate::error::{Result, TpgError};
use crate::graph::{Graph, Program};
use crate::types::{LearnerId, TeamId};
use rand::Rng;
use serde::Serialize;

/// What one call to [`mutate_detailed`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MutationReport {
    pub rounds: usize,
    pub deleted: Vec<LearnerId>,
    pub added: Vec<LearnerId>,
    pub mutated: Vec<LearnerId>,
}

/// Number of delete/add/mutate rounds for this generation.
///
/// Rampant generations (every `rampant_gen`-th) draw uniformly from
/// `[rampant_min, rampant_max]`; all others run a single round.
pub fn rampant_rounds<R: Rng>(params: &MutateParams, rng: &mut R) -> usize {
    if params.rampant_gen == 0 || params.generation % params.rampant_gen != 0 {
        return 1;
    }
    let low = params.rampant_min.max(1);
    let high = params.rampant_max.max(low);
    rng.gen_range(low..=high)
}

/// One evolutionary step of `team`. Returns the number of rounds executed.
pub fn mutate<P: Program, R: Rng>(
    graph: &mut Graph<P>,
    team: TeamId,
    params: &MutateParams,
    learner_pool: &[LearnerId],
    team_pool: &[TeamId],
    rng: &mut R,
) -> Result<usize> {
    mutate_detailed(graph, team, params, learner_pool, team_pool, rng).map(|report| report.rounds)
}

/// Like [`mutate`], but reports every learner deleted, added and created.
pub fn mutate_detailed<P: Program, R: Rng>(
    graph: &mut Graph<P>,
    team: TeamId,
    params: &MutateParams,
    learner_pool: &[LearnerId],
    team_pool: &[TeamId],
    rng: &mut R,
) -> Result<MutationReport> {
    params.validate()?;
    if graph.num_atomic_actions(team)? == 0 {
        return Err(TpgError::NoAtomicAction(team));
    }
    for &id in learner_pool {
        graph.learner(id)?;
    }
    for &id in team_pool {
        graph.team(id)?;
    }

    let rounds = rampant_rounds(params, rng);
    let mut report = MutationReport {
        rounds,
        ..MutationReport::default()
    };

    for round in 0..rounds {
        let deleted = mutation_delete(graph, team, params.p_lrn_del, rng)?;
        let added = mutation_add(
            graph,
            team,
            params.p_lrn_add,
            learner_pool,
            params.max_team_size,
            rng,
        )?;
        let mutated = mutation_mutate(graph, team, params.p_lrn_mut, params, team_pool, rng)?;

        log::debug!(
            "{} gen {} round {}/{}: -{} +{} ~{}",
            team,
            params.generation,
            round + 1,
            rounds,
            deleted.len(),
            added.len(),
            mutated.len()
        );

        report.deleted.extend(deleted);
        report.added.extend(added);
        report.mutated.extend(mutated);
    }

    Ok(report)
}
