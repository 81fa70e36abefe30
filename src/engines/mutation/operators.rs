use crate::config::mutation::{check_open_probability, check_probability};
use crate::config::MutateParams;
use crate::error::{Result, TpgError};
use crate::graph::{ActionObject, Graph, Learner, Program};
use crate::types::{Action, LearnerId, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Attempts at producing a changed, non-duplicate clone before giving up
const MAX_MUTATION_ATTEMPTS: usize = 64;

/// Delete learners from `team`.
///
/// Each draw below the current probability removes one member chosen
/// uniformly among those that may go, and the probability decays
/// geometrically (`p`, `p²`, `p³`, ...). The team's last atomic member is never
/// eligible, and a single-member team is left alone.
pub fn mutation_delete<P: Program, R: Rng>(
    graph: &mut Graph<P>,
    team: TeamId,
    p_del: f64,
    rng: &mut R,
) -> Result<Vec<LearnerId>> {
    check_open_probability("p_lrn_del", p_del)?;
    if graph.num_atomic_actions(team)? == 0 {
        return Err(TpgError::NoAtomicAction(team));
    }

    let mut deleted = Vec::new();
    let mut probability = p_del;

    while rng.gen::<f64>() < probability {
        let members = graph.team(team)?.learners().to_vec();
        if members.len() < 2 {
            break;
        }

        let atomic = graph.num_atomic_actions(team)?;
        let mut eligible = Vec::with_capacity(members.len());
        for id in members {
            if !graph.learner(id)?.is_action_atomic() || atomic > 1 {
                eligible.push(id);
            }
        }

        let Some(&victim) = eligible.choose(rng) else {
            log::warn!("{}: no learner can be deleted without losing the last atomic action", team);
            break;
        };
        graph.remove_learner(team, victim)?;
        deleted.push(victim);
        probability *= p_del;
    }

    log::debug!("{}: deleted {} learner(s)", team, deleted.len());
    Ok(deleted)
}

/// Add learners from `learner_pool` to `team`.
///
/// Mirrors [`mutation_delete`]: each draw below the current probability adds
/// one learner chosen uniformly among the valid candidates, then the
/// probability decays geometrically. Members, learners whose program
/// duplicates a member's, and learners that point straight back at `team`
/// are not candidates. A non-zero `max_team_size` stops additions once the
/// team reaches that size.
pub fn mutation_add<P: Program, R: Rng>(
    graph: &mut Graph<P>,
    team: TeamId,
    p_add: f64,
    learner_pool: &[LearnerId],
    max_team_size: usize,
    rng: &mut R,
) -> Result<Vec<LearnerId>> {
    check_open_probability("p_lrn_add", p_add)?;
    graph.team(team)?;
    for &id in learner_pool {
        graph.learner(id)?;
    }

    let mut added = Vec::new();
    let mut probability = p_add;

    while rng.gen::<f64>() < probability {
        let members = graph.team(team)?.learners();
        if max_team_size > 0 && members.len() >= max_team_size {
            break;
        }

        let mut candidates = Vec::new();
        for &id in learner_pool {
            let learner = graph.learner(id)?;
            if !members.contains(&id)
                && learner.action() != ActionObject::TeamPointer(team)
                && !graph.program_in_use(members, learner.program(), None)
            {
                candidates.push(id);
            }
        }

        let Some(&candidate) = candidates.choose(rng) else {
            log::debug!("{}: no learner in the pool can be added", team);
            break;
        };
        graph.add_learner(team, candidate)?;
        added.push(candidate);
        probability *= p_add;
    }

    log::debug!("{}: added {} learner(s)", team, added.len());
    Ok(added)
}

/// Replace members of `team` with mutated clones.
///
/// Each member is picked with probability `p_mut`; its clone gets a new id,
/// a mutated program and/or a re-rolled action, and takes the member's place
/// in the ordering. The team's sole atomic member can only be re-rolled to
/// another atomic action. Returns the ids of the clones.
pub fn mutation_mutate<P: Program, R: Rng>(
    graph: &mut Graph<P>,
    team: TeamId,
    p_mut: f64,
    params: &MutateParams,
    team_pool: &[TeamId],
    rng: &mut R,
) -> Result<Vec<LearnerId>> {
    check_probability("p_lrn_mut", p_mut)?;
    for &id in team_pool {
        graph.team(id)?;
    }

    let members = graph.team(team)?.learners().to_vec();
    let mut mutated = Vec::new();

    for old in members {
        if rng.gen::<f64>() >= p_mut {
            continue;
        }

        let sole_atomic =
            graph.learner(old)?.is_action_atomic() && graph.num_atomic_actions(team)? == 1;

        match mutated_clone(graph, team, old, params, team_pool, sole_atomic, rng)? {
            Some(clone) => {
                let new_id = graph.substitute_learner(team, old, clone)?;
                log::trace!("{}: {} replaced by {}", team, old, new_id);
                mutated.push(new_id);
            }
            None => {
                log::warn!(
                    "{}: {} could not be changed after {} attempts, kept as is",
                    team,
                    old,
                    MAX_MUTATION_ATTEMPTS
                );
            }
        }
    }

    log::debug!("{}: mutated {} learner(s)", team, mutated.len());
    Ok(mutated)
}

/// Build a changed copy of `source_id` that would not clash with the other
/// members of `team`. `None` when no change could be found.
fn mutated_clone<P: Program, R: Rng>(
    graph: &Graph<P>,
    team: TeamId,
    source_id: LearnerId,
    params: &MutateParams,
    team_pool: &[TeamId],
    sole_atomic: bool,
    rng: &mut R,
) -> Result<Option<Learner<P>>> {
    let source = graph.learner(source_id)?;
    let members = graph.team(team)?.learners();
    let p_act_atom = if sole_atomic { 1.0 } else { params.p_act_atom };

    for _ in 0..MAX_MUTATION_ATTEMPTS {
        let mut program = None;
        let mut action = None;

        if rng.gen::<f64>() < params.p_prog_mut {
            let candidate = source.program().mutate(params, rng);
            if &candidate != source.program()
                && !graph.program_in_use(members, &candidate, Some(source_id))
            {
                program = Some(candidate);
            }
        }

        if rng.gen::<f64>() < params.p_act_mut {
            action = reroll_action(source.action(), team, params, p_act_atom, team_pool, rng);
        }

        if program.is_some() || action.is_some() {
            return Ok(Some(Learner::new(
                program.unwrap_or_else(|| source.program().clone()),
                action.unwrap_or_else(|| source.action()),
            )));
        }
    }

    Ok(None)
}

/// Draw a different action: atomic with probability `p_act_atom`, otherwise a
/// pointer to a pool team that is neither `team` nor the current target.
fn reroll_action<R: Rng>(
    current: ActionObject,
    team: TeamId,
    params: &MutateParams,
    p_act_atom: f64,
    team_pool: &[TeamId],
    rng: &mut R,
) -> Option<ActionObject> {
    if rng.gen::<f64>() < p_act_atom {
        let options: Vec<Action> = params
            .action_codes
            .iter()
            .copied()
            .filter(|&code| Some(code) != current.atomic())
            .collect();
        options.choose(rng).map(|&code| ActionObject::Atomic(code))
    } else {
        let options: Vec<TeamId> = team_pool
            .iter()
            .copied()
            .filter(|&target| target != team && Some(target) != current.team())
            .collect();
        options.choose(rng).map(|&target| ActionObject::TeamPointer(target))
    }
}
