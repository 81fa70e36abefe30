//! Action resolution over a team graph.
//!
//! Starting from a root team, every eligible member bids on the state; the
//! highest bidder either yields an atomic action or hands control to the team
//! it points to. A caller-owned visited set spans the whole walk, so cycles in
//! the graph cannot be re-entered.

use crate::error::{Result, TpgError};
use crate::graph::{ActionObject, Graph, Program};
use crate::types::{Action, EvalContext, LearnerId, NodeId, PathTrace, TeamId, TraceStep};
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;

/// Resolve `state` to an atomic action starting at `root`.
///
/// `visited` is marked in place with every team entered and every learner
/// that won a bid. When `path` is given, each delegation hop is appended.
pub fn act<P: Program>(
    graph: &Graph<P>,
    root: TeamId,
    state: &[f64],
    visited: &mut HashSet<NodeId>,
    ctx: &EvalContext,
    mut path: Option<&mut Vec<TraceStep>>,
) -> Result<Action> {
    let mut current = root;

    loop {
        visited.insert(NodeId::Team(current));
        let (winner, bid) = top_bidder(graph, current, state, visited, ctx)?;
        visited.insert(NodeId::Learner(winner));

        match graph.learner(winner)?.action() {
            ActionObject::Atomic(action) => {
                log::trace!("{} resolved by {} (bid {:.4}) -> {}", current, winner, bid, action);
                return Ok(action);
            }
            ActionObject::TeamPointer(next) => {
                log::trace!("{} delegated by {} (bid {:.4}) -> {}", current, winner, bid, next);
                if let Some(path) = path.as_deref_mut() {
                    path.push(TraceStep {
                        team_id: current,
                        learner_id: winner,
                        bid,
                    });
                }
                current = next;
            }
        }
    }
}

/// Resolve from a fresh visited set and report the walk.
pub fn act_traced<P: Program>(
    graph: &Graph<P>,
    root: TeamId,
    state: &[f64],
    ctx: &EvalContext,
) -> Result<(Action, PathTrace)> {
    let start = Instant::now();
    let mut visited = HashSet::new();
    let mut path = Vec::new();

    let action = act(graph, root, state, &mut visited, ctx, Some(&mut path))?;

    let trace = PathTrace {
        execution_time_secs: start.elapsed().as_secs_f64(),
        root_team_id: root,
        final_action: action,
        depth: path.len(),
        path,
        recorded_at: chrono::Utc::now().to_rfc3339(),
    };
    Ok((action, trace))
}

/// Resolve the same state from many roots in parallel.
///
/// Each root gets its own visited set and context copy; the graph is shared
/// read-only.
pub fn act_many<P: Program + Sync>(
    graph: &Graph<P>,
    roots: &[TeamId],
    state: &[f64],
    ctx: &EvalContext,
) -> Vec<Result<Action>> {
    roots
        .par_iter()
        .map(|&root| {
            let mut visited = HashSet::new();
            let ctx = ctx.clone();
            act(graph, root, state, &mut visited, &ctx, None)
        })
        .collect()
}

/// Highest bid among members not yet visited and not pointing back into a
/// visited team. Ties go to the earliest member; NaN never beats a number
/// but is reported as returned.
fn top_bidder<P: Program>(
    graph: &Graph<P>,
    team: TeamId,
    state: &[f64],
    visited: &HashSet<NodeId>,
    ctx: &EvalContext,
) -> Result<(LearnerId, f64)> {
    // (winner, bid as returned, bid used for ranking)
    let mut best: Option<(LearnerId, f64, f64)> = None;

    for &id in graph.team(team)?.learners() {
        if visited.contains(&NodeId::Learner(id)) {
            continue;
        }
        let learner = graph.learner(id)?;
        if let ActionObject::TeamPointer(target) = learner.action() {
            if visited.contains(&NodeId::Team(target)) {
                continue;
            }
        }

        let bid = learner.program().bid(state, ctx);
        let rank = if bid.is_nan() { f64::NEG_INFINITY } else { bid };
        match best {
            Some((_, _, top)) if rank <= top => {}
            _ => best = Some((id, bid, rank)),
        }
    }

    best.map(|(id, bid, _)| (id, bid))
        .ok_or(TpgError::NoValidLearner(team))
}
