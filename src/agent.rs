use crate::engines::traversal;
use crate::error::Result;
use crate::graph::{Graph, Program};
use crate::types::{Action, EvalContext, NodeId, PathTrace, TeamId};
use rand::Rng;
use std::collections::HashSet;

/// Convenience wrapper around a root team
#[derive(Debug, Clone)]
pub struct Agent {
    root: TeamId,
    agent_num: usize,
    ctx: EvalContext,
}

impl Agent {
    pub fn new(root: TeamId, agent_num: usize) -> Self {
        Self::with_context(root, agent_num, EvalContext::default())
    }

    pub fn with_context(root: TeamId, agent_num: usize, ctx: EvalContext) -> Self {
        Self {
            root,
            agent_num,
            ctx,
        }
    }

    pub fn root(&self) -> TeamId {
        self.root
    }

    pub fn agent_num(&self) -> usize {
        self.agent_num
    }

    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Resolve an action for `state` from the root team
    pub fn act<P: Program, R: Rng>(
        &mut self,
        graph: &Graph<P>,
        state: &[f64],
        rng: &mut R,
    ) -> Result<Action> {
        self.ctx.frame_num = rng.gen();
        let mut visited: HashSet<NodeId> = HashSet::new();
        traversal::act(graph, self.root, state, &mut visited, &self.ctx, None)
    }

    /// Resolve an action and report the path taken
    pub fn act_traced<P: Program, R: Rng>(
        &mut self,
        graph: &Graph<P>,
        state: &[f64],
        rng: &mut R,
    ) -> Result<(Action, PathTrace)> {
        self.ctx.frame_num = rng.gen();
        let (action, trace) = traversal::act_traced(graph, self.root, state, &self.ctx)?;
        log::info!(
            "agent {} ({}): action {} via {} hop(s) in {:.6}s",
            self.agent_num,
            self.root,
            action,
            trace.depth,
            trace.execution_time_secs
        );
        Ok((action, trace))
    }

    /// Record the score the root team earned on `task`
    pub fn reward<P: Program>(&self, graph: &mut Graph<P>, score: f64, task: &str) -> Result<()> {
        graph.record_outcome(self.root, task, score)
    }

    /// Whether the root team already has an outcome for `task`
    pub fn task_done<P: Program>(&self, graph: &Graph<P>, task: &str) -> Result<bool> {
        Ok(graph.team(self.root)?.outcomes().contains_key(task))
    }
}
