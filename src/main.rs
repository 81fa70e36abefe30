use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tpgraph::engines::{act_many, mutate_detailed};
use tpgraph::programs::LinearProgram;
use tpgraph::{ActionObject, Agent, ConfigManager, Graph, TeamId};

const NUM_INPUTS: usize = 3;

/// Three teams in a ring, each with two atomic learners and one pointer to
/// the next team.
fn build_ring(graph: &mut Graph<LinearProgram>, rng: &mut StdRng) -> Result<Vec<TeamId>> {
    let teams: Vec<TeamId> = (0..3).map(|_| graph.create_team(0)).collect();

    for (i, &team) in teams.iter().enumerate() {
        let next = teams[(i + 1) % teams.len()];
        let actions = [
            ActionObject::Atomic(2 * i as i64),
            ActionObject::Atomic(2 * i as i64 + 1),
            ActionObject::TeamPointer(next),
        ];
        for action in actions {
            let learner = graph.create_learner(LinearProgram::random(NUM_INPUTS, rng), action)?;
            graph.add_learner(team, learner)?;
        }
    }
    Ok(teams)
}

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tpgraph.toml".to_string());
    let manager = ConfigManager::new();
    manager
        .load_layered(&path)
        .with_context(|| format!("Failed to load configuration from {}", path))?;
    let config = manager.get();

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut graph = Graph::new();
    let teams = build_ring(&mut graph, &mut rng)?;
    let state = [0.3, -0.7, 1.2];

    let mut agent = Agent::new(teams[0], 0);
    let (action, trace) = agent.act_traced(&graph, &state, &mut rng)?;
    println!("Resolved action {} from {}", action, agent.root());
    println!("{}", serde_json::to_string_pretty(&trace)?);
    agent.reward(&mut graph, 1.0, "demo")?;

    let learner_pool = graph.learner_ids();
    let team_pool = graph.team_ids();
    for &team in &team_pool {
        let params = config.mutation.for_generation(1);
        let report = mutate_detailed(&mut graph, team, &params, &learner_pool, &team_pool, &mut rng)
            .with_context(|| format!("Mutation of {} failed", team))?;
        println!(
            "{}: {} round(s), -{} +{} ~{}",
            team,
            report.rounds,
            report.deleted.len(),
            report.added.len(),
            report.mutated.len()
        );
    }
    graph
        .check_consistency()
        .context("Graph invariants violated after mutation")?;

    for (team, result) in team_pool.iter().zip(act_many(&graph, &team_pool, &state, agent.context())) {
        match result {
            Ok(action) => println!("{} -> {}", team, action),
            Err(e) => println!("{} -> error: {}", team, e),
        }
    }

    Ok(())
}
