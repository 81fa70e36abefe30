mod common;

use common::{create_dummy_learner, create_dummy_team, init_logging};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tpgraph::engines::{mutation_add, mutation_delete, mutation_mutate};
use tpgraph::programs::LinearProgram;
use tpgraph::{ActionObject, Graph, LearnerId, MutateParams, TeamId, TpgError};

/// Probabilities at which the operators are sampled
const PROBABILITIES: [f64; 7] = [0.1, 0.25, 0.5, 0.66, 0.75, 0.82, 0.9];

/// Acceptable absolute error on an observed frequency
const CONFIDENCE_INTERVAL: f64 = 0.05;

/// Samples for a 99% confidence level with a margin of half the interval,
/// worst case p = 0.5: n = 0.25 * (z / margin)^2
fn compute_sample_size() -> usize {
    let z = 2.576;
    let margin_of_error = CONFIDENCE_INTERVAL / 2.0;
    (0.25 * (z / margin_of_error).powi(2)).ceil() as usize
}

/// Team whose members all point at another team
fn no_atomic_team(graph: &mut Graph<LinearProgram>, num_learners: usize) -> TeamId {
    let (team, learners) = create_dummy_team(graph, num_learners);
    let (target, _) = create_dummy_team(graph, 1);
    for learner in learners {
        graph
            .set_action(learner, ActionObject::TeamPointer(target))
            .unwrap();
    }
    team
}

#[test]
fn test_mutation_delete_rejects_bad_input() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(1);
    let mut graph = Graph::new();
    let (team, learners) = create_dummy_team(&mut graph, 30);

    for p in [1.0, 1.1, -0.2] {
        assert!(matches!(
            mutation_delete(&mut graph, team, p, &mut rng),
            Err(TpgError::InvalidProbability { .. })
        ));
        assert_eq!(graph.team(team).unwrap().learners(), learners.as_slice());
    }

    let empty_handed = no_atomic_team(&mut graph, 30);
    let before = graph.team(empty_handed).unwrap().learners().to_vec();
    match mutation_delete(&mut graph, empty_handed, 0.99, &mut rng) {
        Err(TpgError::NoAtomicAction(problem)) => assert_eq!(problem, empty_handed),
        other => panic!("expected NoAtomicAction, got {:?}", other),
    }
    assert_eq!(graph.team(empty_handed).unwrap().learners(), before.as_slice());
}

#[test]
fn test_mutation_delete_frequencies() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut template = Graph::new();
    let (team, _) = create_dummy_team(&mut template, 100);
    let samples = compute_sample_size();

    println!("Need {} samples per probability", samples);

    for p in PROBABILITIES {
        let mut frequency: HashMap<usize, usize> = HashMap::new();

        for _ in 0..samples {
            let mut graph = template.clone();
            let before = graph.team(team).unwrap().len();

            let deleted = mutation_delete(&mut graph, team, p, &mut rng).unwrap();

            let removed = before - graph.team(team).unwrap().len();
            assert_eq!(removed, deleted.len());
            for id in &deleted {
                assert!(!graph.team(team).unwrap().contains(*id));
                assert!(!graph.learner(*id).unwrap().in_teams().contains(&team));
            }
            assert!(graph.num_atomic_actions(team).unwrap() >= 1);
            *frequency.entry(removed).or_insert(0) += 1;
        }

        let zero = *frequency.get(&0).unwrap_or(&0) as f64 / samples as f64;
        println!("p = {}: zero deletions {:.4} (expected {:.4}) {:?}", p, zero, 1.0 - p, frequency);
        assert!(
            (zero - (1.0 - p)).abs() <= CONFIDENCE_INTERVAL,
            "p = {}: observed {:.4}, expected {:.4}",
            p,
            zero,
            1.0 - p
        );

        // At least one deletion happens with probability p
        let some = 1.0 - zero;
        assert!((some - p).abs() <= CONFIDENCE_INTERVAL);
    }
}

#[test]
fn test_mutation_delete_keeps_sole_atomic() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut template = Graph::new();
    let (team, learners) = create_dummy_team(&mut template, 1);
    let sole_atomic = learners[0];
    let (elsewhere, _) = create_dummy_team(&mut template, 1);
    for _ in 0..40 {
        let pointer = create_dummy_learner(&mut template, ActionObject::TeamPointer(elsewhere));
        template.add_learner(team, pointer).unwrap();
    }

    let mut total_deleted = 0;
    for _ in 0..500 {
        let mut graph = template.clone();
        let deleted = mutation_delete(&mut graph, team, 0.99, &mut rng).unwrap();

        assert!(!deleted.contains(&sole_atomic));
        assert!(graph.team(team).unwrap().contains(sole_atomic));
        assert_eq!(graph.num_atomic_actions(team).unwrap(), 1);
        total_deleted += deleted.len();
    }
    assert!(total_deleted > 0);
}

#[test]
fn test_mutation_delete_spares_single_member() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut graph = Graph::new();
    let (team, learners) = create_dummy_team(&mut graph, 1);

    for _ in 0..200 {
        assert!(mutation_delete(&mut graph, team, 0.9, &mut rng).unwrap().is_empty());
    }
    assert_eq!(graph.team(team).unwrap().learners(), learners.as_slice());
}

#[test]
fn test_mutation_add() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(8);
    let mut template = Graph::new();
    let (team, _) = create_dummy_team(&mut template, 10);
    let (_, pool) = create_dummy_team(&mut template, 50);

    assert!(matches!(
        mutation_add(&mut template.clone(), team, 1.0, &pool, 0, &mut rng),
        Err(TpgError::InvalidProbability { .. })
    ));

    let mut graph = template.clone();
    assert!(mutation_add(&mut graph, team, 0.0, &pool, 0, &mut rng)
        .unwrap()
        .is_empty());
    assert_eq!(graph.team(team).unwrap().len(), 10);

    let samples = compute_sample_size();

    for p in PROBABILITIES {
        let mut frequency: HashMap<usize, usize> = HashMap::new();

        for _ in 0..samples {
            let mut graph = template.clone();
            let added = mutation_add(&mut graph, team, p, &pool, 0, &mut rng).unwrap();

            assert_eq!(graph.team(team).unwrap().len(), 10 + added.len());
            for id in &added {
                assert!(graph.team(team).unwrap().contains(*id));
                assert!(graph.learner(*id).unwrap().in_teams().contains(&team));
            }
            *frequency.entry(added.len()).or_insert(0) += 1;
        }

        let zero = *frequency.get(&0).unwrap_or(&0) as f64 / samples as f64;
        println!("p = {}: zero additions {:.4} (expected {:.4}) {:?}", p, zero, 1.0 - p, frequency);
        assert!(
            (zero - (1.0 - p)).abs() <= CONFIDENCE_INTERVAL,
            "p = {}: observed {:.4}, expected {:.4}",
            p,
            zero,
            1.0 - p
        );

        // Two or more additions need two draws to succeed: p * p²
        let two_or_more = frequency
            .iter()
            .filter(|(&k, _)| k >= 2)
            .map(|(_, &n)| n)
            .sum::<usize>() as f64
            / samples as f64;
        assert!((two_or_more - p.powi(3)).abs() <= CONFIDENCE_INTERVAL);
    }
}

#[test]
fn test_mutation_add_keeps_team_size_stable_against_delete() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut graph = Graph::new();
    let (team, _) = create_dummy_team(&mut graph, 10);
    let (_, pool) = create_dummy_team(&mut graph, 200);

    for _ in 0..200 {
        mutation_delete(&mut graph, team, 0.7, &mut rng).unwrap();
        mutation_add(&mut graph, team, 0.6, &pool, 0, &mut rng).unwrap();
    }
    assert!(graph.team(team).unwrap().len() < 60);
    graph.check_consistency().unwrap();
}

#[test]
fn test_mutation_add_skips_invalid_candidates() {
    let mut rng = StdRng::seed_from_u64(12);
    let mut graph = Graph::new();
    let (team, members) = create_dummy_team(&mut graph, 3);

    let duplicate_program = graph.learner(members[0]).unwrap().program().clone();
    let duplicate = graph
        .create_learner(duplicate_program, ActionObject::Atomic(3))
        .unwrap();
    let self_pointer = create_dummy_learner(&mut graph, ActionObject::TeamPointer(team));
    let pool: Vec<LearnerId> = vec![members[1], duplicate, self_pointer];

    for _ in 0..200 {
        let added = mutation_add(&mut graph, team, 0.99, &pool, 0, &mut rng).unwrap();
        assert!(added.is_empty());
    }
    assert_eq!(graph.team(team).unwrap().learners(), members.as_slice());
}

#[test]
fn test_mutation_add_respects_max_team_size() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut graph = Graph::new();
    let (team, _) = create_dummy_team(&mut graph, 4);
    let (_, pool) = create_dummy_team(&mut graph, 100);

    mutation_add(&mut graph, team, 0.99, &pool, 12, &mut rng).unwrap();
    assert!(graph.team(team).unwrap().len() <= 12);
}

fn mutate_params() -> MutateParams {
    MutateParams {
        p_prog_mut: 0.5,
        p_act_mut: 0.5,
        p_act_atom: 0.5,
        ..MutateParams::default()
    }
}

#[test]
fn test_mutation_mutate_replaces_in_place() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(21);
    let mut template = Graph::new();
    let (team, learners) = create_dummy_team(&mut template, 10);
    let (aux, _) = create_dummy_team(&mut template, 10);
    let (aux_2, _) = create_dummy_team(&mut template, 10);
    let team_pool = vec![aux, aux_2, team];
    let params = mutate_params();

    let mut graph = template.clone();
    assert!(mutation_mutate(&mut graph, team, 0.0, &params, &team_pool, &mut rng)
        .unwrap()
        .is_empty());
    assert_eq!(graph.team(team).unwrap().learners(), learners.as_slice());

    for _ in 0..100 {
        let mut graph = template.clone();
        let mutated = mutation_mutate(&mut graph, team, 1.0, &params, &team_pool, &mut rng).unwrap();

        let members = graph.team(team).unwrap().learners().to_vec();
        assert_eq!(mutated, members);
        for (old, new) in learners.iter().zip(&members) {
            assert_ne!(old, new);
            let before = graph.learner(*old).unwrap();
            let after = graph.learner(*new).unwrap();
            assert!(before.program() != after.program() || before.action() != after.action());
            assert!(before.in_teams().is_empty());
            assert_ne!(after.action(), ActionObject::TeamPointer(team));
        }
        assert!(graph.num_atomic_actions(team).unwrap() >= 1);
        graph.check_consistency().unwrap();
    }
}

#[test]
fn test_mutation_mutate_counts_follow_probability() {
    let mut rng = StdRng::seed_from_u64(22);
    let mut template = Graph::new();
    let (team, learners) = create_dummy_team(&mut template, 10);
    let (aux, _) = create_dummy_team(&mut template, 3);
    let team_pool = vec![aux, team];
    let params = mutate_params();

    for p in [0.25, 0.5, 0.75] {
        let trials = 400;
        let mut total = 0;
        for _ in 0..trials {
            let mut graph = template.clone();
            let mutated = mutation_mutate(&mut graph, team, p, &params, &team_pool, &mut rng).unwrap();

            let replaced = learners
                .iter()
                .filter(|l| !graph.team(team).unwrap().contains(**l))
                .count();
            assert_eq!(replaced, mutated.len());
            total += replaced;
        }

        let mean = total as f64 / trials as f64;
        assert!((mean - 10.0 * p).abs() < 0.5, "p = {}: mean {:.3}", p, mean);
    }
}

#[test]
fn test_mutation_mutate_keeps_sole_atomic_atomic() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut template = Graph::new();
    // Two atomic members (codes 0 and 1) followed by pointers to `aux`
    let (team, atomics) = create_dummy_team(&mut template, 2);
    let (aux, _) = create_dummy_team(&mut template, 1);
    let (aux_2, _) = create_dummy_team(&mut template, 1);
    for _ in 0..5 {
        let pointer = create_dummy_learner(&mut template, ActionObject::TeamPointer(aux));
        template.add_learner(team, pointer).unwrap();
    }
    // Every member changes its action, and non-forced re-rolls always pick a pointer
    let params = MutateParams {
        p_prog_mut: 0.0,
        p_act_mut: 1.0,
        p_act_atom: 0.0,
        ..MutateParams::default()
    };
    let team_pool = vec![team, aux, aux_2];

    for _ in 0..200 {
        let mut graph = template.clone();
        let mutated = mutation_mutate(&mut graph, team, 1.0, &params, &team_pool, &mut rng).unwrap();
        assert_eq!(mutated.len(), 7);

        let members = graph.team(team).unwrap().learners().to_vec();

        // The first atomic had company and became a pointer
        assert!(!graph.learner(members[0]).unwrap().is_action_atomic());

        // The second was then the last one and was re-rolled to another code
        assert_eq!(graph.num_atomic_actions(team).unwrap(), 1);
        let survivor = graph.learner(members[1]).unwrap().action();
        assert!(survivor.is_atomic());
        assert_ne!(survivor, ActionObject::Atomic(1));
        assert_ne!(members[1], atomics[1]);

        // Former `aux` pointers moved to the only other target
        for &id in &members[2..] {
            assert_eq!(
                graph.learner(id).unwrap().action(),
                ActionObject::TeamPointer(aux_2)
            );
        }
        for &id in &members {
            assert_ne!(
                graph.learner(id).unwrap().action(),
                ActionObject::TeamPointer(team)
            );
        }
        graph.check_consistency().unwrap();
    }
}
