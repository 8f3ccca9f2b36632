use std::thread;
use std::time::Instant;

use crate::graph::Graph;
use crate::heuristics::alns::ALNSSolver;
use crate::heuristics::{greedy, tabu::TabuSearchSolver};
use crate::params::{AcceptanceKind, Params};
use crate::stable_set::StableSetCollection;

/// the initial columns and which of them form the best feasible colouring
#[derive(Debug)]
pub struct InitialSolution {
    /// all distinct columns produced by the heuristics
    pub columns: StableSetCollection,
    /// ids (in `columns` order) of the best colouring, for the MIP start
    pub feasible_solution_ids: Vec<u32>,
    /// seconds spent in the heuristics
    pub elapsed: f32,
}

/** Runs the three seeding heuristics in parallel from a common starting
colouring: tabu search, ALNS under worse-accept and ALNS under
non-deteriorating acceptance. The smallest result (ties resolved in that
order) leads the returned column list; every other distinct column
follows it, so the best colouring occupies the first ids. */
pub fn generate(g: &Graph, params: &Params) -> InitialSolution {
    let start = greedy::solve(g);
    generate_from_existing(g, params, start)
}

/// like [`generate`] but seeded with an existing feasible colouring
pub fn generate_from_existing(
    g: &Graph,
    params: &Params,
    start: StableSetCollection,
) -> InitialSolution {
    debug_assert!(start.iter().all(|s| g.is_stable_set(s.vertices())));
    let begin = Instant::now();

    let (tabu_columns, wa_columns, nd_columns) = thread::scope(|scope| {
        let tabu = scope.spawn(|| {
            let mut solver = TabuSearchSolver::new(g, &params.tabu);
            solver.solve(Some(start.clone())).0
        });
        let alns_wa = scope.spawn(|| {
            let mut solver =
                ALNSSolver::new(g, params).with_acceptance(AcceptanceKind::WorseAccept, params);
            solver.solve(Some(&start)).best.to_stable_sets(g)
        });
        let alns_nd = scope.spawn(|| {
            let mut solver = ALNSSolver::new(g, params)
                .with_acceptance(AcceptanceKind::AcceptNonDeteriorating, params);
            solver.solve(Some(&start)).best.to_stable_sets(g)
        });
        (
            tabu.join().expect("tabu worker panicked"),
            alns_wa.join().expect("alns worse-accept worker panicked"),
            alns_nd.join().expect("alns non-deteriorating worker panicked"),
        )
    });

    let elapsed = begin.elapsed().as_secs_f32();
    let best_size = tabu_columns.len().min(wa_columns.len()).min(nd_columns.len());

    let mut ordered = [tabu_columns, wa_columns, nd_columns];
    // rotate the winner to the front, preserving the tie order
    let winner = ordered.iter().position(|c| c.len() == best_size).unwrap();
    ordered.swap(0, winner);
    let [best, second, third] = ordered;

    let feasible_solution_ids: Vec<u32> = (0..best.len() as u32).collect();
    let mut columns = best;
    add_unique(&mut columns, start);
    add_unique(&mut columns, second);
    add_unique(&mut columns, third);

    InitialSolution { columns, feasible_solution_ids, elapsed }
}

fn add_unique(pool: &mut StableSetCollection, additions: StableSetCollection) {
    for column in additions {
        if !pool.contains(&column) {
            pool.push(column);
        }
    }
}
