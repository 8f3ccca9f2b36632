use std::time::Instant;

use fastrand::Rng;

use crate::graph::Graph;
use crate::params::{AcceptanceKind, LocalSearchKind, Params};
use crate::stable_set::StableSet;

pub mod acceptance;
pub mod colouring;
pub mod destroy;
pub mod local_search;
pub mod repair;
pub mod stats;
pub mod tabu_list;

use acceptance::Acceptance;
use colouring::ALNSColouring;
use destroy::{DestroyMove, ALL_DESTROY_MOVES};
use repair::{RepairMove, ALL_REPAIR_MOVES};
use stats::ALNSStats;
use tabu_list::ShortTermMemory;

/// outcome of one ALNS run
#[derive(Debug)]
pub struct ALNSRun {
    /// the best colouring encountered
    pub best: ALNSColouring,
    /// wall time spent in the loop, seconds
    pub elapsed: f32,
    /// per-move acceptance statistics
    pub stats: ALNSStats,
}

/** Adaptive large-neighbourhood search.

Per iteration a destroy and a repair move are drawn by roulette on their
adaptive scores, applied, optionally polished by the decrease-by-one
local search, and run through the acceptance criterion. Scores grow on
new bests and on improvements, shrink on rejected worsenings. A
short-term memory keeps a repair from undoing the destroy it follows. */
#[derive(Debug)]
pub struct ALNSSolver<'a> {
    g: &'a Graph,
    max_iterations: u32,
    acceptance: Acceptance,
    local_search: LocalSearchKind,
    destroy: Vec<DestroyMove>,
    destroy_score: Vec<f32>,
    repair: Vec<RepairMove>,
    repair_score: Vec<f32>,
    memory: ShortTermMemory,
    tabu_tenure: u32,
    new_best_mult: f32,
    new_improving_mult: f32,
    worsening_mult: f32,
    rng: Rng,
}

impl<'a> ALNSSolver<'a> {
    /// solver configured from the `alns` parameter section
    pub fn new(g: &'a Graph, params: &Params) -> Self {
        let alns = &params.alns;
        let max_iterations = if alns.instance_scaled_iters {
            let scale = (g.n_vertices.max(2) as f32).log2();
            (alns.iterations as f32 / scale).round() as u32
        } else {
            alns.iterations
        };
        let destroy: Vec<DestroyMove> = ALL_DESTROY_MOVES
            .iter()
            .zip(&alns.dmoves)
            .filter(|&(_, &flag)| flag == 1)
            .map(|(&m, _)| m)
            .collect();
        let repair: Vec<RepairMove> = ALL_REPAIR_MOVES
            .iter()
            .zip(&alns.rmoves)
            .filter(|&(_, &flag)| flag == 1)
            .map(|(&m, _)| m)
            .collect();
        let destroy_score = vec![1.0; destroy.len()];
        let repair_score = vec![1.0; repair.len()];
        Self {
            g,
            max_iterations,
            acceptance: Acceptance::from_params(alns.acceptance, alns, max_iterations),
            local_search: alns.local_search,
            destroy,
            destroy_score,
            repair,
            repair_score,
            memory: ShortTermMemory::new(),
            tabu_tenure: params.tabu.tenure,
            new_best_mult: alns.new_best_mult,
            new_improving_mult: alns.new_improving_mult,
            worsening_mult: alns.worsening_mult,
            rng: Rng::new(),
        }
    }

    /// replaces the configured acceptance criterion
    pub fn with_acceptance(mut self, kind: AcceptanceKind, params: &Params) -> Self {
        self.acceptance = Acceptance::from_params(kind, &params.alns, self.max_iterations);
        self
    }

    /// fixes the random seed; used by tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::with_seed(seed);
        self
    }

    /** runs the search. `initial` seeds the first colouring; when absent
    the constructive greedy provides it. */
    pub fn solve(&mut self, initial: Option<&[StableSet]>) -> ALNSRun {
        let seed;
        let columns = match initial {
            Some(columns) => columns,
            None => {
                seed = super::greedy::solve(self.g);
                seed.as_slice()
            }
        };
        let mut current = ALNSColouring::from_columns(self.g, columns);
        let mut best = current.clone();
        let mut stats = ALNSStats::new(
            self.destroy.iter().map(|m| m.name().to_string()).collect(),
            self.repair.iter().map(|m| m.name()).collect(),
        );

        let start = Instant::now();
        for iteration in 1..=self.max_iterations {
            if current.n_colours <= 1 {
                // cannot colour with fewer than one colour
                return ALNSRun { best: current, elapsed: start.elapsed().as_secs_f32(), stats };
            }

            let destroy_id = roulette_scores(&self.destroy_score, &mut self.rng);
            let repair_id = roulette_scores(&self.repair_score, &mut self.rng);

            let mut incumbent = current.clone();
            self.destroy[destroy_id].apply(&mut incumbent, self.g, &mut self.rng);
            self.repair[repair_id].apply(
                &mut incumbent,
                self.g,
                &mut self.memory,
                iteration,
                &mut self.rng,
            );
            if self.local_search == LocalSearchKind::DecreaseByOne {
                incumbent = local_search::decrease_by_one(self.g, &incumbent);
            }

            let accepted =
                self.acceptance.accept(current.score(), incumbent.score(), iteration, &mut self.rng);
            stats.record(destroy_id, repair_id, accepted);
            if accepted {
                if incumbent.score() < best.score() {
                    best = incumbent.clone();
                    self.destroy_score[destroy_id] *= self.new_best_mult;
                    self.repair_score[repair_id] *= self.new_best_mult;
                } else if incumbent.score() < current.score() {
                    self.destroy_score[destroy_id] *= self.new_improving_mult;
                    self.repair_score[repair_id] *= self.new_improving_mult;
                }
                current = incumbent;
            } else if incumbent.score() > current.score() {
                self.destroy_score[destroy_id] *= self.worsening_mult;
                self.repair_score[repair_id] *= self.worsening_mult;
            }

            self.memory.purge(iteration, self.tabu_tenure);
        }

        ALNSRun { best, elapsed: start.elapsed().as_secs_f32(), stats }
    }
}

/// roulette draw over non-negative float scores
fn roulette_scores(scores: &[f32], rng: &mut Rng) -> usize {
    let total: f32 = scores.iter().sum();
    let draw = rng.f32() * total;
    let mut acc = 0.0;
    for (i, &s) in scores.iter().enumerate() {
        acc += s;
        if draw <= acc {
            return i;
        }
    }
    scores.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::fixture;

    fn instance() -> Graph {
        Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap()
    }

    #[test]
    fn finds_a_complete_valid_colouring() {
        let g = instance();
        let params = fixture();
        let run = ALNSSolver::new(&g, &params).with_seed(11).solve(None);
        assert!(run.best.is_complete());
        assert!(run.best.is_valid(&g));
        // {0,3,4} is stable, so the optimum here is a single colour
        assert_eq!(run.best.n_colours, 1);
    }

    #[test]
    fn accepts_a_given_starting_colouring() {
        let g = instance();
        let params = fixture();
        let seed = vec![
            StableSet::new(&g, [0]),
            StableSet::new(&g, [3]),
            StableSet::new(&g, [4]),
        ];
        let run = ALNSSolver::new(&g, &params)
            .with_acceptance(AcceptanceKind::AcceptNonDeteriorating, &params)
            .with_seed(23)
            .solve(Some(&seed));
        assert!(run.best.n_colours <= 3);
        assert!(run.best.is_valid(&g));
    }
}
