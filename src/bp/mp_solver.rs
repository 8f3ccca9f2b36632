use highs::{ColProblem, HighsModelStatus, Sense};

use super::mp_solution::{MpSolution, EPS};
use crate::graph::Graph;
use crate::params::Params;
use crate::stable_set::StableSet;

/** Restricted master oracle over the current column pool.

One covering row `∑ x_c ≥ 1` per cluster; one variable per column, in
pool order, priced 1 except for the dummy column which costs `2·|V|`.
LP mode relaxes the variables to `[0, ∞)` and reports row duals; MIP
mode makes them binary.

The oracle mirrors the pool column by column through `add_column` and
keeps a cached forbidden mask: a solve with `skip_check` set trusts the
mask for all columns it already knew and only extends it with the
columns added since, which spares the full rescan on every pricing
iteration. The HiGHS model itself is rebuilt per call from that mask. */
#[derive(Debug)]
pub struct MpSolver {
    lp: bool,
    n_clusters: usize,
    dummy_cost: f64,
    threads: u32,
    time_limit: f64,
    first_node_time_limit: f64,
    costs: Vec<f64>,
    covers: Vec<Vec<usize>>,
    forbidden_mask: Vec<bool>,
    mipstart: Vec<u32>,
}

impl MpSolver {
    /// a master oracle in LP (true) or MIP (false) mode
    pub fn new(g: &Graph, params: &Params, lp: bool) -> Self {
        let bp = &params.branch_and_price;
        Self {
            lp,
            n_clusters: g.n_clusters,
            dummy_cost: 2.0 * g.n_vertices as f64,
            threads: bp.cplex_threads,
            time_limit: if lp { bp.mp_time_limit } else { bp.mip_heuristic.time_limit },
            first_node_time_limit: bp.mip_heuristic.time_limit_first,
            costs: Vec::new(),
            covers: Vec::new(),
            forbidden_mask: Vec::new(),
            mipstart: Vec::new(),
        }
    }

    /// mirrors a pool append; columns must arrive in pool order
    pub fn add_column(&mut self, column: &StableSet) {
        self.costs.push(if column.dummy { self.dummy_cost } else { 1.0 });
        self.covers.push((0..self.n_clusters).filter(|&k| column.intersects(k)).collect());
    }

    /// number of columns mirrored so far
    pub fn n_columns(&self) -> usize {
        self.costs.len()
    }

    /** records the warm-start column ids for the MIP. The HiGHS binding
    offers no MIP-start hook, so the ids are kept as bookkeeping only. */
    pub fn add_mipstart(&mut self, ids: &[u32]) {
        assert!(!self.lp, "cannot warm-start an LP");
        assert!(ids.iter().all(|&id| (id as usize) < self.costs.len()));
        self.mipstart = ids.to_vec();
    }

    /// solve after rebuilding the forbidden mask from scratch
    pub fn solve_with_forbidden_check(&mut self, forbidden: &[u32]) -> Option<MpSolution> {
        self.solve(forbidden, false, false)
    }

    /// solve trusting the cached mask for previously known columns
    pub fn solve_without_forbidden_check(&mut self, forbidden: &[u32]) -> Option<MpSolution> {
        self.solve(forbidden, true, false)
    }

    /// like the skip-check solve but under the root-node MIP time limit
    pub fn solve_with_first_node_tilim(&mut self, forbidden: &[u32]) -> Option<MpSolution> {
        self.solve(forbidden, true, true)
    }

    fn solve(&mut self, forbidden: &[u32], skip_check: bool, first_node_tilim: bool) -> Option<MpSolution> {
        if skip_check {
            // only the columns added since the last call need a flag
            self.forbidden_mask.resize(self.costs.len(), false);
        } else {
            self.forbidden_mask = vec![false; self.costs.len()];
            for &id in forbidden {
                self.forbidden_mask[id as usize] = true;
            }
        }

        let mut problem = ColProblem::default();
        let rows: Vec<_> = (0..self.n_clusters).map(|_| problem.add_row(1.0..)).collect();
        for (c, cost) in self.costs.iter().enumerate() {
            let upper = if self.forbidden_mask[c] {
                0.0
            } else if self.lp {
                f64::INFINITY
            } else {
                1.0
            };
            let factors: Vec<_> = self.covers[c].iter().map(|&k| (rows[k], 1.0)).collect();
            if self.lp {
                problem.add_column(*cost, 0.0..=upper, factors);
            } else {
                problem.add_integer_column(*cost, 0.0..=upper, factors);
            }
        }

        let mut model = problem.optimise(Sense::Minimise);
        model.make_quiet();
        model.set_option("threads", self.threads as i32);
        let time_limit = if first_node_tilim { self.first_node_time_limit } else { self.time_limit };
        model.set_option("time_limit", time_limit);

        let solved = model.solve();
        if solved.status() != HighsModelStatus::Optimal {
            if self.lp {
                panic!(
                    "master LP not solved to optimality ({:?}): impossible with the dummy column",
                    solved.status()
                );
            }
            // MIP: no improving solution within the limits
            return None;
        }

        let solution = solved.get_solution();
        let values = solution.columns();
        let obj_value: f64 = values.iter().zip(&self.costs).map(|(v, c)| v * c).sum();
        let columns: Vec<(u32, f64)> = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > EPS)
            .map(|(c, &v)| (c as u32, v))
            .collect();
        let duals = if self.lp { solution.dual_rows().to_vec() } else { Vec::new() };

        Some(MpSolution { obj_value, columns, duals })
    }
}
