use std::rc::Rc;
use std::time::Instant;

use crate::graph::Graph;
use crate::mwss::MwssSolver;
use crate::params::Params;
use crate::stable_set::{ColumnPool, StableSet};
use crate::stats::SolverStats;

use super::bb_solution::BBSolution;
use super::branching::BranchingRule;
use super::init_gen;
use super::mp_solution::{MpSolution, EPS};
use super::mp_solver::MpSolver;

/// everything a node borrows from the tree while it is being solved
#[derive(Debug)]
pub struct PricingContext<'a> {
    /// the preprocessed instance, read-only for the whole run
    pub original: &'a Rc<Graph>,
    /// run parameters
    pub params: &'a Params,
    /// the shared column pool
    pub pool: &'a mut ColumnPool,
    /// LP master oracle
    pub lp_solver: &'a mut MpSolver,
    /// MIP master oracle
    pub mip_solver: &'a mut MpSolver,
    /// run statistics
    pub stats: &'a mut SolverStats,
}

impl PricingContext<'_> {
    /// appends a column to the pool and both master oracles, keeping them in step
    fn append_column(&mut self, column: StableSet) -> u32 {
        self.lp_solver.add_column(&column);
        self.mip_solver.add_column(&column);
        self.pool.push(column)
    }
}

/** One subproblem of the tree: the branching decision that created it,
the columns it must not see, and the column-generation loop that solves
its LP relaxation to optimality (or to the wall-clock deadline). */
#[derive(Debug)]
pub struct BBNode {
    /// position in the tree, 0 for the root
    pub node_id: u32,
    /// distance from the root
    pub depth: u32,
    /// LP bound inherited from the father, None at the root
    pub bound_from_father: Option<f64>,
    rule: BranchingRule,
    /// pool ids hidden from this subproblem
    pub forbidden_columns: Vec<u32>,
    /// pool ids known compatible at construction time
    whitelisted_columns: Vec<u32>,
    local_graph: Option<Rc<Graph>>,
}

impl BBNode {
    /** creates a node from its branching decision. The pool is walked
    once: columns neither inherited-forbidden nor compatible with the
    rule join the forbidden list, the rest the whitelist. */
    pub fn new(
        rule: BranchingRule,
        pool: &ColumnPool,
        inherited_forbidden: &[u32],
        node_id: u32,
        depth: u32,
        bound_from_father: Option<f64>,
    ) -> Self {
        let mut forbidden_columns = inherited_forbidden.to_vec();
        let mut whitelisted_columns = Vec::new();
        for (id, column) in pool.iter() {
            if inherited_forbidden.contains(&id) {
                continue;
            }
            if rule.is_compatible(column) {
                whitelisted_columns.push(id);
            } else {
                forbidden_columns.push(id);
            }
        }
        Self {
            node_id,
            depth,
            bound_from_father,
            rule,
            forbidden_columns,
            whitelisted_columns,
            local_graph: None,
        }
    }

    /** columns that entered the pool after construction have seen neither
    the rule nor the local graph; test them against the latter. */
    fn check_new_columns(&mut self, pool: &ColumnPool) {
        let g = self.local_graph.as_ref().unwrap();
        for (id, column) in pool.iter() {
            if self.forbidden_columns.contains(&id) || self.whitelisted_columns.contains(&id) {
                continue;
            }
            if !column.dummy && !g.is_stable_set_compatible(column.vertices()) {
                self.forbidden_columns.push(id);
            }
        }
    }

    /** the column-generation loop of spec §4.5: solve the master LP,
    price with the MWSS oracle, add improving columns, repeat. Ends with
    an optimal LP (then integrality is checked and the MIP heuristic may
    run), with an infeasibility report (dummy active and nothing left to
    price), or with a timeout solution carrying a Lagrangean bound. */
    pub fn solve(&mut self, ub: f64, ctx: &mut PricingContext) -> Option<BBSolution> {
        assert!(self.local_graph.is_none(), "node solved twice");
        self.local_graph = Some(self.rule.apply());
        self.check_new_columns(ctx.pool);

        ctx.stats.num_pri_cols.push(0);
        let mut new_columns = false;
        let mut first_run = true;
        let mut last_pricing_weight = 0.0f64;

        loop {
            let lp_clock = Instant::now();
            let mp_solution = if first_run {
                ctx.lp_solver.solve_with_forbidden_check(&self.forbidden_columns)
            } else {
                ctx.lp_solver.solve_without_forbidden_check(&self.forbidden_columns)
            };
            let lp_time = lp_clock.elapsed().as_secs_f32();
            ctx.stats.tot_computing_time += lp_time;
            ctx.stats.tot_lp_time += lp_time;
            if self.node_id == 0 {
                ctx.stats.root_node_time = ctx.stats.tot_computing_time;
            }

            // the dummy column keeps the LP feasible at every node
            let mp_solution = mp_solution.expect("master LP must always have a solution");

            if f64::from(ctx.stats.tot_computing_time) > ctx.params.branch_and_price.time_limit {
                let mut solution = self.make_solution(&mp_solution, ub);
                if last_pricing_weight > 1.0 - EPS {
                    // Lagrangean bound from the last pricing violation
                    solution.lb = (mp_solution.obj_value / last_pricing_weight).ceil();
                }
                solution.timeout = true;
                return Some(solution);
            }
            first_run = false;

            let g = self.local_graph.as_ref().unwrap();
            let pricing_clock = Instant::now();
            let oracle = MwssSolver::new(ctx.original, g, ctx.params.mwss_multiplier);
            let priced = oracle.solve(&mp_solution.duals);
            let pricing_time = pricing_clock.elapsed().as_secs_f32();
            ctx.stats.tot_computing_time += pricing_time;
            ctx.stats.tot_pricing_time += pricing_time;

            let mut improved = false;
            if let Some(column) = priced {
                last_pricing_weight = column.dual_weight(&mp_solution.duals);
                if column.reduced_cost(&mp_solution.duals) > EPS && !ctx.pool.contains(&column) {
                    ctx.append_column(column);
                    *ctx.stats.num_pri_cols.last_mut().unwrap() += 1;
                    improved = true;
                    new_columns = true;
                }
            }

            if !improved {
                let dummy_active = mp_solution
                    .active_columns()
                    .iter()
                    .any(|&(id, value)| ctx.pool.at(id).dummy && value > EPS);
                if dummy_active {
                    // no column can cover what the branching forbade
                    return None;
                }
                return Some(self.price_out(&mp_solution, ub, new_columns, ctx));
            }
        }
    }

    /** pricing has converged: record root statistics, check integrality
    and run the gated MIP primal heuristic of spec §4.6. */
    fn price_out(
        &self,
        mp_solution: &MpSolution,
        mut ub: f64,
        new_columns: bool,
        ctx: &mut PricingContext,
    ) -> BBSolution {
        let lb = mp_solution.obj_value;

        if mp_solution.is_integer() {
            ub = ub.min(mp_solution.obj_value);
            let mut solution = self.make_solution(mp_solution, ub);
            solution.integer_solution_columns = mp_solution.columns.clone();
            if self.node_id == 0 {
                ctx.stats.ub_after_root_pricing = ub;
                ctx.stats.ub_after_root_overall = ub;
                ctx.stats.lb_after_root_pricing = lb;
            }
            return solution;
        }

        if self.node_id == 0 {
            ctx.stats.ub_after_root_pricing = ub;
            ctx.stats.lb_after_root_pricing = lb;
        }

        let mip = &ctx.params.branch_and_price.mip_heuristic;
        let can_improve = lb.ceil() < ub - 1.0 - EPS;
        let pool_small_enough = ctx.pool.len() <= mip.max_cols;
        let frequency_hit = self.node_id % mip.frequency == 0;
        let mut integer_solution_columns = Vec::new();

        if mip.active && can_improve && new_columns && pool_small_enough && frequency_hit {
            let mip_clock = Instant::now();
            // any integer colouring is globally feasible, so the MIP sees
            // the whole pool regardless of this node's mask
            let mip_solution = if self.node_id == 0 {
                ctx.mip_solver.solve_with_first_node_tilim(&[])
            } else {
                ctx.mip_solver.solve_without_forbidden_check(&[])
            };
            ctx.stats.tot_computing_time += mip_clock.elapsed().as_secs_f32();

            // feasible iff the dummy stayed out of it
            let feasible = mip_solution.as_ref().is_some_and(|sol| {
                sol.active_columns()
                    .iter()
                    .all(|&(id, value)| value < 0.5 || !ctx.pool.at(id).dummy)
            });

            if feasible {
                let mip_solution = mip_solution.unwrap();
                if mip_solution.obj_value < ub {
                    ub = mip_solution.obj_value;
                    integer_solution_columns = mip_solution.columns.clone();
                }

                if mip.alns && ub - lb.ceil() > 0.5 {
                    if let Some((columns, value)) =
                        self.polish_with_alns(&mip_solution.columns, ub, ctx)
                    {
                        integer_solution_columns = columns;
                        ub = value;
                    }
                }
            }
        }

        if self.node_id == 0 {
            ctx.stats.ub_after_root_overall = ub;
        }

        let mut solution = self.make_solution(mp_solution, ub);
        solution.integer_solution_columns = integer_solution_columns;
        solution
    }

    /** one ALNS pass seeded by the MIP heuristic's colouring; every
    distinct column it produced joins the pool, and a strictly smaller
    colouring replaces the incumbent. */
    fn polish_with_alns(
        &self,
        seed_columns: &[(u32, f64)],
        ub: f64,
        ctx: &mut PricingContext,
    ) -> Option<(Vec<(u32, f64)>, f64)> {
        let seed: Vec<StableSet> =
            seed_columns.iter().map(|&(id, _)| ctx.pool.at(id).clone()).collect();
        let improved = init_gen::generate_from_existing(ctx.original, ctx.params, seed);

        let best_ids = improved.feasible_solution_ids.clone();
        let mut pool_ids = Vec::with_capacity(improved.columns.len());
        for column in improved.columns {
            let id = match ctx.pool.position(&column) {
                Some(id) => id,
                None => ctx.append_column(column),
            };
            pool_ids.push(id);
        }

        let size = best_ids.len() as f64;
        if size < ub {
            let columns =
                best_ids.iter().map(|&i| (pool_ids[i as usize], 1.0)).collect::<Vec<_>>();
            Some((columns, size))
        } else {
            None
        }
    }

    fn make_solution(&self, mp_solution: &MpSolution, ub: f64) -> BBSolution {
        debug_assert!(mp_solution
            .active_columns()
            .iter()
            .all(|(id, _)| !self.forbidden_columns.contains(id)));
        BBSolution {
            ub,
            lb: mp_solution.obj_value,
            integer_solution_columns: Vec::new(),
            lp_solution_columns: mp_solution.columns.clone(),
            forbidden_columns: self.forbidden_columns.clone(),
            graph: Rc::clone(self.local_graph.as_ref().unwrap()),
            timeout: false,
        }
    }

    /// the rule that spawned this node
    pub fn rule(&self) -> &BranchingRule {
        &self.rule
    }
}
