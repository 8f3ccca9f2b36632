use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use ordered_float::OrderedFloat;

use crate::graph::Graph;
use crate::params::{ExplorationStrategy, Params};
use crate::stable_set::{ColumnPool, StableSet, StableSetCollection};
use crate::stats::SolverStats;

use super::bb_node::{BBNode, PricingContext};
use super::bb_solution::BBSolution;
use super::branching::BranchingRule;
use super::branching_helper::BranchingHelper;
use super::init_gen;
use super::mp_solution::EPS;
use super::mp_solver::MpSolver;
use super::populate;

/// an open node together with the ordering the queue was configured with
#[derive(Debug)]
struct OpenNode {
    node: BBNode,
    depth_first: bool,
}

impl OpenNode {
    /// best-first: missing bounds first, then smaller (bound, node id)
    fn best_first(&self, other: &Self) -> Ordering {
        let own = self.node.bound_from_father.map(OrderedFloat);
        let their = other.node.bound_from_father.map(OrderedFloat);
        match (own, their) {
            (None, None) => other.node.node_id.cmp(&self.node.node_id),
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                b.cmp(&a).then_with(|| other.node.node_id.cmp(&self.node.node_id))
            }
        }
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.node.node_id == other.node.node_id
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.depth_first {
            // deeper nodes first, best-first within a depth
            self.node.depth.cmp(&other.node.depth).then_with(|| self.best_first(other))
        } else {
            self.best_first(other)
        }
    }
}

/** The branch-and-price tree: owns the pool, both master oracles and the
open-node queue, dispatches the two branching rules and maintains the
monotone global bounds. */
#[derive(Debug)]
pub struct BBTree {
    original: Rc<Graph>,
    params: Params,
    pool: ColumnPool,
    queue: BinaryHeap<OpenNode>,
    initial_solution_ids: Vec<u32>,
    lp_solver: MpSolver,
    mip_solver: MpSolver,
    lb: f64,
    ub: f64,
    best_solution: StableSetCollection,
    last_node_id: u32,
    stats: SolverStats,
}

impl BBTree {
    /** builds the tree: seeds the pool (heuristics, optional populate
    pass, caller-provided warm columns, the dummy), mirrors it into both
    oracles and enqueues the root. */
    pub fn new(original: Rc<Graph>, params: Params, warm_columns: &[StableSet]) -> Self {
        let clock = Instant::now();
        let mut stats = SolverStats::new();
        stats.read_instance_data(&original);

        let lp_solver = MpSolver::new(&original, &params, true);
        let mip_solver = MpSolver::new(&original, &params, false);
        let mut tree = Self {
            original,
            params,
            pool: ColumnPool::new(),
            queue: BinaryHeap::new(),
            initial_solution_ids: Vec::new(),
            lp_solver,
            mip_solver,
            lb: 1.0,
            ub: 0.0,
            best_solution: StableSetCollection::new(),
            last_node_id: 0,
            stats,
        };

        if tree.original.n_clusters == 0 {
            // preprocessing found every cluster trivially colourable:
            // one colour (any selection) suffices
            tree.ub = 1.0;
            tree.lb = 1.0;
            tree.best_solution = vec![StableSet::new(&tree.original, [])];
            tree.stats.heuristic_ub = 1.0;
            tree.stats.tot_computing_time = clock.elapsed().as_secs_f32();
            return tree;
        }

        let mut heuristic_ub = tree.original.n_clusters as f64;
        if tree.params.branch_and_price.use_initial_solution {
            let initial = init_gen::generate(&tree.original, &tree.params);
            heuristic_ub = initial.feasible_solution_ids.len() as f64;
            tree.initial_solution_ids = initial.feasible_solution_ids;
            for &id in &tree.initial_solution_ids {
                tree.best_solution.push(initial.columns[id as usize].clone());
            }
            for column in initial.columns {
                tree.pool.add_unique(column);
            }

            if tree.params.branch_and_price.use_populate {
                let snapshot: Vec<StableSet> =
                    tree.pool.iter().map(|(_, c)| c.clone()).collect();
                for column in populate::enlarge_pool(&tree.original, &snapshot) {
                    tree.pool.add_unique(column);
                }
            }

            for column in warm_columns {
                tree.pool.add_unique(column.clone());
            }
        }

        tree.pool.push(StableSet::dummy(&tree.original));
        for (_, column) in tree.pool.iter() {
            tree.lp_solver.add_column(column);
            tree.mip_solver.add_column(column);
        }
        if tree.params.branch_and_price.use_initial_solution {
            tree.mip_solver.add_mipstart(&tree.initial_solution_ids);
        }

        let root_rule = BranchingRule::Empty { graph: Rc::clone(&tree.original) };
        let root = BBNode::new(root_rule, &tree.pool, &[], tree.last_node_id, 0, None);
        tree.last_node_id += 1;
        tree.queue.push(OpenNode {
            node: root,
            depth_first: tree.params.branch_and_price.bb_exploration_strategy
                == ExplorationStrategy::DepthFirst,
        });

        tree.ub = heuristic_ub;
        tree.stats.heuristic_ub = heuristic_ub;
        tree.stats.tot_computing_time = clock.elapsed().as_secs_f32();
        tree
    }

    /// the run statistics gathered so far
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// appends the run's CSV row to the configured results file
    pub fn write_results(&self) -> Result<()> {
        self.stats.write_csv(&self.params.results)
    }

    /** explores the tree to optimality or to the time limit; returns the
    incumbent colouring, or None when no integer solution was found. */
    pub fn solve(&mut self) -> Option<StableSetCollection> {
        if self.original.n_clusters == 0 {
            self.finish_stats();
            return Some(self.best_solution.clone());
        }

        println!();
        println!("Node ID   LB        UB        Pool size     Open nodes");
        println!("*---------*---------*---------*-------------*---------");

        while let Some(open) = self.queue.pop() {
            if f64::from(self.stats.tot_computing_time) > self.params.branch_and_price.time_limit {
                println!(
                    "Time limit hit! Aborting after {} seconds.",
                    self.stats.tot_computing_time
                );
                break;
            }

            let mut node = open.node;
            if let Some(father_bound) = node.bound_from_father {
                if father_bound.ceil() >= self.ub {
                    // the father already proved this subtree sub-optimal
                    continue;
                }
            }

            let solution = node.solve(
                self.ub,
                &mut PricingContext {
                    original: &self.original,
                    params: &self.params,
                    pool: &mut self.pool,
                    lp_solver: &mut self.lp_solver,
                    mip_solver: &mut self.mip_solver,
                    stats: &mut self.stats,
                },
            );
            self.stats.max_depth_explored = self.stats.max_depth_explored.max(node.depth);

            let Some(solution) = solution else {
                // infeasible below this branching: prune
                continue;
            };

            if solution.timeout {
                // a timed-out node can still tighten both global bounds
                if solution.ub < self.ub && !solution.integer_solution_columns.is_empty() {
                    self.adopt_incumbent(&solution);
                }
                if solution.lb > self.lb {
                    self.lb = solution.lb;
                }
                break;
            }

            self.stats.nodes_solved += 1;

            if solution.lb > self.ub + EPS {
                continue;
            }
            if !solution.node_solved_to_optimality() {
                self.branch(&node, &solution);
            }
            self.update_bounds(&solution);

            let every = self.params.results.print_bb_stats_every_n_nodes.max(1);
            if self.stats.nodes_solved == 1 || self.stats.nodes_solved % every == 0 {
                println!(
                    "{:<10}{:<10}{:<10}{:<14}{}",
                    self.stats.nodes_solved,
                    self.lb,
                    self.ub,
                    self.pool.len(),
                    self.queue.len()
                );
            }
        }

        self.finish_stats();
        println!();
        println!("BB tree exploration completed!");
        println!("Lower bound: {} (=> {})", self.lb, self.lb.ceil());
        println!("Upper bound: {}", self.ub);

        if self.best_solution.is_empty() {
            None
        } else {
            Some(self.best_solution.clone())
        }
    }

    fn finish_stats(&mut self) {
        self.stats.nodes_open = self.queue.len();
        self.stats.column_pool_size = self.pool.len();
        self.stats.ub = self.ub;
        self.stats.lb = self.lb;
        self.stats.build_stats(self.params.branch_and_price.time_limit);
    }

    /** the global LB climbs to the weakest father bound still open (or to
    the just-solved node's bound on an empty queue); the UB follows any
    strictly better incumbent. Both stay monotone. */
    fn update_bounds(&mut self, solution: &BBSolution) {
        if self.queue.is_empty() {
            self.lb = self.lb.max(solution.lb);
        } else {
            let weakest =
                self.queue.iter().map(|open| open.node.bound_from_father).try_fold(
                    f64::INFINITY,
                    |acc, bound| bound.map(|b| acc.min(b)),
                );
            if let Some(weakest) = weakest {
                self.lb = self.lb.max(weakest);
            }
        }

        if solution.ub < self.ub && !solution.integer_solution_columns.is_empty() {
            self.adopt_incumbent(solution);
        }
    }

    fn adopt_incumbent(&mut self, solution: &BBSolution) {
        self.ub = solution.ub;
        self.best_solution = solution
            .integer_solution_columns
            .iter()
            .map(|&(id, _)| self.pool.at(id).clone())
            .collect();
    }

    /** two-way branching on a fractional node: the vertex-in-cluster rule
    when the instance is a proper SGCP and some cluster is fractionally
    multi-coloured, Ryan-Foster otherwise. */
    fn branch(&mut self, node: &BBNode, solution: &BBSolution) {
        let mut branched = false;
        if self.original.n_vertices > self.original.n_clusters {
            branched = self.branch_on_vertex_in_cluster(node, solution);
        }
        if !branched {
            branched = self.branch_on_edge(node, solution);
        }
        assert!(branched, "no branching rule applies at a fractional node");
    }

    fn branch_on_vertex_in_cluster(&mut self, node: &BBNode, solution: &BBSolution) -> bool {
        let helper =
            BranchingHelper::new(&solution.graph, &solution.lp_solution_columns, &self.pool);
        let Some((cluster, vertex)) = helper.cluster_branching_candidate() else {
            return false;
        };

        // colour the chosen vertex: its cluster-mates disappear
        let mates: Vec<usize> =
            solution.graph.clusters[cluster].iter().copied().filter(|&v| v != vertex).collect();
        let colour_rule =
            BranchingRule::VerticesRemove { graph: Rc::clone(&solution.graph), vertices: mates };
        self.push_child(colour_rule, node, solution);

        // or colour one of the others: the chosen vertex disappears
        let avoid_rule = BranchingRule::VerticesRemove {
            graph: Rc::clone(&solution.graph),
            vertices: vec![vertex],
        };
        self.push_child(avoid_rule, node, solution);

        self.stats.n_branch_on_coloured_vertex += 1;
        true
    }

    fn branch_on_edge(&mut self, node: &BBNode, solution: &BBSolution) -> bool {
        let helper =
            BranchingHelper::new(&solution.graph, &solution.lp_solution_columns, &self.pool);
        let Some((i, j)) = helper.ryan_foster_pair() else {
            return false;
        };
        assert!(!solution.graph.are_adjacent(i, j));

        let merge =
            BranchingRule::VerticesMerge { graph: Rc::clone(&solution.graph), i, j };
        self.push_child(merge, node, solution);

        let link = BranchingRule::VerticesLink { graph: Rc::clone(&solution.graph), i, j };
        self.push_child(link, node, solution);

        self.stats.n_branch_on_edge += 1;
        true
    }

    fn push_child(&mut self, rule: BranchingRule, father: &BBNode, solution: &BBSolution) {
        let child = BBNode::new(
            rule,
            &self.pool,
            &father.forbidden_columns,
            self.last_node_id,
            father.depth + 1,
            Some(solution.lb),
        );
        self.last_node_id += 1;
        self.queue.push(OpenNode {
            node: child,
            depth_first: self.params.branch_and_price.bb_exploration_strategy
                == ExplorationStrategy::DepthFirst,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::fixture;

    fn solve_text(text: &str, params: Params) -> (Option<StableSetCollection>, SolverStats) {
        let g = Rc::new(Graph::from_instance_text(text, "test").unwrap());
        let mut tree = BBTree::new(g, params, &[]);
        let solution = tree.solve();
        (solution, tree.stats().clone())
    }

    /// the colouring covers every cluster and every class is stable
    fn assert_feasible(g: &Graph, solution: &[StableSet]) {
        let mut covered = vec![false; g.n_clusters];
        for set in solution {
            assert!(g.is_stable_set(set.vertices()));
            for k in set.intersected_clusters() {
                covered[k] = true;
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn independent_clusters_need_one_colour() {
        // V = {0,1,2,3}, no edges, two clusters: everything is trivially
        // colourable and one colour covers the selection
        let (solution, _) = solve_text("4\n0\n2\n0 1\n2 3\n", fixture());
        assert_eq!(solution.unwrap().len(), 1);
    }

    #[test]
    fn complete_bipartite_needs_two() {
        let text = "4\n4\n2\n0 2\n0 3\n1 2\n1 3\n0 1\n2 3\n";
        let g = Rc::new(Graph::from_instance_text(text, "test").unwrap());
        let (solution, stats) = solve_text(text, fixture());
        let solution = solution.unwrap();
        assert_eq!(solution.len(), 2);
        assert_feasible(&g, &solution);
        assert_eq!(stats.ub, 2.0);
        assert_eq!(stats.lb, 2.0);
    }

    #[test]
    fn triangle_needs_three() {
        let text = "3\n3\n3\n0 1\n1 2\n0 2\n0\n1\n2\n";
        let g = Rc::new(Graph::from_instance_text(text, "test").unwrap());
        let (solution, stats) = solve_text(text, fixture());
        let solution = solution.unwrap();
        assert_eq!(solution.len(), 3);
        assert_feasible(&g, &solution);
        assert_eq!(stats.lb, 3.0);
    }

    #[test]
    fn odd_cycle_needs_three_and_only_edge_branching() {
        let text = "5\n5\n5\n0 1\n1 2\n2 3\n3 4\n4 0\n0\n1\n2\n3\n4\n";
        let g = Rc::new(Graph::from_instance_text(text, "test").unwrap());
        let (solution, stats) = solve_text(text, fixture());
        let solution = solution.unwrap();
        assert_eq!(solution.len(), 3);
        assert_feasible(&g, &solution);
        // plain graph colouring: the vertex-in-cluster rule must never fire
        assert_eq!(stats.n_branch_on_coloured_vertex, 0);
    }

    #[test]
    fn odd_cycle_under_depth_first_order() {
        let mut params = fixture();
        params.branch_and_price.bb_exploration_strategy = ExplorationStrategy::DepthFirst;
        let text = "5\n5\n5\n0 1\n1 2\n2 3\n3 4\n4 0\n0\n1\n2\n3\n4\n";
        let (solution, stats) = solve_text(text, params);
        assert_eq!(solution.unwrap().len(), 3);
        assert!(stats.lb <= 3.0 && stats.ub == 3.0);
    }

    #[test]
    fn dominated_vertex_instance_collapses_to_one_colour() {
        // E = {(0,2)}, clusters {0,1} and {2}: preprocessing dissolves
        // the whole instance into trivially colourable clusters
        let (solution, _) = solve_text("3\n1\n2\n0 2\n0 1\n2\n", fixture());
        assert_eq!(solution.unwrap().len(), 1);
    }

    #[test]
    fn root_timeout_still_returns_the_heuristic_incumbent() {
        let mut params = fixture();
        params.branch_and_price.time_limit = 0.0;
        let text = "5\n5\n5\n0 1\n1 2\n2 3\n3 4\n4 0\n0\n1\n2\n3\n4\n";
        let g = Rc::new(Graph::from_instance_text(text, "test").unwrap());
        let (solution, _) = solve_text(text, params);
        let solution = solution.unwrap();
        assert_feasible(&g, &solution);
        assert!(solution.len() >= 3);
    }

    #[test]
    fn proper_sgcp_with_cluster_choice() {
        // clusters {0,1}, {2,3}, {4,5} with an external matching; picking
        // 0, 3 and 4 colours everything with one colour
        let text = "6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n";
        let g = Rc::new(Graph::from_instance_text(text, "test").unwrap());
        let (solution, stats) = solve_text(text, fixture());
        let solution = solution.unwrap();
        assert_eq!(solution.len(), 1);
        assert_feasible(&g, &solution);
        assert_eq!(stats.ub, 1.0);
    }

    #[test]
    fn bounds_stay_consistent_on_a_harder_instance() {
        // two triangles bridged by a matching, singleton clusters
        let text = "6\n9\n6\n0 1\n1 2\n0 2\n3 4\n4 5\n3 5\n0 3\n1 4\n2 5\n0\n1\n2\n3\n4\n5\n";
        let g = Rc::new(Graph::from_instance_text(text, "test").unwrap());
        let (solution, stats) = solve_text(text, fixture());
        let solution = solution.unwrap();
        assert_feasible(&g, &solution);
        assert_eq!(solution.len(), 3);
        assert_eq!(stats.lb, 3.0);
        assert_eq!(stats.ub, 3.0);
    }
}
