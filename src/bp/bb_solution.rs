use std::rc::Rc;

use super::mp_solution::EPS;
use crate::graph::Graph;

/** What a solved tree node hands back to the tree: its bounds, the
integer solution (when one was found), the fractional LP solution used
for branching, the forbidden-column mask and the local graph, plus the
flag marking a run that hit the global deadline. */
#[derive(Debug)]
pub struct BBSolution {
    /// best integer objective known to this node
    pub ub: f64,
    /// the node's LP (or Lagrangean) bound
    pub lb: f64,
    /// (pool id, value) pairs of the incumbent integer solution
    pub integer_solution_columns: Vec<(u32, f64)>,
    /// (pool id, value) pairs of the final LP solution
    pub lp_solution_columns: Vec<(u32, f64)>,
    /// columns hidden from this node
    pub forbidden_columns: Vec<u32>,
    /// the branched graph the node solved on
    pub graph: Rc<Graph>,
    /// the node gave up on the global wall-clock budget
    pub timeout: bool,
}

impl BBSolution {
    /// no integrality gap is left at this node
    pub fn node_solved_to_optimality(&self) -> bool {
        self.ub - self.lb.ceil() < EPS
    }
}
