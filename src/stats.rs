use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::Graph;
use crate::params::ResultsParams;

/** Everything the results CSV row reports about one branch-and-price
run, collected as the run progresses and finalised by `build_stats`. */
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    /// instance name; reduced to the file stem by `build_stats`
    pub instance: String,
    /// vertices after preprocessing
    pub n_vertices: usize,
    /// edges after preprocessing
    pub n_edges: usize,
    /// clusters after preprocessing
    pub n_clusters: usize,
    /// tree nodes fully solved
    pub nodes_solved: u32,
    /// nodes still open at termination
    pub nodes_open: usize,
    /// deepest node taken from the queue
    pub max_depth_explored: u32,
    /// times the vertex-in-cluster rule branched
    pub n_branch_on_coloured_vertex: u32,
    /// times the Ryan-Foster rule branched
    pub n_branch_on_edge: u32,
    /// final pool size
    pub column_pool_size: usize,
    /// final upper bound
    pub ub: f64,
    /// final lower bound
    pub lb: f64,
    /// bound delivered by the initial heuristics
    pub heuristic_ub: f64,
    /// upper bound right after root pricing converged
    pub ub_after_root_pricing: f64,
    /// lower bound right after root pricing converged
    pub lb_after_root_pricing: f64,
    /// upper bound after the root's MIP heuristic
    pub ub_after_root_overall: f64,
    /// wall time accumulated over LP, pricing, MIP and heuristics
    pub tot_computing_time: f32,
    /// accumulated time when the root node finished
    pub root_node_time: f32,
    /// time inside master LP solves
    pub tot_lp_time: f32,
    /// time inside the pricing oracle
    pub tot_pricing_time: f32,
    /// columns generated by pricing, one entry per node
    pub num_pri_cols: Vec<u32>,

    /// edge density, derived
    pub density: f64,
    /// average cluster size, derived
    pub avg_cluster_size: f64,
    /// final relative gap, derived
    pub gap: f64,
    /// gap after root pricing, derived
    pub gap_after_root_pricing: f64,
    /// gap after the whole root node, derived
    pub gap_after_root_overall: f64,
    /// pricing columns at the root, derived
    pub col_generated_by_pricing_at_root: u32,
    /// average pricing columns at non-root nodes, derived
    pub avg_col_generated_by_pricing_excl_root: f64,
}

impl SolverStats {
    /// fresh, zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// copies the instance identity and size
    pub fn read_instance_data(&mut self, g: &Graph) {
        self.instance = g.data_filename.clone();
        self.n_vertices = g.n_vertices;
        self.n_edges = g.n_edges;
        self.n_clusters = g.n_clusters;
    }

    /// finalises the derived fields
    pub fn build_stats(&mut self, time_limit: f64) {
        if self.n_vertices > 1 {
            self.density =
                2.0 * self.n_edges as f64 / (self.n_vertices * (self.n_vertices - 1)) as f64;
        }
        if self.n_clusters > 0 {
            self.avg_cluster_size = self.n_vertices as f64 / self.n_clusters as f64;
        }
        self.lb = self.lb.ceil();
        self.ub = self.ub.floor();
        self.gap = relative_gap(self.ub, self.lb);
        self.gap_after_root_pricing =
            relative_gap(self.ub_after_root_pricing, self.lb_after_root_pricing);
        self.gap_after_root_overall =
            relative_gap(self.ub_after_root_overall, self.lb_after_root_pricing);
        self.tot_computing_time = self.tot_computing_time.min(time_limit as f32);

        self.col_generated_by_pricing_at_root = self.num_pri_cols.first().copied().unwrap_or(0);
        if self.num_pri_cols.len() > 1 {
            let rest = &self.num_pri_cols[1..];
            self.avg_col_generated_by_pricing_excl_root =
                rest.iter().sum::<u32>() as f64 / rest.len() as f64;
        }

        self.instance = Path::new(&self.instance)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.instance.clone());
    }

    /// appends the run's CSV row to the configured results file
    pub fn write_csv(&self, results: &ResultsParams) -> Result<()> {
        let path = Path::new(&results.results_dir).join(&results.results_file);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("cannot open results file {}", path.display()))?;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.instance,
            self.n_vertices,
            self.n_edges,
            self.n_clusters,
            self.nodes_solved,
            self.nodes_open,
            self.max_depth_explored,
            self.n_branch_on_coloured_vertex,
            self.n_branch_on_edge,
            self.col_generated_by_pricing_at_root,
            self.avg_col_generated_by_pricing_excl_root,
            self.column_pool_size,
            self.heuristic_ub,
            self.ub_after_root_pricing,
            self.ub_after_root_overall,
            self.ub,
            self.lb_after_root_pricing,
            self.lb,
            self.gap_after_root_pricing,
            self.gap_after_root_overall,
            self.gap,
            self.tot_computing_time,
            self.root_node_time,
            self.tot_lp_time,
            self.tot_pricing_time,
        )
        .with_context(|| format!("cannot append to results file {}", path.display()))?;
        Ok(())
    }
}

fn relative_gap(ub: f64, lb: f64) -> f64 {
    if ub.abs() < f64::EPSILON {
        0.0
    } else {
        (ub - lb) / ub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_density_gap_and_basename() {
        let mut stats = SolverStats::new();
        stats.instance = "insts/some/dir/graph20_1.txt".to_string();
        stats.n_vertices = 4;
        stats.n_edges = 3;
        stats.n_clusters = 2;
        stats.ub = 3.0;
        stats.lb = 2.5;
        stats.num_pri_cols = vec![7, 3, 5];
        stats.tot_computing_time = 100.0;
        stats.build_stats(60.0);
        assert_eq!(stats.instance, "graph20_1");
        assert!((stats.density - 0.5).abs() < 1e-9);
        assert_eq!(stats.lb, 3.0);
        assert!((stats.gap - 0.0).abs() < 1e-9);
        assert_eq!(stats.col_generated_by_pricing_at_root, 7);
        assert!((stats.avg_col_generated_by_pricing_excl_root - 4.0).abs() < 1e-9);
        assert_eq!(stats.tot_computing_time, 60.0);
    }
}
