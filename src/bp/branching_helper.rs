use crate::graph::{ClusterId, Graph, VertexId};
use crate::stable_set::ColumnPool;

use super::mp_solution::EPS;

/** LP-guided selection of branching candidates, all phrased against the
node's local graph: columns live in original ids and reach the current
vertices through `represents`.

Asking any of these helpers about the dummy column is a programming
error; a basic dummy means the node was infeasible and should never have
reached branching. */
#[derive(Debug)]
pub struct BranchingHelper<'a> {
    g: &'a Graph,
    lp_columns: &'a [(u32, f64)],
    pool: &'a ColumnPool,
}

impl<'a> BranchingHelper<'a> {
    /// helper over one node's graph and final LP solution
    pub fn new(g: &'a Graph, lp_columns: &'a [(u32, f64)], pool: &'a ColumnPool) -> Self {
        Self { g, lp_columns, pool }
    }

    /// true iff any original id represented by v sits in column `id`
    fn vertex_in_column(&self, v: VertexId, id: u32) -> bool {
        let column = self.pool.at(id);
        self.g.vertex(v).represents.iter().any(|&r| column.has_vertex(r))
    }

    /// total LP value of the active columns covering v
    fn coverage_of(&self, v: VertexId) -> f64 {
        self.lp_columns
            .iter()
            .filter(|&&(id, _)| {
                if self.pool.at(id).dummy {
                    panic!("branching helper met a basic dummy column");
                }
                self.vertex_in_column(v, id)
            })
            .map(|&(_, value)| value)
            .sum()
    }

    /** the cluster to branch on and its most covered vertex, per the
    vertex-in-cluster rule: the cluster with the most fractionally
    coloured vertices (ties to the smaller cluster, then the smaller
    index), and inside it the vertex with the largest total coverage.
    None when every cluster has at most one coloured vertex. */
    pub fn cluster_branching_candidate(&self) -> Option<(ClusterId, VertexId)> {
        let mut best: Option<(usize, usize, ClusterId)> = None;
        for (k, cluster) in self.g.clusters.iter().enumerate() {
            if cluster.len() < 2 {
                continue;
            }
            let coloured = cluster.iter().filter(|&&v| self.coverage_of(v) > EPS).count();
            if coloured < 2 {
                continue;
            }
            let antisize = self.g.n_vertices - cluster.len();
            let better = match best {
                None => true,
                Some((c, a, _)) => (coloured, antisize) > (c, a),
            };
            if better {
                best = Some((coloured, antisize, k));
            }
        }
        let (_, _, k) = best?;
        let v = *self.g.clusters[k]
            .iter()
            .max_by(|&&a, &&b| self.coverage_of(a).total_cmp(&self.coverage_of(b)))
            .unwrap();
        Some((k, v))
    }

    /** the active column with the largest value strictly below one; the
    anchor of Ryan-Foster branching. */
    pub fn most_fractional_column(&self) -> Option<u32> {
        let mut best: Option<(u32, f64)> = None;
        for &(id, value) in self.lp_columns {
            if value < 1.0 - EPS && best.map_or(true, |(_, b)| value > b + EPS) {
                if self.pool.at(id).dummy {
                    panic!("most fractional column is the dummy");
                }
                best = Some((id, value));
            }
        }
        best.map(|(id, _)| id)
    }

    /// some current vertex covered by the column
    pub fn any_vertex_in_column(&self, id: u32) -> Option<VertexId> {
        (0..self.g.n_vertices).find(|&v| self.vertex_in_column(v, id))
    }

    /// another active column covering the vertex
    pub fn another_column_covering(&self, first: u32, v: VertexId) -> Option<u32> {
        assert!(!self.pool.at(first).dummy, "ryan-foster anchored on the dummy");
        for &(id, _) in self.lp_columns {
            if id != first && self.vertex_in_column(v, id) {
                assert!(!self.pool.at(id).dummy, "ryan-foster partner is the dummy");
                return Some(id);
            }
        }
        None
    }

    /// a vertex covered by exactly one of the two columns
    pub fn vertex_covered_by_exactly_one(&self, c1: u32, c2: u32) -> Option<VertexId> {
        (0..self.g.n_vertices).find(|&v| {
            self.vertex_in_column(v, c1) != self.vertex_in_column(v, c2)
        })
    }

    /** the Ryan-Foster pair: a vertex i covered by two basic columns and
    a vertex j covered by exactly one of them. The pair is non-adjacent
    by construction (both sit in one of the stable-set columns). */
    pub fn ryan_foster_pair(&self) -> Option<(VertexId, VertexId)> {
        let c1 = self.most_fractional_column()?;
        for i in 0..self.g.n_vertices {
            if !self.vertex_in_column(i, c1) {
                continue;
            }
            let Some(c2) = self.another_column_covering(c1, i) else { continue };
            if let Some(j) = self.vertex_covered_by_exactly_one(c1, c2) {
                if j != i {
                    debug_assert!(!self.g.are_adjacent(i, j));
                    return Some((i, j));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stable_set::StableSet;

    fn instance() -> Graph {
        Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap()
    }

    #[test]
    fn cluster_candidate_prefers_the_most_fractional_cluster() {
        let g = instance();
        let mut pool = ColumnPool::new();
        let a = pool.push(StableSet::new(&g, [0, 3])); // covers clusters 0, 1
        let b = pool.push(StableSet::new(&g, [1, 3])); // covers clusters 0, 1
        let c = pool.push(StableSet::new(&g, [4])); // covers cluster 2
        let lp = vec![(a, 0.5), (b, 0.5), (c, 1.0)];
        let helper = BranchingHelper::new(&g, &lp, &pool);
        // cluster 0 has two coloured vertices (0 and 1); cluster 1 only 3
        let (k, v) = helper.cluster_branching_candidate().unwrap();
        assert_eq!(k, 0);
        // 3 has coverage 1.0 but lives in cluster 1; inside cluster 0 both
        // vertices have coverage 0.5 and the first maximum is kept
        assert!(v == 0 || v == 1);
    }

    #[test]
    fn no_cluster_candidate_when_selection_is_settled() {
        let g = instance();
        let mut pool = ColumnPool::new();
        let a = pool.push(StableSet::new(&g, [0, 3]));
        let b = pool.push(StableSet::new(&g, [0, 4]));
        let lp = vec![(a, 0.5), (b, 0.5)];
        let helper = BranchingHelper::new(&g, &lp, &pool);
        // every cluster has exactly one covered vertex
        assert!(helper.cluster_branching_candidate().is_none());
    }

    #[test]
    fn ryan_foster_finds_a_split_pair() {
        let g = instance();
        let mut pool = ColumnPool::new();
        let a = pool.push(StableSet::new(&g, [0, 3]));
        let b = pool.push(StableSet::new(&g, [0, 4]));
        let lp = vec![(a, 0.5), (b, 0.5)];
        let helper = BranchingHelper::new(&g, &lp, &pool);
        assert_eq!(helper.most_fractional_column(), Some(a));
        let (i, j) = helper.ryan_foster_pair().unwrap();
        // both columns cover 0; 3 and 4 are each covered by only one
        assert_eq!(i, 0);
        assert!(j == 3 || j == 4);
        assert!(!g.are_adjacent(i, j));
    }
}
