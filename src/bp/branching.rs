use std::rc::Rc;

use crate::graph::{Graph, VertexId};
use crate::stable_set::StableSet;

/** A branching decision, closed over the (father's) graph it applies to.

`apply` builds the child subproblem's graph; `is_compatible` says
whether an existing column may stay visible in that subproblem. All
variants are known at compile time and dispatch over this fixed pair of
capabilities. */
#[derive(Debug, Clone)]
pub enum BranchingRule {
    /// the root: no decision, the graph passes through
    Empty {
        /// the untouched graph
        graph: Rc<Graph>,
    },
    /// delete vertices (either "colour v", deleting its cluster-mates,
    /// or "do not colour v", deleting v itself)
    VerticesRemove {
        /// graph the ids refer to
        graph: Rc<Graph>,
        /// current ids to delete
        vertices: Vec<VertexId>,
    },
    /// forbid giving i and j the same colour
    VerticesLink {
        /// graph the ids refer to
        graph: Rc<Graph>,
        /// first endpoint
        i: VertexId,
        /// second endpoint
        j: VertexId,
    },
    /// force i and j onto the same colour
    VerticesMerge {
        /// graph the ids refer to
        graph: Rc<Graph>,
        /// first endpoint
        i: VertexId,
        /// second endpoint
        j: VertexId,
    },
}

impl BranchingRule {
    /// the graph this rule branches
    pub fn base_graph(&self) -> &Rc<Graph> {
        match self {
            Self::Empty { graph }
            | Self::VerticesRemove { graph, .. }
            | Self::VerticesLink { graph, .. }
            | Self::VerticesMerge { graph, .. } => graph,
        }
    }

    /// builds the subproblem graph this rule stands for
    pub fn apply(&self) -> Rc<Graph> {
        match self {
            Self::Empty { graph } => Rc::clone(graph),
            Self::VerticesRemove { graph, vertices } => {
                Rc::new(graph.removing_vertices(vertices))
            }
            Self::VerticesLink { graph, i, j } => Rc::new(graph.linking(*i, *j)),
            Self::VerticesMerge { graph, i, j } => Rc::new(graph.merging(*i, *j)),
        }
    }

    /** compatibility of a pool column with this decision. The dummy is
    compatible with everything; otherwise: a removal forbids columns
    containing a removed vertex, a link forbids columns containing both
    endpoints, a merge forbids columns containing exactly one of them. */
    pub fn is_compatible(&self, column: &StableSet) -> bool {
        if column.dummy {
            return true;
        }
        match self {
            Self::Empty { .. } => true,
            Self::VerticesRemove { graph, vertices } => {
                !vertices.iter().any(|&v| vertex_in_column(graph, v, column))
            }
            Self::VerticesLink { graph, i, j } => {
                !(vertex_in_column(graph, *i, column) && vertex_in_column(graph, *j, column))
            }
            Self::VerticesMerge { graph, i, j } => {
                vertex_in_column(graph, *i, column) == vertex_in_column(graph, *j, column)
            }
        }
    }
}

/// true iff the column holds any original id the current vertex stands for
fn vertex_in_column(g: &Graph, v: VertexId, column: &StableSet) -> bool {
    g.vertex(v).represents.iter().any(|&r| column.has_vertex(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Rc<Graph> {
        Rc::new(
            Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap(),
        )
    }

    #[test]
    fn empty_rule_passes_the_graph_through() {
        let g = instance();
        let rule = BranchingRule::Empty { graph: Rc::clone(&g) };
        let local = rule.apply();
        assert!(Rc::ptr_eq(&g, &local));
        assert!(rule.is_compatible(&StableSet::new(&g, [0, 3])));
    }

    #[test]
    fn removal_forbids_columns_using_removed_vertices() {
        let g = instance();
        let rule = BranchingRule::VerticesRemove { graph: Rc::clone(&g), vertices: vec![3] };
        assert!(!rule.is_compatible(&StableSet::new(&g, [0, 3])));
        assert!(rule.is_compatible(&StableSet::new(&g, [0, 4])));
        assert!(rule.is_compatible(&StableSet::dummy(&g)));
        assert_eq!(rule.apply().n_vertices, 5);
    }

    #[test]
    fn link_forbids_columns_with_both_endpoints() {
        let g = instance();
        let rule = BranchingRule::VerticesLink { graph: Rc::clone(&g), i: 0, j: 3 };
        assert!(!rule.is_compatible(&StableSet::new(&g, [0, 3])));
        assert!(rule.is_compatible(&StableSet::new(&g, [0, 4])));
        assert!(rule.is_compatible(&StableSet::new(&g, [3])));
        assert!(rule.is_compatible(&StableSet::dummy(&g)));
        assert!(rule.apply().are_adjacent(0, 3));
    }

    #[test]
    fn merge_forbids_columns_splitting_the_pair() {
        let g = instance();
        let rule = BranchingRule::VerticesMerge { graph: Rc::clone(&g), i: 0, j: 3 };
        assert!(rule.is_compatible(&StableSet::new(&g, [0, 3])));
        assert!(rule.is_compatible(&StableSet::new(&g, [4])));
        assert!(!rule.is_compatible(&StableSet::new(&g, [0])));
        assert!(!rule.is_compatible(&StableSet::new(&g, [3, 4])));
        assert!(rule.is_compatible(&StableSet::dummy(&g)));
    }

    #[test]
    fn merged_branch_forbids_half_covering_basic_columns() {
        // after a merge child is created, every column covering exactly
        // one endpoint must be rejected by the child's rule
        let g = instance();
        let rule = BranchingRule::VerticesMerge { graph: Rc::clone(&g), i: 1, j: 3 };
        let one_endpoint = [
            StableSet::new(&g, [1]),
            StableSet::new(&g, [3]),
            StableSet::new(&g, [1, 5]),
            StableSet::new(&g, [3, 0]),
        ];
        for column in &one_endpoint {
            assert!(!rule.is_compatible(column));
        }
        let local = rule.apply();
        for column in &one_endpoint {
            assert!(!local.is_stable_set_compatible(column.vertices()));
        }
    }

    #[test]
    fn rules_on_a_branched_graph_resolve_through_represents() {
        let g = instance();
        let merged = Rc::new(g.merging(1, 3));
        let fat = merged.n_vertices - 1;
        // removing the merged vertex forbids columns touching either id
        let rule = BranchingRule::VerticesRemove { graph: Rc::clone(&merged), vertices: vec![fat] };
        assert!(!rule.is_compatible(&StableSet::new(&g, [1, 3])));
        assert!(rule.is_compatible(&StableSet::new(&g, [0, 4])));
    }
}
