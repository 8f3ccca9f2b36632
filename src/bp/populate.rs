use crate::graph::Graph;
use crate::stable_set::{StableSet, StableSetCollection};

/** Pool enlargement by a one-out exchange: every initial column spawns
variants obtained by dropping one vertex and greedily saturating what
remains with every vertex that fits (no touched cluster, no adjacency).
Only saturations that actually added something, and that duplicate
neither the pool nor an earlier product, are kept. */
pub fn enlarge_pool(g: &Graph, pool: &[StableSet]) -> StableSetCollection {
    let mut new_columns = StableSetCollection::new();

    for set in pool {
        if set.dummy {
            continue;
        }
        for v in 0..g.n_vertices {
            if !set.has_vertex(v) {
                continue;
            }
            let mut variant = set.clone();
            variant.remove_vertex(v, g);

            let mut grew = false;
            for w in 0..g.n_vertices {
                if w == v || variant.has_vertex(w) {
                    continue;
                }
                if variant.intersects(g.cluster_of(w)) {
                    continue;
                }
                if variant.vertices().iter().any(|u| g.are_adjacent(u, w)) {
                    continue;
                }
                variant.add_vertex(w, g);
                grew = true;
            }

            if grew && !pool.contains(&variant) && !new_columns.contains(&variant) {
                new_columns.push(variant);
            }
        }
    }

    new_columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_produces_new_saturated_columns() {
        let g =
            Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap();
        let pool = vec![StableSet::new(&g, [0, 3]), StableSet::new(&g, [4])];
        let produced = enlarge_pool(&g, &pool);
        assert!(!produced.is_empty());
        for column in &produced {
            assert!(g.is_stable_set(column.vertices()));
            assert!(!pool.contains(column));
        }
        // dropping 3 from {0,3} lets 4 join next to 0
        assert!(produced.iter().any(|c| c.has_vertex(0) && c.has_vertex(4)));
    }
}
