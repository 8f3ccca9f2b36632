use crate::graph::{ClusterId, Graph};
use crate::stable_set::{StableSet, StableSetCollection};

/** Constructive greedy: grow one stable set at a time, always inserting
the lowest-degree vertex that fits, opening a new set when no uncoloured
cluster offers a fitting vertex.

Runs both degree variants and keeps the smaller colouring: the plain one
counts all neighbours, the refined one only neighbours in clusters still
waiting for a colour. */
pub fn solve(g: &Graph) -> StableSetCollection {
    let simple = construct(g, false);
    let improved = construct(g, true);
    if simple.len() < improved.len() {
        simple
    } else {
        improved
    }
}

fn construct(g: &Graph, improved: bool) -> StableSetCollection {
    let mut solution: StableSetCollection = vec![StableSet::new(g, [])];
    let mut uncoloured: Vec<ClusterId> = (0..g.n_clusters).collect();

    while !uncoloured.is_empty() {
        // the best addable vertex, and the best vertex overall as the
        // candidate to open the next stable set
        let mut addable: Option<(usize, usize, ClusterId)> = None;
        let mut any: Option<(usize, usize, ClusterId)> = None;

        for &k in &uncoloured {
            for &w in &g.clusters[k] {
                let fits = solution
                    .last()
                    .unwrap()
                    .vertices()
                    .iter()
                    .all(|s| !g.are_adjacent(s, w));
                let degree = if improved {
                    g.neighbors(w).filter(|&z| uncoloured.contains(&g.cluster_of(z))).count()
                } else {
                    g.degree(w)
                };
                if fits && addable.as_ref().map_or(true, |&(_, d, _)| degree < d) {
                    addable = Some((w, degree, k));
                }
                if any.as_ref().map_or(true, |&(_, d, _)| degree < d) {
                    any = Some((w, degree, k));
                }
            }
        }

        match addable {
            Some((v, _, k)) => {
                solution.last_mut().unwrap().add_vertex(v, g);
                uncoloured.retain(|&c| c != k);
            }
            None => {
                let (v, _, k) = any.expect("uncoloured cluster with no vertex");
                solution.push(StableSet::new(g, [v]));
                uncoloured.retain(|&c| c != k);
            }
        }
    }

    solution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_cluster_with_stable_sets() {
        let g =
            Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap();
        let solution = solve(&g);
        let mut covered = vec![false; g.n_clusters];
        for set in &solution {
            for k in set.intersected_clusters() {
                covered[k] = true;
            }
        }
        assert!(covered.iter().all(|&c| c));
        assert!(solution.len() <= g.n_clusters);
    }

    #[test]
    fn one_colour_suffices_on_an_edgeless_selection() {
        // C5 with singleton clusters needs 3 colours; greedy stays within 5
        let g = Graph::from_instance_text(
            "5\n5\n5\n0 1\n1 2\n2 3\n3 4\n4 0\n0\n1\n2\n3\n4\n",
            "test",
        )
        .unwrap();
        let solution = solve(&g);
        assert!(solution.len() >= 3 && solution.len() <= 5);
        let mut seen = 0;
        for set in &solution {
            seen += set.size();
        }
        assert_eq!(seen, 5);
    }
}
