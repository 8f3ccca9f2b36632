use crate::graph::{ClusterId, Graph, VertexId};

use super::colouring::ALNSColouring;

/** Decrease-by-one local search: empty the smallest colour class, then
try to re-home each orphaned cluster inside the remaining colours,
displacing at most one other cluster per conflict (first by a plain
recolouring inside the same class, then by a chained move into another
class). The improvement is kept only if no net new colour was opened.

Colours are tracked by their stable ids and the position is re-resolved
after every mutation, so classes vanishing mid-repair cannot alias a
neighbouring class. */
pub fn decrease_by_one(g: &Graph, colouring: &ALNSColouring) -> ALNSColouring {
    if colouring.n_colours <= 1 {
        return colouring.clone();
    }
    let mut n = colouring.clone();

    let smallest = (0..n.n_colours).min_by_key(|&c| n.colours[c].len()).unwrap();
    let victims = n.colours[smallest].clone();
    for v in victims {
        n.uncolour_vertex(g, v);
    }

    let orphans = n.uncoloured_clusters.clone();
    for k in orphans {
        try_to_colour(g, &mut n, k);
    }

    debug_assert!(n.is_complete() && n.is_valid(g));
    if n.n_colours < colouring.n_colours {
        n
    } else {
        colouring.clone()
    }
}

/// repeatedly applies the local search until it stops improving
pub fn descend(g: &Graph, mut colouring: ALNSColouring) -> ALNSColouring {
    loop {
        let improved = decrease_by_one(g, &colouring);
        if improved.n_colours < colouring.n_colours {
            colouring = improved;
        } else {
            return colouring;
        }
    }
}

/// places some vertex of cluster k, opening a new colour as a last resort
fn try_to_colour(g: &Graph, n: &mut ALNSColouring, k: ClusterId) {
    for &v in &g.clusters[k] {
        let candidate_ids = n.colour_ids().to_vec();
        for cid in candidate_ids {
            let Some(position) = n.position_of(cid) else { continue };
            let blocked = incompatible_clusters(g, n, position, v);
            let mut managed = true;
            for q in blocked {
                if n.position_of(cid).is_none() {
                    // the target colour dissolved while fixing conflicts
                    managed = false;
                    break;
                }
                if try_to_recolour(g, n, cid, q, v) {
                    continue;
                }
                if try_to_move(g, n, cid, q) {
                    continue;
                }
                managed = false;
                break;
            }
            if managed {
                if let Some(position) = n.position_of(cid) {
                    if incompatible_clusters(g, n, position, v).is_empty() {
                        n.colour_vertex(g, v, position);
                        return;
                    }
                }
            }
        }
    }
    let fallback = g.clusters[k][0];
    n.colour_vertex(g, fallback, n.n_colours);
}

/// clusters whose coloured vertex in the class conflicts with v
fn incompatible_clusters(
    g: &Graph,
    n: &ALNSColouring,
    position: usize,
    v: VertexId,
) -> Vec<ClusterId> {
    let mut clusters: Vec<ClusterId> = n.colours[position]
        .iter()
        .filter(|&&w| g.are_adjacent(v, w))
        .map(|&w| g.cluster_of(w))
        .collect();
    clusters.sort_unstable();
    clusters.dedup();
    clusters
}

/** swaps cluster q's coloured vertex for another of its vertices that
fits inside the same colour next to v. */
fn try_to_recolour(g: &Graph, n: &mut ALNSColouring, cid: u32, q: ClusterId, v: VertexId) -> bool {
    let Some(position) = n.position_of(cid) else { return false };
    for &other in &g.clusters[q] {
        if !g.are_adjacent(other, v)
            && n.colours[position].iter().all(|&w| w == other || !g.are_adjacent(other, w))
        {
            n.uncolour_cluster(g, q);
            match n.position_of(cid) {
                Some(fresh) => n.colour_vertex(g, other, fresh),
                // q's vertex was the last one: the class is gone, open anew
                None => n.colour_vertex(g, other, n.n_colours),
            }
            return true;
        }
    }
    false
}

/// moves cluster q out of the avoided colour into any other conflict-free one
fn try_to_move(g: &Graph, n: &mut ALNSColouring, avoid: u32, q: ClusterId) -> bool {
    let targets: Vec<u32> = n.colour_ids().iter().copied().filter(|&id| id != avoid).collect();
    for jd in targets {
        if n.position_of(jd).is_none() {
            continue;
        }
        for &v2 in &g.clusters[q] {
            let position = match n.position_of(jd) {
                Some(p) => p,
                None => continue,
            };
            if incompatible_clusters(g, n, position, v2).is_empty() {
                n.uncolour_cluster(g, q);
                let fresh = n
                    .position_of(jd)
                    .expect("a colour distinct from the emptied one cannot vanish");
                n.colour_vertex(g, v2, fresh);
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Graph {
        Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap()
    }

    #[test]
    fn merges_an_avoidable_colour() {
        let g = instance();
        // wasteful colouring: {0}, {3}, {4} — but {0,3} is stable
        let mut c = ALNSColouring::new(&g);
        c.colour_vertex(&g, 0, 0);
        c.colour_vertex(&g, 3, 1);
        c.colour_vertex(&g, 4, 2);
        let improved = decrease_by_one(&g, &c);
        assert!(improved.n_colours < 3);
        assert!(improved.is_complete() && improved.is_valid(&g));
    }

    #[test]
    fn keeps_the_input_when_no_improvement_exists() {
        let g = instance();
        // {0,3,4}? 0-3 ok, 0-4 ok, 3-4 ok: one colour suffices here
        let mut c = ALNSColouring::new(&g);
        c.colour_vertex(&g, 0, 0);
        c.colour_vertex(&g, 3, 0);
        c.colour_vertex(&g, 4, 0);
        let improved = decrease_by_one(&g, &c);
        assert_eq!(improved.n_colours, 1);
    }

    #[test]
    fn descend_reaches_a_fixed_point() {
        let g = instance();
        let mut c = ALNSColouring::new(&g);
        c.colour_vertex(&g, 0, 0);
        c.colour_vertex(&g, 3, 1);
        c.colour_vertex(&g, 4, 2);
        let done = descend(&g, c);
        assert_eq!(done.n_colours, 1);
        assert!(done.is_complete() && done.is_valid(&g));
    }
}
