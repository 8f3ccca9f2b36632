use bit_set::BitSet;

/** Exact maximum-weight stable-set search.

Branch-and-bound over a shrinking candidate set: at each node the
highest-weight candidate is either taken (its neighbours leave the
candidate set) or discarded. The bound is the weight collected so far
plus the total weight still in the candidate set.

`lower_bound` is strict: only a set whose weight exceeds it is reported.
Weights must be non-negative. */
pub fn max_weight_stable_set(
    adj: &[BitSet],
    weights: &[i64],
    lower_bound: i64,
) -> Option<(Vec<usize>, i64)> {
    debug_assert_eq!(adj.len(), weights.len());
    debug_assert!(weights.iter().all(|&w| w >= 0));

    let n = weights.len();
    // take the heavy vertices first; it tightens the bound early
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&v| std::cmp::Reverse(weights[v]));

    let mut candidates = BitSet::with_capacity(n);
    let mut total = 0i64;
    for v in 0..n {
        if weights[v] > 0 {
            candidates.insert(v);
            total += weights[v];
        }
    }

    let mut search = Search {
        adj,
        weights,
        order: &order,
        best_weight: lower_bound,
        best: None,
        chosen: Vec::new(),
    };
    search.expand(candidates, total, 0);
    search.best.map(|set| {
        let weight: i64 = set.iter().map(|&v| weights[v]).sum();
        (set, weight)
    })
}

struct Search<'a> {
    adj: &'a [BitSet],
    weights: &'a [i64],
    order: &'a [usize],
    best_weight: i64,
    best: Option<Vec<usize>>,
    chosen: Vec<usize>,
}

impl Search<'_> {
    fn expand(&mut self, mut candidates: BitSet, mut candidate_weight: i64, current: i64) {
        if current > self.best_weight {
            self.best_weight = current;
            self.best = Some(self.chosen.clone());
        }
        for &v in self.order {
            if !candidates.contains(v) {
                continue;
            }
            if current + candidate_weight <= self.best_weight {
                // nothing left here can beat the incumbent
                return;
            }
            candidates.remove(v);
            candidate_weight -= self.weights[v];

            let mut kept = candidates.clone();
            kept.difference_with(&self.adj[v]);
            let kept_weight: i64 = kept.iter().map(|u| self.weights[u]).sum();

            self.chosen.push(v);
            self.expand(kept, kept_weight, current + self.weights[v]);
            self.chosen.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(n: usize, edges: &[(usize, usize)]) -> Vec<BitSet> {
        let mut adj = vec![BitSet::with_capacity(n); n];
        for &(u, v) in edges {
            adj[u].insert(v);
            adj[v].insert(u);
        }
        adj
    }

    #[test]
    fn path_prefers_the_endpoints() {
        // path 0-1-2 with a heavy middle: endpoints still win together
        let adj = adjacency(3, &[(0, 1), (1, 2)]);
        let (set, weight) = max_weight_stable_set(&adj, &[4, 5, 4], 0).unwrap();
        assert_eq!(weight, 8);
        let mut set = set;
        set.sort_unstable();
        assert_eq!(set, vec![0, 2]);
    }

    #[test]
    fn heavy_middle_wins_alone() {
        let adj = adjacency(3, &[(0, 1), (1, 2)]);
        let (set, weight) = max_weight_stable_set(&adj, &[2, 9, 2], 0).unwrap();
        assert_eq!((set, weight), (vec![1], 9));
    }

    #[test]
    fn five_cycle() {
        let adj = adjacency(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let (set, weight) = max_weight_stable_set(&adj, &[3, 3, 3, 3, 3], 0).unwrap();
        assert_eq!(weight, 6);
        assert_eq!(set.len(), 2);
        for (a, &u) in set.iter().enumerate() {
            for &v in &set[a + 1..] {
                assert!(!adj[u].contains(v));
            }
        }
    }

    #[test]
    fn strict_lower_bound_filters_weak_sets() {
        let adj = adjacency(2, &[(0, 1)]);
        assert!(max_weight_stable_set(&adj, &[5, 4], 5).is_none());
        let (set, weight) = max_weight_stable_set(&adj, &[6, 4], 5).unwrap();
        assert_eq!((set, weight), (vec![0], 6));
    }

    #[test]
    fn all_zero_weights_report_nothing() {
        let adj = adjacency(3, &[]);
        assert!(max_weight_stable_set(&adj, &[0, 0, 0], 0).is_none());
    }
}
