use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use bit_set::BitSet;
use fastrand::Rng;

use crate::graph::{ClusterId, Graph, VertexId};
use crate::params::{TabuParams, TabuScore};
use crate::stable_set::{StableSet, StableSetCollection};

/// what would happen if a vertex entered a colour
#[derive(Debug, Clone)]
struct Insertion {
    inserted_vertex: VertexId,
    coloured_cluster: ClusterId,
    colour: usize,
    removed_vertices: Vec<VertexId>,
    uncoloured_clusters: BTreeSet<ClusterId>,
    score: usize,
}

/** Tabu search aiming one colour below the incumbent.

A macro-iteration drops the smallest colour class of the incumbent and
tries to re-colour the orphaned clusters inside the remaining classes:
each step picks a random uncoloured cluster and vertex, simulates the
insertion into every non-tabu colour (displacing the conflicting
vertices), commits the cheapest simulation and records the move in the
tabu list. Success restarts with an even smaller target; a vertex that
is tabu in every colour, or iteration exhaustion, ends the attempt. */
#[derive(Debug)]
pub struct TabuSearchSolver<'a> {
    g: &'a Graph,
    cfg: &'a TabuParams,
    rng: Rng,
    target_colours: usize,
    colouring: StableSetCollection,
    uncoloured: BitSet,
    coloured_clusters: BTreeSet<ClusterId>,
    uncoloured_clusters: BTreeSet<ClusterId>,
    iteration: u32,
    /// (colour, vertex) -> iteration at which the entry expires
    tabu: BTreeMap<(usize, VertexId), u32>,
}

impl<'a> TabuSearchSolver<'a> {
    /// solver over the given graph and configuration
    pub fn new(g: &'a Graph, cfg: &'a TabuParams) -> Self {
        Self {
            g,
            cfg,
            rng: Rng::new(),
            target_colours: 0,
            colouring: Vec::new(),
            uncoloured: BitSet::new(),
            coloured_clusters: BTreeSet::new(),
            uncoloured_clusters: BTreeSet::new(),
            iteration: 0,
            tabu: BTreeMap::new(),
        }
    }

    /// fixes the random seed; used by tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::with_seed(seed);
        self
    }

    /** shrinks colourings until a macro-iteration fails; returns the last
    feasible colouring and the elapsed seconds. */
    pub fn solve(&mut self, initial: Option<StableSetCollection>) -> (StableSetCollection, f32) {
        let start = Instant::now();
        let mut incumbent = initial.unwrap_or_else(|| super::greedy::solve(self.g));
        loop {
            let mut outcomes = self.solve_iter(incumbent.clone());
            if outcomes.len() == 1 {
                return (incumbent, start.elapsed().as_secs_f32());
            }
            incumbent = outcomes.pop().unwrap();
        }
    }

    /** one decrease-by-one attempt; the returned list holds the input and,
    when the attempt succeeded, the smaller colouring last. */
    fn solve_iter(&mut self, initial: StableSetCollection) -> Vec<StableSetCollection> {
        let mut outcomes = vec![initial.clone()];
        if initial.len() <= 1 {
            return outcomes;
        }
        self.initialise(initial);

        let max_iterations = if self.cfg.instance_scaled_iters {
            let scale = (self.g.n_vertices.max(2) as f32).log2();
            (self.cfg.iterations as f32 / scale).round() as u32
        } else {
            self.cfg.iterations
        };

        while self.iteration < max_iterations {
            let k = self.random_uncoloured_cluster();
            let v = self.random_vertex_of(k);

            if !self.is_colourable(v) {
                return outcomes;
            }

            let mut best: Option<Insertion> = None;
            for colour in 0..self.target_colours {
                if self.tabu.contains_key(&(colour, v)) {
                    continue;
                }
                let insertion = self.simulate_insertion(v, k, colour);
                if best.as_ref().map_or(true, |b| insertion.score < b.score) {
                    best = Some(insertion);
                }
            }
            let best = best.expect("a colourable vertex has a non-tabu colour");

            let tenure = if self.cfg.randomised_tenure {
                self.rng.u32(self.cfg.min_rnd_tenure..=self.cfg.max_rnd_tenure)
            } else {
                self.cfg.tenure
            };
            self.commit(&best, tenure);

            if self.uncoloured_clusters.is_empty() {
                outcomes.push(self.colouring.clone());
                return outcomes;
            }
            self.expire_tabu_entries();
            self.iteration += 1;
        }

        outcomes
    }

    /// drops the smallest class of the incumbent and indexes the rest
    fn initialise(&mut self, initial: StableSetCollection) {
        self.target_colours = initial.len() - 1;
        let smallest = initial
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.size())
            .map(|(i, _)| i)
            .unwrap();

        self.colouring = Vec::with_capacity(self.target_colours);
        let mut coloured = BitSet::with_capacity(self.g.n_vertices);
        for (i, set) in initial.into_iter().enumerate() {
            if i != smallest {
                coloured.union_with(set.vertices());
                self.colouring.push(set);
            }
        }

        self.uncoloured = BitSet::with_capacity(self.g.n_vertices);
        self.coloured_clusters.clear();
        self.uncoloured_clusters.clear();
        for v in 0..self.g.n_vertices {
            if coloured.contains(v) {
                self.coloured_clusters.insert(self.g.cluster_of(v));
            } else {
                self.uncoloured.insert(v);
            }
        }
        for k in 0..self.g.n_clusters {
            if !self.coloured_clusters.contains(&k) {
                self.uncoloured_clusters.insert(k);
            }
        }

        self.iteration = 0;
        self.tabu.clear();
    }

    fn random_uncoloured_cluster(&mut self) -> ClusterId {
        let pick = self.rng.usize(0..self.uncoloured_clusters.len());
        *self.uncoloured_clusters.iter().nth(pick).unwrap()
    }

    fn random_vertex_of(&mut self, k: ClusterId) -> VertexId {
        let members = &self.g.clusters[k];
        members[self.rng.usize(0..members.len())]
    }

    /// a vertex tabu in every colour cannot be placed at all
    fn is_colourable(&self, v: VertexId) -> bool {
        let times_in_tabu = self.tabu.keys().filter(|&&(_, w)| w == v).count();
        times_in_tabu != self.target_colours
    }

    /** simulates inserting v (of cluster k) into a colour: conflicting
    vertices leave, their clusters become uncoloured, and the score
    aggregates the external degrees of the displaced vertices. */
    fn simulate_insertion(&self, v: VertexId, k: ClusterId, colour: usize) -> Insertion {
        let mut removed_vertices = Vec::new();
        let mut uncoloured_clusters = BTreeSet::new();
        let mut score: Option<usize> = None;

        for w in self.colouring[colour].vertices().iter() {
            if self.g.are_adjacent(v, w) {
                let cluster = self.g.cluster_of(w);
                removed_vertices.push(w);
                uncoloured_clusters.insert(cluster);
                let degree = self.g.external_degree(w);
                score = Some(match (score, self.cfg.score) {
                    (None, _) => degree,
                    (Some(s), TabuScore::Sum) => s + degree,
                    (Some(s), TabuScore::Min) => s.min(degree),
                });
            }
        }

        Insertion {
            inserted_vertex: v,
            coloured_cluster: k,
            colour,
            removed_vertices,
            uncoloured_clusters,
            score: score.unwrap_or(0),
        }
    }

    fn commit(&mut self, insertion: &Insertion, tenure: u32) {
        for &w in &insertion.removed_vertices {
            self.colouring[insertion.colour].remove_vertex(w, self.g);
            self.uncoloured.insert(w);
        }
        for &k in &insertion.uncoloured_clusters {
            self.coloured_clusters.remove(&k);
            self.uncoloured_clusters.insert(k);
        }

        self.uncoloured.remove(insertion.inserted_vertex);
        self.colouring[insertion.colour].add_vertex(insertion.inserted_vertex, self.g);
        self.uncoloured_clusters.remove(&insertion.coloured_cluster);
        self.coloured_clusters.insert(insertion.coloured_cluster);

        self.tabu
            .entry((insertion.colour, insertion.inserted_vertex))
            .or_insert(self.iteration + tenure);
    }

    fn expire_tabu_entries(&mut self) {
        let now = self.iteration;
        self.tabu.retain(|_, &mut expiry| expiry != now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::fixture;

    fn instance() -> Graph {
        Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap()
    }

    #[test]
    fn shrinks_a_wasteful_colouring() {
        let g = instance();
        let params = fixture();
        // one singleton colour per cluster; {0,3,4} shows a 1-colour optimum
        let initial = vec![
            StableSet::new(&g, [0]),
            StableSet::new(&g, [3]),
            StableSet::new(&g, [4]),
        ];
        let (solution, _) =
            TabuSearchSolver::new(&g, &params.tabu).with_seed(3).solve(Some(initial));
        assert!(solution.len() < 3);
        for set in &solution {
            assert!(g.is_stable_set(set.vertices()));
        }
        let mut covered = vec![false; g.n_clusters];
        for set in &solution {
            for k in set.intersected_clusters() {
                covered[k] = true;
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn single_colour_input_is_returned_unchanged() {
        let g = instance();
        let params = fixture();
        let initial = vec![StableSet::new(&g, [0, 3, 4])];
        let (solution, _) =
            TabuSearchSolver::new(&g, &params.tabu).with_seed(8).solve(Some(initial.clone()));
        assert_eq!(solution, initial);
    }
}
