use fastrand::Rng;

use super::colouring::ALNSColouring;
use crate::graph::{Graph, VertexId};

/** The destroy side of the ALNS: each move uncolours either one vertex or
one whole colour class of a complete colouring.

"Degree" always means the external degree (neighbours outside the own
cluster); "colour degree" restricts that to neighbours that currently
carry a colour. The roulette variants draw the victim with probability
proportional (big) or inverse-proportional (small) to the criterion. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyMove {
    /// uncolour a random vertex of a random colour
    RandomVertexInRandomColour,
    /// uncolour a random vertex of the smallest colour
    RandomVertexInSmallestColour,
    /// uncolour the coloured vertex with the smallest external degree
    VertexWithSmallestDegree,
    /// uncolour the coloured vertex with the smallest colour degree
    VertexWithSmallestColourDegree,
    /// roulette on inverse external degree
    VertexRouletteDegreeSmall,
    /// roulette on inverse colour degree
    VertexRouletteColourDegreeSmall,
    /// uncolour a whole random colour
    RandomColour,
    /// uncolour the smallest colour
    SmallestColour,
    /// uncolour the colour with the smallest summed external degree
    ColourWithSmallestDegree,
    /// uncolour the colour with the smallest summed colour degree
    ColourWithSmallestColourDegree,
    /// roulette over colours on inverse summed external degree
    ColourRouletteDegreeSmall,
    /// roulette over colours on inverse summed colour degree
    ColourRouletteColourDegreeSmall,
    /// uncolour a random vertex of the biggest colour
    RandomVertexInBiggestColour,
    /// uncolour the coloured vertex with the biggest external degree
    VertexWithBiggestDegree,
    /// uncolour the coloured vertex with the biggest colour degree
    VertexWithBiggestColourDegree,
    /// roulette on external degree
    VertexRouletteDegreeBig,
    /// roulette on colour degree
    VertexRouletteColourDegreeBig,
}

/// every destroy move, in the order the `alns.dmoves` flags refer to
pub const ALL_DESTROY_MOVES: [DestroyMove; 17] = [
    DestroyMove::RandomVertexInRandomColour,
    DestroyMove::RandomVertexInSmallestColour,
    DestroyMove::VertexWithSmallestDegree,
    DestroyMove::VertexWithSmallestColourDegree,
    DestroyMove::VertexRouletteDegreeSmall,
    DestroyMove::VertexRouletteColourDegreeSmall,
    DestroyMove::RandomColour,
    DestroyMove::SmallestColour,
    DestroyMove::ColourWithSmallestDegree,
    DestroyMove::ColourWithSmallestColourDegree,
    DestroyMove::ColourRouletteDegreeSmall,
    DestroyMove::ColourRouletteColourDegreeSmall,
    DestroyMove::RandomVertexInBiggestColour,
    DestroyMove::VertexWithBiggestDegree,
    DestroyMove::VertexWithBiggestColourDegree,
    DestroyMove::VertexRouletteDegreeBig,
    DestroyMove::VertexRouletteColourDegreeBig,
];

impl DestroyMove {
    /// short name used by the alns-stats report
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomVertexInRandomColour => "rnd-vertex-in-rnd-colour",
            Self::RandomVertexInSmallestColour => "rnd-vertex-in-smallest-colour",
            Self::VertexWithSmallestDegree => "smallest-degree-vertex",
            Self::VertexWithSmallestColourDegree => "smallest-colour-degree-vertex",
            Self::VertexRouletteDegreeSmall => "roulette-degree-small-vertex",
            Self::VertexRouletteColourDegreeSmall => "roulette-colour-degree-small-vertex",
            Self::RandomColour => "rnd-colour",
            Self::SmallestColour => "smallest-colour",
            Self::ColourWithSmallestDegree => "smallest-degree-colour",
            Self::ColourWithSmallestColourDegree => "smallest-colour-degree-colour",
            Self::ColourRouletteDegreeSmall => "roulette-degree-small-colour",
            Self::ColourRouletteColourDegreeSmall => "roulette-colour-degree-small-colour",
            Self::RandomVertexInBiggestColour => "rnd-vertex-in-biggest-colour",
            Self::VertexWithBiggestDegree => "biggest-degree-vertex",
            Self::VertexWithBiggestColourDegree => "biggest-colour-degree-vertex",
            Self::VertexRouletteDegreeBig => "roulette-degree-big-vertex",
            Self::VertexRouletteColourDegreeBig => "roulette-colour-degree-big-vertex",
        }
    }

    /// applies the move to a complete colouring
    pub fn apply(&self, colouring: &mut ALNSColouring, g: &Graph, rng: &mut Rng) {
        match self {
            Self::RandomVertexInRandomColour => {
                let c = rng.usize(0..colouring.n_colours);
                let v = colouring.colours[c][rng.usize(0..colouring.colours[c].len())];
                colouring.uncolour_vertex(g, v);
            }
            Self::RandomVertexInSmallestColour => {
                let c = smallest_colour(colouring);
                let v = colouring.colours[c][rng.usize(0..colouring.colours[c].len())];
                colouring.uncolour_vertex(g, v);
            }
            Self::RandomVertexInBiggestColour => {
                let c = biggest_colour(colouring);
                let v = colouring.colours[c][rng.usize(0..colouring.colours[c].len())];
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexWithSmallestDegree => {
                let v = pick_vertex_min(colouring, |v| g.external_degree(v));
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexWithBiggestDegree => {
                let v = pick_vertex_max(colouring, |v| g.external_degree(v));
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexWithSmallestColourDegree => {
                let v = pick_vertex_min(colouring, |v| colour_degree(g, colouring, v));
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexWithBiggestColourDegree => {
                let v = pick_vertex_max(colouring, |v| colour_degree(g, colouring, v));
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexRouletteDegreeSmall => {
                let weights: Vec<u64> = colouring
                    .coloured_vertices
                    .iter()
                    .map(|&v| (g.n_vertices - g.external_degree(v)) as u64)
                    .collect();
                let v = colouring.coloured_vertices[roulette(&weights, rng)];
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexRouletteDegreeBig => {
                let weights: Vec<u64> = colouring
                    .coloured_vertices
                    .iter()
                    .map(|&v| g.external_degree(v) as u64)
                    .collect();
                let v = colouring.coloured_vertices[roulette(&weights, rng)];
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexRouletteColourDegreeSmall => {
                let weights: Vec<u64> = colouring
                    .coloured_vertices
                    .iter()
                    .map(|&v| (g.n_vertices - colour_degree(g, colouring, v)) as u64)
                    .collect();
                let v = colouring.coloured_vertices[roulette(&weights, rng)];
                colouring.uncolour_vertex(g, v);
            }
            Self::VertexRouletteColourDegreeBig => {
                let weights: Vec<u64> = colouring
                    .coloured_vertices
                    .iter()
                    .map(|&v| colour_degree(g, colouring, v) as u64)
                    .collect();
                let v = colouring.coloured_vertices[roulette(&weights, rng)];
                colouring.uncolour_vertex(g, v);
            }
            Self::RandomColour => {
                uncolour_whole(colouring, g, rng.usize(0..colouring.n_colours));
            }
            Self::SmallestColour => {
                uncolour_whole(colouring, g, smallest_colour(colouring));
            }
            Self::ColourWithSmallestDegree => {
                let c = pick_colour_min(colouring, |vs| {
                    vs.iter().map(|&v| g.external_degree(v)).sum()
                });
                uncolour_whole(colouring, g, c);
            }
            Self::ColourWithSmallestColourDegree => {
                let c = pick_colour_min(colouring, |vs| {
                    vs.iter().map(|&v| colour_degree(g, colouring, v)).sum()
                });
                uncolour_whole(colouring, g, c);
            }
            Self::ColourRouletteDegreeSmall => {
                let cap = (g.n_vertices * g.n_vertices) as u64;
                let weights: Vec<u64> = colouring
                    .colours
                    .iter()
                    .map(|vs| cap - vs.iter().map(|&v| g.external_degree(v) as u64).sum::<u64>())
                    .collect();
                uncolour_whole(colouring, g, roulette(&weights, rng));
            }
            Self::ColourRouletteColourDegreeSmall => {
                let cap = (g.n_vertices * g.n_vertices) as u64;
                let weights: Vec<u64> = colouring
                    .colours
                    .iter()
                    .map(|vs| {
                        cap - vs.iter().map(|&v| colour_degree(g, colouring, v) as u64).sum::<u64>()
                    })
                    .collect();
                uncolour_whole(colouring, g, roulette(&weights, rng));
            }
        }
    }
}

/// coloured neighbours outside the own cluster
pub fn colour_degree(g: &Graph, colouring: &ALNSColouring, v: VertexId) -> usize {
    let k = g.cluster_of(v);
    g.neighbors(v).filter(|&u| g.cluster_of(u) != k && colouring.is_coloured(u)).count()
}

/// index of an entry, drawn with probability proportional to its weight
pub fn roulette(weights: &[u64], rng: &mut Rng) -> usize {
    let total: u64 = weights.iter().sum();
    let draw = rng.u64(0..=total);
    let mut acc = 0u64;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        if draw <= acc {
            return i;
        }
    }
    weights.len() - 1
}

fn smallest_colour(colouring: &ALNSColouring) -> usize {
    (0..colouring.n_colours).min_by_key(|&c| colouring.colours[c].len()).unwrap()
}

fn biggest_colour(colouring: &ALNSColouring) -> usize {
    (0..colouring.n_colours).max_by_key(|&c| colouring.colours[c].len()).unwrap()
}

fn pick_vertex_min(colouring: &ALNSColouring, key: impl Fn(VertexId) -> usize) -> VertexId {
    colouring.coloured_vertices.iter().copied().min_by_key(|&v| key(v)).unwrap()
}

fn pick_vertex_max(colouring: &ALNSColouring, key: impl Fn(VertexId) -> usize) -> VertexId {
    colouring.coloured_vertices.iter().copied().max_by_key(|&v| key(v)).unwrap()
}

fn pick_colour_min(colouring: &ALNSColouring, key: impl Fn(&[VertexId]) -> usize) -> usize {
    (0..colouring.n_colours).min_by_key(|&c| key(&colouring.colours[c])).unwrap()
}

fn uncolour_whole(colouring: &mut ALNSColouring, g: &Graph, c: usize) {
    let victims = colouring.colours[c].clone();
    for v in victims {
        colouring.uncolour_vertex(g, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Graph {
        Graph::from_instance_text("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n", "test").unwrap()
    }

    fn complete_colouring(g: &Graph) -> ALNSColouring {
        let mut c = ALNSColouring::new(g);
        c.colour_vertex(g, 0, 0);
        c.colour_vertex(g, 3, 0);
        c.colour_vertex(g, 4, 1);
        c
    }

    #[test]
    fn every_move_leaves_a_valid_partial_colouring() {
        let g = instance();
        let mut rng = Rng::with_seed(42);
        for mv in ALL_DESTROY_MOVES {
            let mut c = complete_colouring(&g);
            mv.apply(&mut c, &g, &mut rng);
            assert!(c.is_valid(&g), "{} broke the colouring", mv.name());
            assert!(!c.uncoloured_clusters.is_empty(), "{} removed nothing", mv.name());
        }
    }

    #[test]
    fn colour_moves_empty_a_whole_class() {
        let g = instance();
        let mut rng = Rng::with_seed(1);
        let mut c = complete_colouring(&g);
        DestroyMove::SmallestColour.apply(&mut c, &g, &mut rng);
        // the singleton colour {4} is gone
        assert_eq!(c.n_colours, 1);
        assert!(!c.is_coloured(4));
    }

    #[test]
    fn colour_degree_counts_coloured_externals_only() {
        let g = instance();
        let c = complete_colouring(&g);
        // 2's neighbours: 0 (other cluster, coloured), 3 (own cluster)
        assert_eq!(colour_degree(&g, &c, 2), 1);
        // 5's neighbours: 3 (other cluster, coloured), 4 (own cluster)
        assert_eq!(colour_degree(&g, &c, 5), 1);
    }
}
