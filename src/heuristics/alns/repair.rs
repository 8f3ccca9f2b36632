use fastrand::Rng;

use super::colouring::ALNSColouring;
use super::destroy::colour_degree;
use super::tabu_list::ShortTermMemory;
use crate::graph::{Graph, VertexId};

/// how the repair picks the vertex to colour inside an orphan cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexChoice {
    /// any vertex of the cluster
    Random,
    /// the vertex with the fewest neighbours outside the cluster
    LowestDegree,
    /// the vertex with the fewest coloured external neighbours
    LowestColourDegree,
}

/// how the repair picks the colour receiving the vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourChoice {
    /// any compatible colour
    Random,
    /// the compatible colour with the most vertices
    Biggest,
    /// the compatible colour with the fewest vertices
    Smallest,
}

/** One repair move: for every uncoloured cluster, pick a vertex by the
vertex rule and place it in a colour picked by the colour rule among the
colours that are neither adjacent to the vertex nor blocked by the
short-term memory; when no colour qualifies, open a new one. The chosen
pairing is recorded in the memory either way. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairMove {
    /// vertex selection rule
    pub vertex: VertexChoice,
    /// colour selection rule
    pub colour: ColourChoice,
}

/// every repair move, in the order the `alns.rmoves` flags refer to
pub const ALL_REPAIR_MOVES: [RepairMove; 9] = [
    RepairMove { vertex: VertexChoice::Random, colour: ColourChoice::Random },
    RepairMove { vertex: VertexChoice::Random, colour: ColourChoice::Biggest },
    RepairMove { vertex: VertexChoice::Random, colour: ColourChoice::Smallest },
    RepairMove { vertex: VertexChoice::LowestDegree, colour: ColourChoice::Random },
    RepairMove { vertex: VertexChoice::LowestDegree, colour: ColourChoice::Biggest },
    RepairMove { vertex: VertexChoice::LowestDegree, colour: ColourChoice::Smallest },
    RepairMove { vertex: VertexChoice::LowestColourDegree, colour: ColourChoice::Random },
    RepairMove { vertex: VertexChoice::LowestColourDegree, colour: ColourChoice::Biggest },
    RepairMove { vertex: VertexChoice::LowestColourDegree, colour: ColourChoice::Smallest },
];

impl RepairMove {
    /// short name used by the alns-stats report
    pub fn name(&self) -> String {
        let vertex = match self.vertex {
            VertexChoice::Random => "rnd-vertex",
            VertexChoice::LowestDegree => "lowest-degree-vertex",
            VertexChoice::LowestColourDegree => "lowest-colour-degree-vertex",
        };
        let colour = match self.colour {
            ColourChoice::Random => "rnd-colour",
            ColourChoice::Biggest => "biggest-colour",
            ColourChoice::Smallest => "smallest-colour",
        };
        format!("{}-in-{}", vertex, colour)
    }

    /// repairs the colouring until every cluster is coloured again
    pub fn apply(
        &self,
        colouring: &mut ALNSColouring,
        g: &Graph,
        memory: &mut ShortTermMemory,
        iteration: u32,
        rng: &mut Rng,
    ) {
        let orphans = colouring.uncoloured_clusters.clone();
        for k in orphans {
            let members = &g.clusters[k];
            let v = match self.vertex {
                VertexChoice::Random => members[rng.usize(0..members.len())],
                VertexChoice::LowestDegree => {
                    members.iter().copied().min_by_key(|&v| g.external_degree(v)).unwrap()
                }
                VertexChoice::LowestColourDegree => members
                    .iter()
                    .copied()
                    .min_by_key(|&v| colour_degree(g, colouring, v))
                    .unwrap(),
            };
            let compatible = compatible_colours(colouring, g, memory, v);
            let c = if compatible.is_empty() {
                colouring.n_colours
            } else {
                match self.colour {
                    ColourChoice::Random => compatible[rng.usize(0..compatible.len())],
                    ColourChoice::Biggest => compatible
                        .iter()
                        .copied()
                        .max_by_key(|&c| colouring.colours[c].len())
                        .unwrap(),
                    ColourChoice::Smallest => compatible
                        .iter()
                        .copied()
                        .min_by_key(|&c| colouring.colours[c].len())
                        .unwrap(),
                }
            };
            colouring.colour_vertex(g, v, c);
            let position = colouring.colour_of(v).unwrap();
            memory.record(v, colouring.colour_id(position), iteration);
        }
    }
}

/// colours v could enter: no adjacent member, not blocked by the memory
fn compatible_colours(
    colouring: &ALNSColouring,
    g: &Graph,
    memory: &ShortTermMemory,
    v: VertexId,
) -> Vec<usize> {
    (0..colouring.n_colours)
        .filter(|&c| {
            colouring.colours[c].iter().all(|&w| !g.are_adjacent(v, w))
                && !memory.blocks(v, colouring.colour_id(c))
        })
        .collect()
}
