use std::fmt;

use bit_set::BitSet;

use crate::graph::{ClusterId, Graph, VertexId};

/// A colouring expressed as a list of stable sets
pub type StableSetCollection = Vec<StableSet>;

/** One colour class: a set of pairwise non-adjacent vertices, always kept
in the id space of the preprocessed (original) graph, together with a
cached bitset of the clusters it touches.

The dummy stable set contains every vertex, touches every cluster and is
compatible with every branching decision; the master problem prices it at
`2·|V|` so that it only ever enters a solution when nothing else can. */
#[derive(Debug, Clone)]
pub struct StableSet {
    /// original vertex ids in the set
    vertices: BitSet,
    /// clusters intersected by the set
    intersects_cluster: BitSet,
    /// the always-feasible placeholder column
    pub dummy: bool,
}

impl StableSet {
    /// builds a colour class from original ids; must be stable in `g`
    pub fn new(g: &Graph, ids: impl IntoIterator<Item = VertexId>) -> Self {
        let vertices: BitSet = ids.into_iter().collect();
        debug_assert!(g.is_stable_set(&vertices), "not a stable set: {:?}", vertices);
        let mut s = Self { vertices, intersects_cluster: BitSet::new(), dummy: false };
        s.refresh_intersections(g);
        s
    }

    /// the dummy column: every vertex, every cluster
    pub fn dummy(g: &Graph) -> Self {
        let mut vertices = BitSet::with_capacity(g.n_vertices);
        for v in 0..g.n_vertices {
            vertices.insert(v);
        }
        let mut intersects_cluster = BitSet::with_capacity(g.n_clusters);
        for k in 0..g.n_clusters {
            intersects_cluster.insert(k);
        }
        Self { vertices, intersects_cluster, dummy: true }
    }

    fn refresh_intersections(&mut self, g: &Graph) {
        self.intersects_cluster.clear();
        for k in 0..g.n_clusters {
            if self.vertices.iter().any(|v| g.clusters[k].contains(&v)) {
                self.intersects_cluster.insert(k);
            }
        }
    }

    /// the original ids of the set
    pub fn vertices(&self) -> &BitSet {
        &self.vertices
    }

    /// number of vertices in the set
    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    /// true iff the set holds the given original id
    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains(id)
    }

    /// adds a vertex and refreshes the cluster mask
    pub fn add_vertex(&mut self, id: VertexId, g: &Graph) {
        self.vertices.insert(id);
        self.refresh_intersections(g);
    }

    /// removes a vertex and refreshes the cluster mask
    pub fn remove_vertex(&mut self, id: VertexId, g: &Graph) {
        self.vertices.remove(id);
        self.refresh_intersections(g);
    }

    /// true iff the set touches cluster k (the dummy touches everything)
    pub fn intersects(&self, k: ClusterId) -> bool {
        self.dummy || self.intersects_cluster.contains(k)
    }

    /// clusters touched by the set
    pub fn intersected_clusters(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.intersects_cluster.iter()
    }

    /// sum of the duals of the touched clusters
    pub fn dual_weight(&self, duals: &[f64]) -> f64 {
        self.intersects_cluster.iter().map(|k| duals[k]).sum()
    }

    /// reduced cost in the set-cover master: dual weight minus the unit cost
    pub fn reduced_cost(&self, duals: &[f64]) -> f64 {
        self.dual_weight(duals) - 1.0
    }
}

impl PartialEq for StableSet {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl Eq for StableSet {}

impl fmt::Display for StableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for v in self.vertices.iter() {
            write!(f, "{} ", v)?;
        }
        write!(f, "}}")
    }
}

/** The global column pool: an append-only sequence of stable sets shared
by every node of the tree. Ids are positions and are never reused;
per-node visibility is a forbidden-column mask kept by the nodes. */
#[derive(Debug, Default)]
pub struct ColumnPool {
    columns: Vec<StableSet>,
}

impl ColumnPool {
    /// empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// number of columns ever added
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// true iff the pool holds no column
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// column by id
    pub fn at(&self, id: u32) -> &StableSet {
        &self.columns[id as usize]
    }

    /// id of an equal column, if one was added before
    pub fn position(&self, column: &StableSet) -> Option<u32> {
        self.columns.iter().position(|c| c == column).map(|p| p as u32)
    }

    /// true iff an equal column was added before
    pub fn contains(&self, column: &StableSet) -> bool {
        self.position(column).is_some()
    }

    /// appends a column the caller knows to be new; returns its id
    pub fn push(&mut self, column: StableSet) -> u32 {
        debug_assert!(!self.contains(&column), "duplicate column {}", column);
        self.columns.push(column);
        (self.columns.len() - 1) as u32
    }

    /// appends unless an equal column exists; returns the id either way
    pub fn add_unique(&mut self, column: StableSet) -> u32 {
        match self.position(&column) {
            Some(id) => id,
            None => {
                self.columns.push(column);
                (self.columns.len() - 1) as u32
            }
        }
    }

    /// iterates over (id, column) pairs
    pub fn iter(&self) -> impl Iterator<Item = (u32, &StableSet)> {
        self.columns.iter().enumerate().map(|(i, c)| (i as u32, c))
    }
}
