use std::fs;

use anyhow::{bail, Context, Result};
use bit_set::BitSet;

/// Vertex id, dense in the graph it belongs to
pub type VertexId = usize;

/// Index of a cluster in the ordered cluster list
pub type ClusterId = usize;

/** A vertex together with the original ids it stands for.

`represents` always refers to the id space of the graph as it was right
after preprocessing; branching transforms merge and shift vertices but
keep this list so that columns (which live in original ids) stay
meaningful in every subproblem. */
#[derive(Debug, Clone)]
pub struct VertexInfo {
    /// dense id in the current graph
    pub id: VertexId,
    /// original ids represented by this vertex
    pub represents: Vec<VertexId>,
}

impl VertexInfo {
    /// true iff this vertex stands for the given original id
    pub fn represents_id(&self, original: VertexId) -> bool {
        self.represents.contains(&original)
    }
}

/** A clustered undirected graph.

Vertices carry dense ids `0..n_vertices`. Clusters are an ordered list of
vertex-id sets; on the graph produced by preprocessing they partition the
vertex set, while below a merge branching the merged vertex may belong to
two clusters (the list is then only a cover). */
#[derive(Debug, Clone)]
pub struct Graph {
    /// number of vertices
    pub n_vertices: usize,
    /// number of edges (after cluster clique-isation, if any)
    pub n_edges: usize,
    /// number of clusters
    pub n_clusters: usize,
    /// vertex identities
    vertices: Vec<VertexInfo>,
    /// adj[v]: bitset of the neighbours of v
    adj: Vec<BitSet>,
    /// canonical (u < v) edge list
    edges: Vec<(VertexId, VertexId)>,
    /// clusters[k]: sorted vertex ids of cluster k
    pub clusters: Vec<Vec<VertexId>>,
    /// first cluster containing each vertex
    cluster_index: Vec<ClusterId>,
    /// number of clusters dropped by preprocessing as trivially colourable
    pub n_trivial_clusters: usize,
    /// instance file this graph was read from (empty for derived graphs)
    pub data_filename: String,
}

impl Graph {
    /// reads and preprocesses an instance file
    pub fn from_file(filename: &str) -> Result<Self> {
        let text = fs::read_to_string(filename)
            .with_context(|| format!("cannot read instance file {}", filename))?;
        Self::from_instance_text(&text, filename)
    }

    /** parses an instance (line 1: vertices, line 2: edges, line 3: clusters,
    then one line per edge and one line per cluster), validates it, makes
    each cluster a clique, applies the preprocessing rules and renumbers
    the surviving vertices densely. */
    pub fn from_instance_text(text: &str, filename: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let mut header = |what: &str| -> Result<usize> {
            lines
                .next()
                .with_context(|| format!("missing {} line", what))?
                .parse::<usize>()
                .with_context(|| format!("unparsable {} line", what))
        };
        let n = header("vertex-count")?;
        let m = header("edge-count")?;
        let p = header("cluster-count")?;
        if n == 0 {
            bail!("instance has no vertices");
        }
        if p == 0 {
            bail!("instance has no clusters");
        }

        let mut edges = Vec::with_capacity(m);
        for e in 0..m {
            let line = lines.next().with_context(|| format!("missing edge line {}", e))?;
            let ids = parse_id_line(line).with_context(|| format!("unparsable edge line {}", e))?;
            if ids.len() != 2 {
                bail!("edge line {} does not hold two vertex ids", e);
            }
            let (u, v) = (ids[0], ids[1]);
            if u >= n || v >= n {
                bail!("edge ({}, {}) references an out-of-range vertex id", u, v);
            }
            if u == v {
                bail!("self-loop on vertex {}", u);
            }
            edges.push((u, v));
        }

        let mut clusters = Vec::with_capacity(p);
        let mut membership = vec![0u32; n];
        for k in 0..p {
            let line = lines.next().with_context(|| format!("missing cluster line {}", k))?;
            let ids = parse_id_line(line).with_context(|| format!("unparsable cluster line {}", k))?;
            if ids.is_empty() {
                bail!("cluster {} is empty", k);
            }
            for &v in &ids {
                if v >= n {
                    bail!("cluster {} references out-of-range vertex id {}", k, v);
                }
                membership[v] += 1;
            }
            clusters.push(ids);
        }
        for (v, &count) in membership.iter().enumerate() {
            if count == 0 {
                bail!("vertex {} belongs to no cluster", v);
            }
            if count > 1 {
                bail!("vertex {} belongs to {} clusters (overlap)", v, count);
            }
        }

        // each cluster becomes a clique, so that pricing respects
        // at-most-one-vertex-per-cluster by stability alone
        for cluster in &clusters {
            for (a, &u) in cluster.iter().enumerate() {
                for &v in &cluster[a + 1..] {
                    edges.push((u, v));
                }
            }
        }

        let infos = (0..n).map(|v| VertexInfo { id: v, represents: vec![v] }).collect();
        let mut g = Self::build(infos, &edges, clusters, filename.to_string());
        let trivial = g.preprocess();
        g.renumber();
        g.n_trivial_clusters = trivial;
        Ok(g)
    }

    /// assembles a graph from parts; edges are deduplicated
    fn build(
        vertices: Vec<VertexInfo>,
        edges: &[(VertexId, VertexId)],
        clusters: Vec<Vec<VertexId>>,
        data_filename: String,
    ) -> Self {
        let n = vertices.len();
        let mut adj = vec![BitSet::with_capacity(n); n];
        for &(u, v) in edges {
            adj[u].insert(v);
            adj[v].insert(u);
        }
        let mut canonical = Vec::new();
        for (u, row) in adj.iter().enumerate() {
            for v in row.iter() {
                if u < v {
                    canonical.push((u, v));
                }
            }
        }
        let mut clusters = clusters;
        for cluster in clusters.iter_mut() {
            cluster.sort_unstable();
            cluster.dedup();
        }
        let mut cluster_index = vec![usize::MAX; n];
        for (k, cluster) in clusters.iter().enumerate() {
            for &v in cluster {
                if cluster_index[v] == usize::MAX {
                    cluster_index[v] = k;
                }
            }
        }
        Self {
            n_vertices: n,
            n_edges: canonical.len(),
            n_clusters: clusters.len(),
            vertices,
            adj,
            edges: canonical,
            clusters,
            cluster_index,
            n_trivial_clusters: 0,
            data_filename,
        }
    }

    /** runs the two reduction rules to a fixed point:

    A. a cluster owning a vertex with no edge leaving the cluster is
       trivially colourable and is dropped whole;
    B. if two cluster-mates u, v satisfy N(u)\{v} ⊆ N(v)\{u}, then v can
       always be re-coloured like u would be, and is dropped.

    Returns the number of clusters dropped by rule A. */
    fn preprocess(&mut self) -> usize {
        let mut trivial = 0usize;
        loop {
            let mut keep_vertex = vec![true; self.n_vertices];
            let mut keep_cluster = vec![true; self.n_clusters];
            let mut changed = false;

            // rule A
            for (k, cluster) in self.clusters.iter().enumerate() {
                let in_cluster: BitSet = cluster.iter().copied().collect();
                if cluster.iter().any(|&v| self.adj[v].is_subset(&in_cluster)) {
                    keep_cluster[k] = false;
                    for &v in cluster {
                        keep_vertex[v] = false;
                    }
                    trivial += 1;
                    changed = true;
                }
            }

            // rule B, on what rule A left
            for (k, cluster) in self.clusters.iter().enumerate() {
                if !keep_cluster[k] || cluster.len() < 2 {
                    continue;
                }
                for (a, &u) in cluster.iter().enumerate() {
                    for &v in &cluster[a + 1..] {
                        if !keep_vertex[u] || !keep_vertex[v] {
                            continue;
                        }
                        let mut nu = self.adj[u].clone();
                        nu.remove(v);
                        let mut nv = self.adj[v].clone();
                        nv.remove(u);
                        if nv.is_subset(&nu) {
                            // u's neighbourhood dominates: drop u
                            keep_vertex[u] = false;
                            changed = true;
                        } else if nu.is_subset(&nv) {
                            keep_vertex[v] = false;
                            changed = true;
                        }
                    }
                }
            }

            if !changed {
                return trivial;
            }
            *self = self.rebuilt(&keep_vertex, &keep_cluster);
        }
    }

    /// rebuilds the graph keeping only the flagged vertices and clusters
    fn rebuilt(&self, keep_vertex: &[bool], keep_cluster: &[bool]) -> Self {
        let mut remap = vec![usize::MAX; self.n_vertices];
        let mut vertices = Vec::new();
        for v in 0..self.n_vertices {
            if keep_vertex[v] {
                remap[v] = vertices.len();
                vertices.push(VertexInfo {
                    id: vertices.len(),
                    represents: self.vertices[v].represents.clone(),
                });
            }
        }
        let edges: Vec<_> = self
            .edges
            .iter()
            .filter(|&&(u, v)| keep_vertex[u] && keep_vertex[v])
            .map(|&(u, v)| (remap[u], remap[v]))
            .collect();
        let clusters: Vec<Vec<VertexId>> = self
            .clusters
            .iter()
            .enumerate()
            .filter(|&(k, _)| keep_cluster[k])
            .map(|(_, cluster)| {
                cluster.iter().filter(|&&v| keep_vertex[v]).map(|&v| remap[v]).collect()
            })
            .collect();
        debug_assert!(clusters.iter().all(|c| !c.is_empty()));
        Self::build(vertices, &edges, clusters, self.data_filename.clone())
    }

    /// makes the current ids the original ones: each vertex represents itself
    fn renumber(&mut self) {
        for v in self.vertices.iter_mut() {
            v.represents = vec![v.id];
        }
    }

    /// vertex identity by current id
    pub fn vertex(&self, v: VertexId) -> &VertexInfo {
        &self.vertices[v]
    }

    /// current id of the vertex representing an original id, if any survives
    pub fn vertex_by_original_id(&self, original: VertexId) -> Option<VertexId> {
        self.vertices.iter().position(|info| info.represents_id(original))
    }

    /// true iff the two current ids are adjacent
    pub fn are_adjacent(&self, u: VertexId, v: VertexId) -> bool {
        self.adj[u].contains(v)
    }

    /// adjacency in the original id space; false if either id has no representative
    pub fn connected_by_original_id(&self, i: VertexId, j: VertexId) -> bool {
        match (self.vertex_by_original_id(i), self.vertex_by_original_id(j)) {
            (Some(u), Some(v)) => self.are_adjacent(u, v),
            _ => false,
        }
    }

    /// all edges, canonically ordered
    pub fn edges(&self) -> &[(VertexId, VertexId)] {
        &self.edges
    }

    /// degree of a current vertex
    pub fn degree(&self, v: VertexId) -> usize {
        self.adj[v].len()
    }

    /// iterator over the neighbours of v
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adj[v].iter()
    }

    /// one adjacency bitset per vertex
    pub fn adjacency(&self) -> &[BitSet] {
        &self.adj
    }

    /// first cluster containing the vertex
    pub fn cluster_of(&self, v: VertexId) -> ClusterId {
        self.cluster_index[v]
    }

    /** number of neighbours of v outside its own cluster. Clusters are
    cliques, so this is the degree minus the cluster-mates. */
    pub fn external_degree(&self, v: VertexId) -> usize {
        self.degree(v) + 1 - self.clusters[self.cluster_of(v)].len()
    }

    /// current ids not adjacent to v
    pub fn anti_neighbourhood(&self, v: VertexId, including_itself: bool) -> Vec<VertexId> {
        (0..self.n_vertices)
            .filter(|&u| (u != v || including_itself) && !self.adj[v].contains(u))
            .collect()
    }

    /** original ids represented by vertices not adjacent to the vertex
    standing for `original`; empty if that id has no representative. */
    pub fn original_id_anti_neighbourhood(
        &self,
        original: VertexId,
        including_itself: bool,
    ) -> BitSet {
        let mut result = BitSet::new();
        let Some(v) = self.vertex_by_original_id(original) else {
            return result;
        };
        for u in 0..self.n_vertices {
            if (u == v && !including_itself) || self.adj[v].contains(u) {
                continue;
            }
            for &r in &self.vertices[u].represents {
                result.insert(r);
            }
        }
        result
    }

    /** checks that a set of original ids can still act as a colour class of
    this (possibly transformed) graph:

    1. every id still has a representative;
    2. a merged vertex is either fully inside or fully outside the set;
    3. no two representatives are adjacent. */
    pub fn is_stable_set_compatible(&self, set: &BitSet) -> bool {
        for id in set.iter() {
            if self.vertex_by_original_id(id).is_none() {
                return false;
            }
        }
        for info in &self.vertices {
            if info.represents.len() > 1 {
                let covered = info.represents.iter().filter(|&&r| set.contains(r)).count();
                if covered != 0 && covered != info.represents.len() {
                    return false;
                }
            }
        }
        let reps: Vec<VertexId> = {
            let mut reps: Vec<VertexId> =
                set.iter().filter_map(|id| self.vertex_by_original_id(id)).collect();
            reps.sort_unstable();
            reps.dedup();
            reps
        };
        for (a, &u) in reps.iter().enumerate() {
            for &v in &reps[a + 1..] {
                if self.are_adjacent(u, v) {
                    return false;
                }
            }
        }
        true
    }

    /// true iff the original ids exist and are pairwise non-adjacent here
    pub fn is_stable_set(&self, ids: &BitSet) -> bool {
        let mut reps = Vec::with_capacity(ids.len());
        for id in ids.iter() {
            match self.vertex_by_original_id(id) {
                Some(v) => reps.push(v),
                None => return false,
            }
        }
        reps.sort_unstable();
        reps.dedup();
        for (a, &u) in reps.iter().enumerate() {
            for &v in &reps[a + 1..] {
                if self.are_adjacent(u, v) {
                    return false;
                }
            }
        }
        true
    }

    /** a copy of the graph without the given vertices; remaining ids are
    densely reassigned, `represents` lists are preserved and clusters lose
    the removed members (a cluster emptied this way stays in place). */
    pub fn removing_vertices(&self, ids: &[VertexId]) -> Self {
        debug_assert!(ids.iter().all(|&v| v < self.n_vertices));
        let mut keep = vec![true; self.n_vertices];
        for &v in ids {
            keep[v] = false;
        }
        let mut remap = vec![usize::MAX; self.n_vertices];
        let mut vertices = Vec::new();
        for v in 0..self.n_vertices {
            if keep[v] {
                remap[v] = vertices.len();
                vertices.push(VertexInfo {
                    id: vertices.len(),
                    represents: self.vertices[v].represents.clone(),
                });
            }
        }
        let edges: Vec<_> = self
            .edges
            .iter()
            .filter(|&&(u, v)| keep[u] && keep[v])
            .map(|&(u, v)| (remap[u], remap[v]))
            .collect();
        let clusters: Vec<Vec<VertexId>> = self
            .clusters
            .iter()
            .map(|cluster| cluster.iter().filter(|&&v| keep[v]).map(|&v| remap[v]).collect())
            .collect();
        Self::build(vertices, &edges, clusters, String::new())
    }

    /** a copy of the graph with the edge (i, j) added. The two vertices must
    not already be adjacent. */
    pub fn linking(&self, i: VertexId, j: VertexId) -> Self {
        assert!(i != j, "cannot link a vertex to itself");
        assert!(!self.are_adjacent(i, j), "link precondition violated: {} and {} already adjacent", i, j);
        let mut edges = self.edges.clone();
        edges.push((i, j));
        Self::build(self.vertices.clone(), &edges, self.clusters.clone(), String::new())
    }

    /** a copy of the graph with i and j replaced by one vertex representing
    the union of their original ids; every edge incident to either becomes
    incident to the merged vertex. The merged vertex joins the clusters of
    both, so the cluster list may become a cover. The two vertices must
    not be adjacent (they are meant to take the same colour). */
    pub fn merging(&self, i: VertexId, j: VertexId) -> Self {
        assert!(i != j, "cannot merge a vertex with itself");
        assert!(!self.are_adjacent(i, j), "merge precondition violated: {} and {} are adjacent", i, j);
        let mut remap = vec![usize::MAX; self.n_vertices];
        let mut vertices = Vec::new();
        for v in 0..self.n_vertices {
            if v != i && v != j {
                remap[v] = vertices.len();
                vertices.push(VertexInfo {
                    id: vertices.len(),
                    represents: self.vertices[v].represents.clone(),
                });
            }
        }
        let merged = vertices.len();
        let mut represents = self.vertices[i].represents.clone();
        represents.extend(self.vertices[j].represents.iter().copied());
        vertices.push(VertexInfo { id: merged, represents });
        remap[i] = merged;
        remap[j] = merged;

        let edges: Vec<_> = self.edges.iter().map(|&(u, v)| (remap[u], remap[v])).collect();
        let clusters: Vec<Vec<VertexId>> =
            self.clusters.iter().map(|cluster| cluster.iter().map(|&v| remap[v]).collect()).collect();
        Self::build(vertices, &edges, clusters, String::new())
    }
}

/// parses a whitespace-separated list of vertex ids
fn parse_id_line(line: &str) -> Result<Vec<VertexId>> {
    line.split_whitespace()
        .map(|tok| tok.parse::<usize>().with_context(|| format!("bad vertex id '{}'", tok)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Graph {
        Graph::from_instance_text(text, "test").unwrap()
    }

    /** three clusters {0,1}, {2,3}, {4,5} with external matching
    0-2, 1-4, 3-5: every vertex keeps an external edge and no
    cluster-mate dominates the other, so preprocessing is a no-op. */
    fn immune() -> Graph {
        parse("6\n3\n3\n0 2\n1 4\n3 5\n0 1\n2 3\n4 5\n")
    }

    #[test]
    fn reads_counts_and_cliqueises_clusters() {
        let g = immune();
        assert_eq!(g.n_vertices, 6);
        assert_eq!(g.n_clusters, 3);
        // 3 external edges + 3 clique edges
        assert_eq!(g.n_edges, 6);
        assert!(g.are_adjacent(0, 1));
        assert!(g.are_adjacent(2, 3));
        assert!(g.are_adjacent(4, 5));
    }

    #[test]
    fn rejects_overlapping_clusters() {
        let err = Graph::from_instance_text("2\n1\n2\n0 1\n0 1\n1\n", "t").unwrap_err();
        assert!(format!("{}", err).contains("overlap"));
    }

    #[test]
    fn rejects_uncovered_vertex() {
        let err = Graph::from_instance_text("3\n1\n1\n0 1\n0 1\n", "t").unwrap_err();
        assert!(format!("{}", err).contains("no cluster"));
    }

    #[test]
    fn rejects_out_of_range_edge() {
        assert!(Graph::from_instance_text("2\n1\n1\n0 7\n0 1\n", "t").is_err());
    }

    #[test]
    fn rule_a_removes_trivially_colourable_cluster() {
        // vertex 1 only sees its cluster-mate, so cluster {0,1} goes;
        // cluster {2} then loses its last external neighbour and goes too
        let g = parse("3\n1\n2\n0 2\n0 1\n2\n");
        assert_eq!(g.n_vertices, 0);
        assert_eq!(g.n_clusters, 0);
        assert_eq!(g.n_trivial_clusters, 2);
    }

    #[test]
    fn rule_b_removes_dominated_cluster_mate() {
        // in cluster {0,1}: N(1)\{0} = {2} ⊆ N(0)\{1} = {2,3}, so 0 goes
        let g = parse("4\n4\n3\n0 2\n1 2\n0 3\n2 3\n0 1\n2\n3\n");
        assert_eq!(g.n_vertices, 3);
        assert_eq!(g.n_clusters, 3);
        assert!(g.clusters.iter().all(|c| c.len() == 1));
        // the survivor of the pair keeps exactly one external neighbour
        let v = g.clusters[0][0];
        assert_eq!(g.external_degree(v), 1);
    }

    #[test]
    fn mutual_domination_keeps_one_survivor() {
        // complete bipartite across {0,1} and {2,3}: the cluster-mates
        // have identical external neighbourhoods, one of each pair stays
        let g = parse("4\n4\n2\n0 2\n0 3\n1 2\n1 3\n0 1\n2 3\n");
        assert_eq!(g.n_vertices, 2);
        assert_eq!(g.n_clusters, 2);
        assert!(g.are_adjacent(0, 1));
    }

    #[test]
    fn preprocessing_is_idempotent() {
        let g = immune();
        let mut text = format!("{}\n{}\n{}\n", g.n_vertices, g.n_edges, g.n_clusters);
        for &(u, v) in g.edges() {
            text += &format!("{} {}\n", u, v);
        }
        for cluster in &g.clusters {
            let ids: Vec<String> = cluster.iter().map(|v| v.to_string()).collect();
            text += &format!("{}\n", ids.join(" "));
        }
        let h = parse(&text);
        assert_eq!(g.n_vertices, h.n_vertices);
        assert_eq!(g.n_edges, h.n_edges);
        assert_eq!(g.n_clusters, h.n_clusters);
        assert_eq!(g.clusters, h.clusters);
    }

    #[test]
    fn removing_nothing_is_identity() {
        let g = immune();
        let h = g.removing_vertices(&[]);
        assert_eq!(g.n_vertices, h.n_vertices);
        assert_eq!(g.n_edges, h.n_edges);
        assert_eq!(g.clusters, h.clusters);
        for v in 0..g.n_vertices {
            assert_eq!(g.vertex(v).represents, h.vertex(v).represents);
        }
    }

    #[test]
    fn removal_remaps_ids_and_keeps_identity() {
        let g = immune();
        let h = g.removing_vertices(&[1]);
        assert_eq!(h.n_vertices, 5);
        // vertex formerly known as 2 is now 1 and still represents 2
        assert_eq!(h.vertex_by_original_id(2), Some(1));
        assert!(h.are_adjacent(0, 1));
        assert_eq!(h.clusters[0], vec![0]);
    }

    #[test]
    fn linking_adds_one_edge() {
        let g = immune();
        let h = g.linking(0, 3);
        assert!(h.are_adjacent(0, 3));
        assert_eq!(h.n_edges, g.n_edges + 1);
        assert_eq!(h.clusters, g.clusters);
    }

    #[test]
    #[should_panic(expected = "link precondition")]
    fn linking_adjacent_vertices_panics() {
        let g = immune();
        let _ = g.linking(0, 2);
    }

    #[test]
    fn merging_unions_identity_and_edges() {
        let g = immune();
        let h = g.merging(1, 3);
        assert_eq!(h.n_vertices, 5);
        let merged = h.n_vertices - 1;
        let mut reps = h.vertex(merged).represents.clone();
        reps.sort_unstable();
        assert_eq!(reps, vec![1, 3]);
        // the merged vertex inherited the edges of both ends
        for original in [0, 2, 4, 5] {
            assert!(h.are_adjacent(merged, h.vertex_by_original_id(original).unwrap()));
        }
        // and belongs to both clusters
        let in_both = h.clusters.iter().filter(|c| c.contains(&merged)).count();
        assert_eq!(in_both, 2);
    }

    #[test]
    fn lifted_stable_sets_of_a_transform_are_stable_in_the_base() {
        let g = immune();
        for h in [g.removing_vertices(&[0]), g.linking(1, 3), g.merging(1, 3)] {
            for v in 0..h.n_vertices {
                for u in 0..h.n_vertices {
                    if u != v && !h.are_adjacent(u, v) {
                        let mut set = BitSet::new();
                        for &r in &h.vertex(u).represents {
                            set.insert(r);
                        }
                        for &r in &h.vertex(v).represents {
                            set.insert(r);
                        }
                        assert!(g.is_stable_set(&set), "{:?} not stable in base", set);
                    }
                }
            }
        }
    }

    #[test]
    fn compatibility_after_merge() {
        let g = immune();
        let h = g.merging(1, 3);
        let set = |ids: &[usize]| ids.iter().copied().collect::<BitSet>();
        // both or neither of the merged pair
        assert!(h.is_stable_set_compatible(&set(&[1, 3])));
        assert!(h.is_stable_set_compatible(&set(&[0])));
        assert!(!h.is_stable_set_compatible(&set(&[1])));
        assert!(!h.is_stable_set_compatible(&set(&[3, 0])));
    }

    #[test]
    fn compatibility_after_removal() {
        let g = immune();
        let h = g.removing_vertices(&[1]);
        let set = |ids: &[usize]| ids.iter().copied().collect::<BitSet>();
        assert!(!h.is_stable_set_compatible(&set(&[1, 3])));
        assert!(h.is_stable_set_compatible(&set(&[0, 3])));
    }

    #[test]
    fn anti_neighbourhoods() {
        let g = immune();
        // 0 is adjacent to 1 (clique) and 2
        assert_eq!(g.anti_neighbourhood(0, false), vec![3, 4, 5]);
        let with_self = g.anti_neighbourhood(0, true);
        assert!(with_self.contains(&0) && with_self.contains(&3));
        let orig = g.original_id_anti_neighbourhood(0, false);
        assert_eq!(orig.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
    }
}
