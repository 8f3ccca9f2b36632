//! Branch-and-price solver for the Selective Graph Colouring Problem.
//!
//! Given an undirected graph whose vertices are partitioned into clusters,
//! pick exactly one vertex per cluster and colour the picked vertices with
//! as few colours as possible, adjacent picks taking different colours.

// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]

/// clustered graph model, instance parsing, preprocessing and the
/// vertex-identity preserving transforms used by branching
pub mod graph;

/// stable sets (colour classes) and the global column pool
pub mod stable_set;

/// JSON parameter file
pub mod params;

/// maximum-weight stable-set pricing oracle
pub mod mwss;

/// primal heuristics: greedy, tabu search, ALNS, GRASP
pub mod heuristics;

/// the exact branch-and-price solver
pub mod bp;

/// run statistics and the results CSV row
pub mod stats;

/// on-disk caches for best-known and greedy initial solutions
pub mod cache;
