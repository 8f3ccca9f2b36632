/// adaptive large-neighbourhood search
pub mod alns;

/// constructive greedy colouring
pub mod greedy;

/// multithreaded GRASP over the MWSS oracle
pub mod grasp;

/// decrease-by-one tabu search
pub mod tabu;
