/// one subproblem and its column-generation loop
pub mod bb_node;

/// what a solved node reports back to the tree
pub mod bb_solution;

/// the branch-and-price tree
pub mod bb_tree;

/// branching decisions over graph transforms
pub mod branching;

/// LP-guided selection of branching candidates
pub mod branching_helper;

/// parallel initial-solution generation
pub mod init_gen;

/// restricted master solutions
pub mod mp_solution;

/// the LP/MIP restricted master oracle
pub mod mp_solver;

/// pool enlargement by one-out exchanges
pub mod populate;
