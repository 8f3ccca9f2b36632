use std::fs;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// order in which open tree nodes are explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ExplorationStrategy {
    /// by (bound from father, node id), missing bounds first
    #[serde(rename = "best-first")]
    BestFirst,
    /// by depth, then best-first within a depth
    #[serde(rename = "depth-first")]
    DepthFirst,
}

/// how the tabu search scores the vertices displaced by an insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabuScore {
    /// sum of the external degrees of the displaced vertices
    Sum,
    /// minimum external degree among the displaced vertices
    Min,
}

/// ALNS acceptance criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceKind {
    /// accept any repaired solution
    AcceptEverything,
    /// accept iff not worse than the current one
    AcceptNonDeteriorating,
    /// accept worsening moves with a probability ramped by iteration
    WorseAccept,
}

/// local-search operator applied after destroy/repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchKind {
    /// no local search
    None,
    /// try to dissolve the smallest colour class
    DecreaseByOne,
}

/// `branch_and_price.mip_heuristic` section
#[derive(Debug, Clone, Deserialize)]
pub struct MipHeuristicParams {
    /// master switch for the in-node MIP primal heuristic
    pub active: bool,
    /// polish improving MIP solutions with one ALNS pass
    pub alns: bool,
    /// MIP time limit (seconds) at non-root nodes
    pub time_limit: f64,
    /// MIP time limit (seconds) at the root node
    pub time_limit_first: f64,
    /// skip the heuristic once the pool grows past this many columns
    pub max_cols: usize,
    /// only run at node ids divisible by this
    pub frequency: u32,
}

/// `branch_and_price` section
#[derive(Debug, Clone, Deserialize)]
pub struct BranchAndPriceParams {
    /// wall-clock budget for the whole run (seconds)
    pub time_limit: f64,
    /// thread count handed to the LP/MIP back-end
    pub cplex_threads: u32,
    /// soft time limit per master LP call (seconds)
    pub mp_time_limit: f64,
    /// open-node ordering
    pub bb_exploration_strategy: ExplorationStrategy,
    /// seed the pool with the parallel heuristics
    pub use_initial_solution: bool,
    /// enlarge the initial pool by the one-out exchange pass
    pub use_populate: bool,
    /// in-node MIP primal heuristic configuration
    pub mip_heuristic: MipHeuristicParams,
}

/// `tabu` section
#[derive(Debug, Clone, Deserialize)]
pub struct TabuParams {
    /// iteration budget per decrease-by-one attempt
    pub iterations: u32,
    /// divide the budget by log2 of the vertex count
    pub instance_scaled_iters: bool,
    /// fixed tabu tenure
    pub tenure: u32,
    /// insertion scoring rule
    pub score: TabuScore,
    /// lower bound of the randomised tenure range
    pub min_rnd_tenure: u32,
    /// upper bound of the randomised tenure range
    pub max_rnd_tenure: u32,
    /// draw the tenure uniformly from the range instead of `tenure`
    pub randomised_tenure: bool,
}

/// `alns` section
#[derive(Debug, Clone, Deserialize)]
pub struct AlnsParams {
    /// iteration budget
    pub iterations: u32,
    /// divide the budget by log2 of the vertex count
    pub instance_scaled_iters: bool,
    /// score multiplier on a new overall best
    pub new_best_mult: f32,
    /// score multiplier on an improvement over the current
    pub new_improving_mult: f32,
    /// score multiplier on a rejected worsening
    pub worsening_mult: f32,
    /// initial acceptance probability of WorseAccept
    pub wa_initial_probability: f32,
    /// acceptance criterion
    pub acceptance: AcceptanceKind,
    /// optional local search
    pub local_search: LocalSearchKind,
    /// 17 on/off flags, one per destroy move
    pub dmoves: Vec<u8>,
    /// 9 on/off flags, one per repair move
    pub rmoves: Vec<u8>,
}

/// `grasp` section
#[derive(Debug, Clone, Deserialize)]
pub struct GraspParams {
    /// number of trials
    pub iterations: u32,
    /// trials run concurrently per batch
    pub threads: u32,
}

/// `decomposition` section; recognised but unused by this build
#[derive(Debug, Clone, Deserialize)]
pub struct DecompositionParams {
    /// time limit for the first stage (seconds)
    pub first_stage_time_limit: f64,
    /// lifting coefficient for generated cuts
    pub lifting_coeff: u32,
    /// cap on cuts added when reading the cut cache
    pub max_added_cuts_when_caching: u32,
    /// strategy for 3-index cuts
    #[serde(rename = "3cuts_strategy")]
    pub three_cuts_strategy: String,
}

/// `results` section
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsParams {
    /// directory receiving the results file
    pub results_dir: String,
    /// CSV file appended with one row per run
    pub results_file: String,
    /// print a progress row every this many solved nodes
    pub print_bb_stats_every_n_nodes: u32,
}

/** All run parameters, read from a JSON file. */
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// exact solver configuration
    pub branch_and_price: BranchAndPriceParams,
    /// integer scaling applied to dual weights before pricing
    pub mwss_multiplier: u32,
    /// tabu search configuration
    pub tabu: TabuParams,
    /// ALNS configuration
    pub alns: AlnsParams,
    /// GRASP configuration
    pub grasp: GraspParams,
    /// decomposition configuration (parsed, not consumed here)
    #[serde(default)]
    pub decomposition: Option<DecompositionParams>,
    /// results reporting configuration
    pub results: ResultsParams,
}

impl Params {
    /// loads and validates a parameter file
    pub fn from_file(filename: &str) -> Result<Self> {
        let text = fs::read_to_string(filename)
            .with_context(|| format!("cannot read params file {}", filename))?;
        let params: Params = serde_json::from_str(&text)
            .with_context(|| format!("unparsable params file {}", filename))?;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if self.alns.dmoves.len() != 17 {
            bail!("alns.dmoves must hold 17 flags, found {}", self.alns.dmoves.len());
        }
        if self.alns.rmoves.len() != 9 {
            bail!("alns.rmoves must hold 9 flags, found {}", self.alns.rmoves.len());
        }
        if self.alns.dmoves.iter().chain(&self.alns.rmoves).any(|&f| f > 1) {
            bail!("alns move flags must be 0 or 1");
        }
        if self.alns.dmoves.iter().all(|&f| f == 0) {
            bail!("alns.dmoves enables no destroy move");
        }
        if self.alns.rmoves.iter().all(|&f| f == 0) {
            bail!("alns.rmoves enables no repair move");
        }
        if self.mwss_multiplier == 0 {
            bail!("mwss_multiplier must be positive");
        }
        if self.tabu.randomised_tenure && self.tabu.min_rnd_tenure > self.tabu.max_rnd_tenure {
            bail!("tabu.min_rnd_tenure exceeds tabu.max_rnd_tenure");
        }
        if self.grasp.threads == 0 {
            bail!("grasp.threads must be positive");
        }
        if self.branch_and_price.mip_heuristic.frequency == 0 {
            bail!("mip_heuristic.frequency must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// a complete parameter set, shared by the solver tests
    pub(crate) fn fixture() -> Params {
        let text = r#"{
            "branch_and_price": {
                "time_limit": 60,
                "cplex_threads": 1,
                "mp_time_limit": 30,
                "bb_exploration_strategy": "best-first",
                "use_initial_solution": true,
                "use_populate": false,
                "mip_heuristic": {
                    "active": true,
                    "alns": false,
                    "time_limit": 5,
                    "time_limit_first": 10,
                    "max_cols": 5000,
                    "frequency": 1
                }
            },
            "mwss_multiplier": 10000,
            "tabu": {
                "iterations": 200,
                "instance_scaled_iters": false,
                "tenure": 5,
                "score": "sum",
                "min_rnd_tenure": 3,
                "max_rnd_tenure": 10,
                "randomised_tenure": false
            },
            "alns": {
                "iterations": 120,
                "instance_scaled_iters": false,
                "new_best_mult": 1.2,
                "new_improving_mult": 1.1,
                "worsening_mult": 0.9,
                "wa_initial_probability": 0.1,
                "acceptance": "worse_accept",
                "local_search": "decrease_by_one",
                "dmoves": [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
                "rmoves": [1,1,1,1,1,1,1,1,1]
            },
            "grasp": {
                "iterations": 4,
                "threads": 2
            },
            "decomposition": {
                "first_stage_time_limit": 10,
                "lifting_coeff": 1,
                "max_added_cuts_when_caching": 100,
                "3cuts_strategy": "none"
            },
            "results": {
                "results_dir": ".",
                "results_file": "results.csv",
                "print_bb_stats_every_n_nodes": 100
            }
        }"#;
        let params: Params = serde_json::from_str(text).unwrap();
        params.validate().unwrap();
        params
    }

    #[test]
    fn parses_every_section() {
        let p = fixture();
        assert_eq!(p.branch_and_price.bb_exploration_strategy, ExplorationStrategy::BestFirst);
        assert_eq!(p.tabu.score, TabuScore::Sum);
        assert_eq!(p.alns.acceptance, AcceptanceKind::WorseAccept);
        assert_eq!(p.alns.local_search, LocalSearchKind::DecreaseByOne);
        assert_eq!(p.alns.dmoves.len(), 17);
        assert_eq!(p.grasp.threads, 2);
        assert_eq!(p.decomposition.as_ref().unwrap().three_cuts_strategy, "none");
    }

    #[test]
    fn rejects_wrong_move_vector_length() {
        let mut p = fixture();
        p.alns.dmoves.pop();
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_unknown_strategy() {
        let text = r#"{"branch_and_price": {"bb_exploration_strategy": "widest-first"}}"#;
        assert!(serde_json::from_str::<Params>(text).is_err());
    }
}
