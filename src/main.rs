use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use sgcp::bp::bb_tree::BBTree;
use sgcp::cache::Cache;
use sgcp::graph::Graph;
use sgcp::heuristics::alns::ALNSSolver;
use sgcp::heuristics::grasp::GRASPSolver;
use sgcp::heuristics::greedy;
use sgcp::heuristics::tabu::TabuSearchSolver;
use sgcp::params::Params;
use sgcp::stable_set::StableSetCollection;

#[derive(Parser, Debug)]
#[command(version, about = "selective graph colouring solver", long_about = None)]
struct Cli {
    /// JSON parameter file
    params: PathBuf,

    /// instance file (vertex/edge/cluster counts, edges, clusters)
    instance: PathBuf,

    /// solver to run
    #[arg(value_enum)]
    mode: Mode,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Mode {
    /// exact branch-and-price
    Bp,
    /// Campelo representatives model (not built into this binary)
    Campelo,
    /// compact formulation (not built into this binary)
    Compact,
    /// constructive greedy heuristic
    Greedy,
    /// ALNS heuristic
    Alns,
    /// ALNS heuristic, reporting per-move acceptance statistics
    AlnsStats,
    /// tabu search heuristic
    Tabu,
    /// GRASP heuristic
    Grasp,
    /// Benders-like decomposition (not built into this binary)
    Decomposition,
    /// print instance measurements only
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.params.is_file() {
        bail!("cannot find params file: {}", cli.params.display());
    }
    if !cli.instance.is_file() {
        bail!("cannot find instance file: {}", cli.instance.display());
    }

    let params = Params::from_file(&cli.params.to_string_lossy())?;
    let g = Graph::from_file(&cli.instance.to_string_lossy())?;

    match cli.mode {
        Mode::Bp => solve_bp(g, params),
        Mode::Greedy => solve_greedy(g),
        Mode::Alns => solve_alns(g, params, false),
        Mode::AlnsStats => solve_alns(g, params, true),
        Mode::Tabu => solve_tabu(g, params),
        Mode::Grasp => solve_grasp(g, params),
        Mode::Info => {
            println!("{},{},{},{}", g.data_filename, g.n_vertices, g.n_edges, g.n_clusters);
            Ok(())
        }
        Mode::Campelo | Mode::Compact | Mode::Decomposition => {
            bail!("this build carries only the branch-and-price core and its heuristics")
        }
    }
}

fn print_solution(solution: &Option<StableSetCollection>) {
    match solution {
        Some(sets) => {
            println!();
            println!("=== Solution ===");
            for (colour, set) in sets.iter().enumerate() {
                println!("{}: {}", colour, set);
            }
        }
        None => println!("No solution!"),
    }
}

fn solve_bp(g: Graph, params: Params) -> Result<()> {
    let cache = Cache::in_working_dir();
    let warm_columns = cache.bks_load(&g);
    let g = Rc::new(g);

    let mut tree = BBTree::new(Rc::clone(&g), params, &warm_columns);
    let solution = tree.solve();
    tree.write_results()?;

    print_solution(&solution);
    if let Some(sets) = &solution {
        cache.bks_store(sets, &g);
    }
    Ok(())
}

fn solve_greedy(g: Graph) -> Result<()> {
    let cache = Cache::in_working_dir();
    let cached = cache.init_load(&g);
    let solution = if cached.is_empty() {
        let solution = greedy::solve(&g);
        cache.init_store(&solution, &g);
        solution
    } else {
        cached
    };
    println!("{},{}", g.data_filename, solution.len());
    Ok(())
}

fn solve_alns(g: Graph, params: Params, print_stats: bool) -> Result<()> {
    let mut solver = ALNSSolver::new(&g, &params);
    let run = solver.solve(None);

    if print_stats {
        run.stats.print_stats();
    } else {
        println!(
            "{},{:?},{},{},{},{}",
            g.data_filename,
            params.alns.acceptance,
            params.tabu.tenure,
            params.alns.wa_initial_probability,
            run.elapsed,
            run.best.n_colours
        );
    }

    Cache::in_working_dir().bks_store(&run.best.to_stable_sets(&g), &g);
    Ok(())
}

fn solve_tabu(g: Graph, params: Params) -> Result<()> {
    let mut solver = TabuSearchSolver::new(&g, &params.tabu);
    let (solution, elapsed) = solver.solve(None);
    println!("{},{},{}", g.data_filename, elapsed, solution.len());
    Cache::in_working_dir().bks_store(&solution, &g);
    Ok(())
}

fn solve_grasp(g: Graph, params: Params) -> Result<()> {
    let clock = Instant::now();
    let solution = GRASPSolver::new(&g, &params).solve();
    println!("{},{},{}", g.data_filename, clock.elapsed().as_secs_f32(), solution.len());
    Ok(())
}
