//! Command-line surface and the SPMD driver behind it.
//!
//! Rank 0 parses the options, marshals them into the fixed-word run plan,
//! and broadcasts the plan before any rank touches the graph. Rank 0 alone
//! creates and reads the graph file, collects the solve summary, and renders
//! it once the cluster has drained.

use std::{
    io::{self, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use tracing::{info, instrument, warn};

use spantree_core::{
    minimum_spanning_tree, read_graph_file, render_maze, write_maze_file, Algorithm,
    Communicator, EngineError, LocalCluster, RunPlan, ThreadComm, WeightedGraph,
};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "spantree",
    about = "Compute minimum spanning trees over a bulk-synchronous rank cluster."
)]
pub struct Cli {
    /// Algorithm: 0 Kruskal, 1 Prim (Fibonacci), 2 Prim (binary), 3 Boruvka.
    #[arg(short = 'a', long = "algorithm", default_value_t = 0)]
    pub algorithm: i32,

    /// Columns of the generated grid maze.
    #[arg(short = 'c', long = "columns", default_value_t = 3)]
    pub columns: usize,

    /// Rows of the generated grid maze.
    #[arg(short = 'r', long = "rows", default_value_t = 2)]
    pub rows: usize,

    /// Graph file to read (and to create with `-n`).
    #[arg(short = 'f', long = "file", default_value = "maze.csv")]
    pub graph_file: PathBuf,

    /// Create a new maze file before solving.
    #[arg(short = 'n', long = "new-maze")]
    pub create: bool,

    /// Render the MST as a maze after solving (needs matching rows/columns).
    #[arg(short = 'm', long = "maze")]
    pub maze: bool,

    /// Print the graph and MST edge lists.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Number of ranks in the local cluster.
    #[arg(short = 'p', long = "ranks", default_value_t = NonZeroUsize::MIN)]
    pub ranks: NonZeroUsize,
}

/// Rank 0's account of a completed solve.
#[derive(Debug, Clone)]
pub struct SolveSummary {
    /// The kernel that produced the MST.
    pub algorithm: Algorithm,
    /// Total MST weight.
    pub weight: i64,
    /// Wall-clock duration of the solve phase.
    pub elapsed: Duration,
    /// Input edge listing, captured before the sort permutes it (`-v`).
    pub graph_listing: Option<String>,
    /// MST edge listing (`-v`).
    pub mst_listing: Option<String>,
    /// ASCII maze rendering of the MST (`-m`).
    pub maze: Option<String>,
}

/// Executes the command represented by `cli` on a local rank cluster.
///
/// # Errors
/// Returns [`EngineError`] when the algorithm number is unknown, the graph
/// file cannot be produced or parsed, or the cluster rejects the
/// edge-per-rank partition.
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(algorithm = cli.algorithm, ranks = cli.ranks.get())
)]
pub fn run_cli(cli: Cli) -> Result<SolveSummary, EngineError> {
    let algorithm = Algorithm::from_code(cli.algorithm)?;
    let plan = RunPlan {
        algorithm,
        rows: cli.rows,
        columns: cli.columns,
        create: cli.create,
        maze: cli.maze,
        verbose: cli.verbose,
    };

    let outcomes = LocalCluster::run(cli.ranks, |comm| solve_rank(comm, &plan, &cli.graph_file));

    let mut root_outcome = None;
    for (rank, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(summary) if rank == 0 => root_outcome = summary,
            Ok(_) => {}
            Err(err) if rank == 0 => return Err(err),
            Err(err) => warn!(rank, error = %err, "worker rank failed"),
        }
    }

    let Some(summary) = root_outcome else {
        unreachable!("rank 0 always produces the summary");
    };
    info!(
        algorithm = %summary.algorithm,
        weight = summary.weight,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "solve completed"
    );
    Ok(summary)
}

/// The per-rank SPMD body: plan exchange, then the root or worker path.
fn solve_rank(
    comm: &ThreadComm,
    plan: &RunPlan,
    graph_file: &Path,
) -> Result<Option<SolveSummary>, EngineError> {
    let mut words = if comm.rank() == 0 {
        plan.to_words()
    } else {
        Vec::new()
    };
    comm.broadcast(&mut words, 0)?;
    let plan = RunPlan::from_words(&words)?;

    if comm.rank() == 0 {
        root_rank(comm, &plan, graph_file).map(Some)
    } else {
        worker_rank(comm, &plan).map(|()| None)
    }
}

#[instrument(
    name = "cli.root",
    err,
    skip(comm, plan, graph_file),
    fields(path = %graph_file.display(), algorithm = %plan.algorithm)
)]
fn root_rank(
    comm: &ThreadComm,
    plan: &RunPlan,
    graph_file: &Path,
) -> Result<SolveSummary, EngineError> {
    if plan.create {
        let mut rng = SmallRng::from_entropy();
        write_maze_file(graph_file, plan.rows, plan.columns, &mut rng)?;
        info!(
            rows = plan.rows,
            columns = plan.columns,
            "wrote a fresh maze file"
        );
    }

    let mut graph = read_graph_file(graph_file)?;
    info!(
        vertices = graph.vertices(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    let graph_listing = plan.verbose.then(|| graph.render_edge_list());

    let started = Instant::now();
    let mst = minimum_spanning_tree(comm, &mut graph, plan.algorithm)?;
    let elapsed = started.elapsed();

    Ok(SolveSummary {
        algorithm: plan.algorithm,
        weight: mst.total_weight(),
        elapsed,
        graph_listing,
        mst_listing: plan.verbose.then(|| mst.render_edge_list()),
        maze: plan
            .maze
            .then(|| render_maze(&mst, plan.rows, plan.columns)),
    })
}

fn worker_rank(comm: &ThreadComm, plan: &RunPlan) -> Result<(), EngineError> {
    let mut graph = WeightedGraph::empty();
    minimum_spanning_tree(comm, &mut graph, plan.algorithm).map(|_| ())
}

/// Renders `summary` to `writer` in the human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &SolveSummary, mut writer: impl Write) -> io::Result<()> {
    if let Some(listing) = &summary.graph_listing {
        writeln!(writer, "Graph:")?;
        writer.write_all(listing.as_bytes())?;
    }
    if let Some(listing) = &summary.mst_listing {
        writeln!(writer, "MST:")?;
        writer.write_all(listing.as_bytes())?;
    }
    writeln!(writer, "MST weight: {}", summary.weight)?;
    if let Some(maze) = &summary.maze {
        writeln!(writer, "Maze:")?;
        writer.write_all(maze.as_bytes())?;
    }
    Ok(())
}
