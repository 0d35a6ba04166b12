use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use sccscope::analysis::{find_sccs, traverse, RootOrder};
use sccscope::benchmark::{
    average_runtimes, fit, load_runtimes, run_benchmark, save_runtimes, theoretical_linear,
    AnalysisKind, BenchConfig,
};
use sccscope::export::markdown::{runtime_rows, runtime_table, RUNTIME_HEADERS};
use sccscope::export::{export, ExportFormat, ReportData};
use sccscope::generate::generate_seeded;
use sccscope::graph::DirectedGraph;
use sccscope::parser::{adjacency, sample_subgraph, vote_csv, VoteFilter};
use sccscope::ui::{run_app, App, ExplorerTree};

#[derive(Parser)]
#[command(name = "sccscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Depth-first intervals, strongly connected components and edge classes of directed graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a graph file (adjacency JSON, or vote CSV by extension)
    Analyze {
        /// Graph file to analyze
        input: PathBuf,

        /// Report format: json, csv or markdown
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include the depth-first forest and the edge classification
        #[arg(short, long)]
        detailed: bool,

        /// Analyze a breadth-first sample of at most this many nodes
        #[arg(short, long)]
        sample: Option<usize>,

        /// Keep only CSV rows with this vote (positive, negative, neutral)
        #[arg(long, allow_hyphen_values = true)]
        vote: Option<VoteFilter>,

        #[command(flatten)]
        roots: RootArgs,

        /// Fail if a successor is never declared as a node
        #[arg(long)]
        strict: bool,
    },
    /// Generate a random graph as adjacency JSON
    Generate {
        /// Number of nodes
        #[arg(short = 'n', long)]
        size: usize,

        /// Density factor scaling out-degrees and neighbor spread
        #[arg(short, long, default_value_t = 1.0)]
        density: f64,

        #[arg(long, default_value_t = 225)]
        seed: u64,

        /// Write the graph to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Time an analysis over a grid of generated graphs
    Bench {
        /// Density factors, comma separated
        #[arg(long, value_delimiter = ',')]
        densities: Option<Vec<f64>>,

        /// Graph sizes, comma separated
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<usize>>,

        /// Graphs per density and size
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Seed of the first iteration
        #[arg(long)]
        seed: Option<u64>,

        /// Analysis to time: prepost, scc or classify
        #[arg(short, long, default_value = "prepost")]
        analysis: AnalysisKind,

        /// File the averaged runtimes are saved to
        #[arg(short, long, default_value = "runtimes.json")]
        output: PathBuf,
    },
    /// Fit saved runtimes against the linear cost |V| + |E|
    Fit {
        /// Runtimes file written by `bench`
        #[arg(default_value = "runtimes.json")]
        input: PathBuf,

        /// Leave the first coefficients out of the mean
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },
    /// Browse the depth-first forest of a graph in the terminal
    Explore {
        /// Graph file to explore
        input: PathBuf,

        /// Explore a breadth-first sample of at most this many nodes
        #[arg(short, long, default_value_t = 50)]
        sample: usize,

        /// Keep only CSV rows with this vote (positive, negative, neutral)
        #[arg(long, allow_hyphen_values = true)]
        vote: Option<VoteFilter>,

        #[command(flatten)]
        roots: RootArgs,
    },
    /// Show version information
    Version,
}

/// Options choosing the order in which traversal roots are tried
#[derive(clap::Args)]
struct RootArgs {
    /// Try roots in label order instead of file order
    #[arg(long)]
    sorted: bool,

    /// Try these roots first, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with = "sorted")]
    roots: Vec<String>,
}

impl RootArgs {
    fn order(&self) -> RootOrder {
        if !self.roots.is_empty() {
            RootOrder::Given(self.roots.clone())
        } else if self.sorted {
            RootOrder::Sorted
        } else {
            RootOrder::Insertion
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            input,
            format,
            output,
            detailed,
            sample,
            vote,
            roots,
            strict,
        }) => {
            let mut graph = load_graph(&input, vote)?;
            if strict {
                graph
                    .validate()
                    .with_context(|| format!("{} is not closed", input.display()))?;
            }
            if let Some(max_size) = sample {
                graph = sample_subgraph(&graph, max_size);
            }

            let name = graph_name(&input);
            let data = if detailed {
                ReportData::detailed(name, &graph, &roots.order())?
            } else {
                ReportData::new(name, &graph)
            };

            match output {
                Some(path) => {
                    let mut file = fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    export(format, &data, &mut file)?;
                    log::info!("Wrote {} report to {}", format, path.display());
                }
                None => export(format, &data, &mut io::stdout().lock())?,
            }
        }
        Some(Commands::Generate {
            size,
            density,
            seed,
            output,
        }) => {
            let graph = generate_seeded(size, density, seed)?;
            let json = adjacency::to_string(&graph)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!(
                        "Wrote graph with {} nodes and {} edges to {}",
                        graph.node_count(),
                        graph.edge_count(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
        }
        Some(Commands::Bench {
            densities,
            sizes,
            iterations,
            seed,
            analysis,
            output,
        }) => {
            let defaults = BenchConfig::default();
            let config = BenchConfig {
                densities: densities.unwrap_or(defaults.densities),
                sizes: sizes.unwrap_or(defaults.sizes),
                iterations: iterations.unwrap_or(defaults.iterations),
                base_seed: seed.unwrap_or(defaults.base_seed),
                analysis,
            };

            let samples = run_benchmark(&config)?;
            let averaged = average_runtimes(&samples);
            save_runtimes(&output, &averaged)
                .with_context(|| format!("Failed to save runtimes to {}", output.display()))?;
            log::info!("Saved {} averaged runtimes to {}", averaged.len(), output.display());

            print!("{}", runtime_table(&runtime_rows(&averaged), &RUNTIME_HEADERS));
        }
        Some(Commands::Fit { input, skip }) => {
            let samples = load_runtimes(&input)
                .with_context(|| format!("Failed to load runtimes from {}", input.display()))?;
            let report = fit(&samples, theoretical_linear, skip)
                .context("No runtimes left to fit")?;

            println!("Mean coefficient: {:e}", report.coefficient);
            println!();

            let rows: Vec<Vec<String>> = report
                .rows
                .iter()
                .map(|row| {
                    vec![
                        row.density.to_string(),
                        row.size.to_string(),
                        row.vertices.to_string(),
                        row.edges.to_string(),
                        format!("{:.6}", row.observed),
                        format!("{:.6}", row.predicted),
                    ]
                })
                .collect();
            let headers = ["Density Factor", "Size ", "   V   ", "   E   ", "Observed (sec)", "Predicted (sec)"];
            print!("{}", runtime_table(&rows, &headers));
        }
        Some(Commands::Explore {
            input,
            sample,
            vote,
            roots,
        }) => {
            let graph = sample_subgraph(&load_graph(&input, vote)?, sample);
            let forest = traverse(&graph, &roots.order());
            let components = find_sccs(&graph);

            let name = graph_name(&input);
            let tree = ExplorerTree::from_forest(name.clone(), &forest, &components);
            let mut app = App::new(name, tree);
            explore(&mut app)?;
        }
        Some(Commands::Version) => {
            println!("sccscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("sccscope - Depth-First Graph Analyzer");
            println!("Run 'sccscope analyze <graph>' to analyze a graph");
            println!("Run 'sccscope --help' for more information");
        }
    }

    Ok(())
}

/// Loads a graph, choosing the format from the file extension.
fn load_graph(path: &Path, vote: Option<VoteFilter>) -> Result<DirectedGraph> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let loaded = if is_csv {
        vote_csv::load_file(path, vote)
    } else {
        if vote.is_some() {
            log::warn!("--vote only applies to CSV input, ignoring it");
        }
        adjacency::parse_file(path)
    };
    let graph = loaded.with_context(|| format!("Failed to load graph from {}", path.display()))?;

    let undeclared = graph.undeclared_nodes().len();
    if undeclared > 0 {
        log::debug!("{} successor(s) are not declared as nodes", undeclared);
    }
    Ok(graph)
}

fn graph_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Runs the explorer on an alternate screen, restoring the terminal even
/// when the event loop fails.
fn explore(app: &mut App) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let result = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}
