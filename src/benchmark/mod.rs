//! Runtime benchmarking harness.
//!
//! Generates random graphs over a grid of densities and sizes, times one
//! analysis on each, and fits the observed times against a theoretical
//! order of growth.
//!
//! # Example
//!
//! ```
//! use sccscope::benchmark::{average_runtimes, run_benchmark, AnalysisKind, BenchConfig};
//!
//! let config = BenchConfig {
//!     densities: vec![1.0],
//!     sizes: vec![10, 20],
//!     iterations: 2,
//!     analysis: AnalysisKind::Scc,
//!     ..BenchConfig::default()
//! };
//!
//! let samples = run_benchmark(&config).unwrap();
//! assert_eq!(samples.len(), 4);
//! assert_eq!(average_runtimes(&samples).len(), 2);
//! ```

pub mod fit;
pub mod runner;

pub use fit::{
    compute_coefficients, fit, mean_coefficient, predicted_runtimes, theoretical_linear, FitReport,
    FitRow,
};
pub use runner::{average_runtimes, load_runtimes, measure, run_benchmark, save_runtimes, RuntimeSample};

use std::fmt;
use std::hint::black_box;
use std::str::FromStr;

use crate::analysis::{classify_edges, find_sccs, traverse, AnalysisError, RootOrder};
use crate::generate::GenerateError;
use crate::graph::DirectedGraph;

/// Errors that can occur while benchmarking.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// A graph could not be generated.
    #[error("Failed to generate graph: {0}")]
    Generate(#[from] GenerateError),

    /// The measured analysis failed.
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Reading or writing a runtimes file failed.
    #[error("Failed to access runtimes file: {0}")]
    Io(#[from] std::io::Error),

    /// A runtimes file is not valid JSON.
    #[error("Failed to parse runtimes: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// The analysis being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisKind {
    /// Depth-first pre/post numbering
    #[default]
    Prepost,
    /// Strongly connected components
    Scc,
    /// Pre/post numbering followed by edge classification
    Classify,
}

impl AnalysisKind {
    /// Runs the analysis on `graph`, discarding the result.
    pub fn run(&self, graph: &DirectedGraph) -> BenchResult<()> {
        match self {
            Self::Prepost => {
                black_box(traverse(graph, &RootOrder::Insertion));
            }
            Self::Scc => {
                black_box(find_sccs(graph));
            }
            Self::Classify => {
                let forest = traverse(graph, &RootOrder::Insertion);
                black_box(classify_edges(graph, &forest)?);
            }
        }
        Ok(())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prepost" | "dfs" => Ok(Self::Prepost),
            "scc" | "sccs" => Ok(Self::Scc),
            "classify" | "edges" => Ok(Self::Classify),
            _ => Err(format!(
                "Unknown analysis: '{}'. Valid analyses: prepost, scc, classify",
                s
            )),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepost => write!(f, "prepost"),
            Self::Scc => write!(f, "scc"),
            Self::Classify => write!(f, "classify"),
        }
    }
}

/// Grid and repetition settings of a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Density factors to generate graphs with
    pub densities: Vec<f64>,
    /// Node counts to generate graphs with
    pub sizes: Vec<usize>,
    /// Graphs generated per `(density, size)` pair
    pub iterations: usize,
    /// Seed of the first iteration; iteration `k` uses `base_seed + k`
    pub base_seed: u64,
    /// The analysis being timed
    pub analysis: AnalysisKind,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            densities: vec![0.25, 0.5, 1.0, 2.0, 3.0],
            sizes: vec![10, 50, 100, 500, 1000, 2000, 4000, 8000],
            iterations: 10,
            base_seed: 225,
            analysis: AnalysisKind::Prepost,
        }
    }
}
