//! Random graph model with locality.
//!
//! Out-degrees follow a gamma distribution and edges mostly connect nodes
//! whose numbers are close, with the spread growing with the density
//! factor. Denser settings therefore produce both more edges and longer
//! cycles, which makes the model a good workload for the SCC analysis.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Normal};

use crate::graph::DirectedGraph;

/// Shape of the out-degree gamma distribution.
const DEGREE_SHAPE: f64 = 1.5;
/// Out-degree scale per unit of density.
const DEGREE_SCALE: f64 = 2.0;
/// Exponent of `n` per unit of density giving the neighbor spread.
const SPREAD_EXPONENT: f64 = 0.15;

/// Errors raised when the model parameters are invalid.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GenerateError {
    /// The density factor must be a positive finite number.
    #[error("density factor must be positive and finite, got {0}")]
    InvalidDensity(f64),
}

/// Result type alias for graph generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Label of node `i` among `n`, zero-padded to the width of `n`.
pub fn node_label(i: usize, n: usize) -> String {
    let width = n.to_string().len();
    format!("n{:0width$}", i, width = width)
}

/// Picks the neighbor of node `i` that is `step` positions away.
///
/// The step is rounded away from zero and the result wrapped into `1..=n`.
/// The end nodes are nudged inwards instead of looping onto themselves.
/// Only the step modulo `n` matters, so arbitrarily large samples cost the
/// same as small ones.
fn neighbor(i: i64, n: i64, step: f64) -> i64 {
    let step = step.abs().ceil().copysign(step);
    // exact for any finite step, and |offset| < n
    let offset = (step % n as f64) as i64;

    let mut candidate = if step < 0.0 {
        (i + offset).rem_euclid(n)
    } else {
        (i + offset - 1).rem_euclid(n) + 1
    };
    if candidate == 0 {
        candidate = 1;
    }

    if n > 1 {
        if i == 1 && candidate == i {
            candidate += 1;
        } else if i == n && candidate == i {
            candidate -= 1;
        }
    }

    candidate
}

/// Generates a random graph on `n` nodes.
///
/// Nodes are labelled `n1..nN` (zero-padded) and declared in order; each
/// successor list is de-duplicated and sorted.
pub fn generate_graph(n: usize, density_factor: f64, rng: &mut impl Rng) -> GenerateResult<DirectedGraph> {
    if !(density_factor.is_finite() && density_factor > 0.0) {
        return Err(GenerateError::InvalidDensity(density_factor));
    }

    let degrees = Gamma::new(DEGREE_SHAPE, DEGREE_SCALE * density_factor)
        .map_err(|_| GenerateError::InvalidDensity(density_factor))?;
    let spread = (n as f64).powf(SPREAD_EXPONENT * density_factor);
    let steps =
        Normal::new(0.0, spread).map_err(|_| GenerateError::InvalidDensity(density_factor))?;

    let adjacency = (1..=n).map(|i| {
        let degree = (degrees.sample(rng).ceil() as usize).min(n);
        let neighbors: BTreeSet<String> = (0..degree)
            .map(|_| {
                let j = neighbor(i as i64, n as i64, steps.sample(rng));
                node_label(j as usize, n)
            })
            .collect();
        (node_label(i, n), neighbors)
    });

    Ok(DirectedGraph::from_adjacency(adjacency.collect::<Vec<_>>()))
}

/// Generates a random graph from a fixed seed.
///
/// # Example
///
/// ```
/// use sccscope::generate::generate_seeded;
///
/// let a = generate_seeded(100, 1.0, 225).unwrap();
/// let b = generate_seeded(100, 1.0, 225).unwrap();
///
/// assert_eq!(a.node_count(), 100);
/// assert_eq!(a.edges(), b.edges());
/// ```
pub fn generate_seeded(n: usize, density_factor: f64, seed: u64) -> GenerateResult<DirectedGraph> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_graph(n, density_factor, &mut rng)
}
