//! Random graph generation for benchmarking.
//!
//! See [`random`] for the model.

pub mod random;

pub use random::{generate_graph, generate_seeded, node_label, GenerateError, GenerateResult};
