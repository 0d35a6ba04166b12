//! sccscope - depth-first analysis of directed graphs
//!
//! This crate numbers the nodes of a directed graph with depth-first
//! pre/post intervals, decomposes it into strongly connected components
//! and classifies its edges, with a benchmarking harness and a
//! terminal-based user interface for exploring the resulting forests.

pub mod analysis;
pub mod benchmark;
pub mod export;
pub mod generate;
pub mod graph;
pub mod parser;
pub mod ui;
